// src/repository/parsers/mod.rs

//! Repository metadata parsing
//!
//! This module provides the shared record model for repository catalogs:
//! - `PackageRecord`: one paragraph of `Key: Value` fields
//! - `CatalogLine`: classification of a single catalog line
//! - `LineOutcome`: what feeding a line to the parser did
//!
//! The Debian `Packages` parser lives in [`debian`].

pub mod debian;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Field holding the package name
pub const PACKAGE_FIELD: &str = "Package";
/// Field holding the package version
pub const VERSION_FIELD: &str = "Version";
/// Field holding the artifact path relative to the repository root
pub const FILENAME_FIELD: &str = "Filename";

/// Separator between a field name and its value
const FIELD_SEPARATOR: &str = ": ";

/// One package's metadata block from a catalog
///
/// Fields keep the order in which they were first assigned. Field names are
/// case-sensitive. Assigning an existing field replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRecord {
    fields: Vec<(String, String)>,
}

impl PackageRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value by exact name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Check whether a field has been assigned
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Assign a field, overwriting any previous value (last write wins)
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Append a continuation line to an existing field
    ///
    /// Returns false, leaving the record untouched, when the field is absent.
    pub fn append_line(&mut self, name: &str, line: &str) -> bool {
        match self.fields.iter_mut().find(|(key, _)| key == name) {
            Some((_, value)) => {
                value.push('\n');
                value.push_str(line);
                true
            }
            None => false,
        }
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field has been assigned
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(name, value)` pairs in assignment order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The `Package` field
    pub fn package(&self) -> Option<&str> {
        self.get(PACKAGE_FIELD)
    }

    /// The `Version` field
    pub fn version(&self) -> Option<&str> {
        self.get(VERSION_FIELD)
    }

    /// The `Filename` field
    pub fn filename(&self) -> Option<&str> {
        self.get(FILENAME_FIELD)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PackageRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = PackageRecord::new();
        for (key, value) in iter {
            record.set(key, value);
        }
        record
    }
}

impl Serialize for PackageRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Classification of one catalog line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogLine<'a> {
    /// Whitespace only; ends the current record
    Blank,
    /// Leading whitespace; extends the previous field (content is trimmed)
    Continuation(&'a str),
    /// `Key: Value`, split on the first `": "`
    Field { key: &'a str, value: &'a str },
    /// Anything else; ignored
    Malformed,
}

impl<'a> CatalogLine<'a> {
    /// Classify a raw line (without its line terminator)
    pub fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return CatalogLine::Blank;
        }

        if line.starts_with(char::is_whitespace) {
            return CatalogLine::Continuation(trimmed);
        }

        match line.split_once(FIELD_SEPARATOR) {
            Some((key, value)) => CatalogLine::Field { key, value },
            None => CatalogLine::Malformed,
        }
    }
}

/// Result of feeding one line to the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The line assigned or extended a field
    Accepted,
    /// The line contributed nothing
    Skipped,
    /// A blank line closed a non-empty record
    Emitted(PackageRecord),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_lines() {
        assert_eq!(CatalogLine::classify(""), CatalogLine::Blank);
        assert_eq!(CatalogLine::classify(" \t "), CatalogLine::Blank);
        assert_eq!(
            CatalogLine::classify("  more text  "),
            CatalogLine::Continuation("more text")
        );
        assert_eq!(
            CatalogLine::classify("\t."),
            CatalogLine::Continuation(".")
        );
        assert_eq!(
            CatalogLine::classify("Package: htop"),
            CatalogLine::Field {
                key: "Package",
                value: "htop"
            }
        );
        assert_eq!(CatalogLine::classify("Package:htop"), CatalogLine::Malformed);
        assert_eq!(CatalogLine::classify("# comment"), CatalogLine::Malformed);
    }

    #[test]
    fn test_classify_splits_on_first_separator() {
        assert_eq!(
            CatalogLine::classify("Description: a: b"),
            CatalogLine::Field {
                key: "Description",
                value: "a: b"
            }
        );
        assert_eq!(
            CatalogLine::classify("Empty: "),
            CatalogLine::Field {
                key: "Empty",
                value: ""
            }
        );
    }

    #[test]
    fn test_record_last_write_wins() {
        let mut record = PackageRecord::new();
        record.set("Package", "htop");
        record.set("Version", "1.0");
        record.set("Package", "btop");

        assert_eq!(record.len(), 2);
        assert_eq!(record.package(), Some("btop"));
        let keys: Vec<_> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Package", "Version"]);
    }

    #[test]
    fn test_record_append_line() {
        let mut record: PackageRecord = [("Description", "short")].into_iter().collect();
        assert!(record.append_line("Description", "long"));
        assert!(!record.append_line("Missing", "ignored"));
        assert_eq!(record.get("Description"), Some("short\nlong"));
        assert!(!record.contains("Missing"));
    }

    #[test]
    fn test_record_field_names_are_case_sensitive() {
        let record: PackageRecord = [("package", "htop")].into_iter().collect();
        assert_eq!(record.package(), None);
        assert_eq!(record.get("package"), Some("htop"));
    }

    #[test]
    fn test_record_serializes_in_order() {
        let record: PackageRecord = [("Package", "htop"), ("Version", "3.0.5"), ("Architecture", "amd64")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"Package":"htop","Version":"3.0.5","Architecture":"amd64"}"#
        );
    }
}
