// src/repository/parsers/debian.rs

//! Debian/Ubuntu repository metadata parser
//!
//! Parses Debian-style Packages files which use RFC 822-like format
//! (similar to email headers with key: value pairs). Paragraphs are separated
//! by blank lines and fields may continue over indented lines.
//!
//! Parsing is permissive: lines that fit no rule are dropped and nothing here
//! ever fails on catalog content.

use super::{CatalogLine, LineOutcome, PackageRecord};
use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::debug;

/// Decompress a gzip-compressed Packages file into text
pub fn decompress_gzip(bytes: &[u8]) -> Result<String> {
    let mut gz = GzDecoder::new(bytes);
    let mut decompressed = String::new();
    gz.read_to_string(&mut decompressed)
        .map_err(|e| Error::DecompressError(format!("Failed to decompress Packages.gz: {}", e)))?;

    debug!("Decompressed Packages file: {} bytes", decompressed.len());
    Ok(decompressed)
}

/// Parse a whole catalog into its records
pub fn parse(text: &str) -> Vec<PackageRecord> {
    let packages: Vec<PackageRecord> = records(text).collect();
    debug!("Parsed {} package entries", packages.len());
    packages
}

/// Lazily iterate over the records of a catalog
pub fn records(text: &str) -> Records<std::str::Lines<'_>> {
    Records::new(text.lines())
}

/// Line-by-line parser state
///
/// Holds only the record being built and the name of the field most recently
/// assigned in it.
#[derive(Debug, Default)]
pub struct ParserState {
    current: PackageRecord,
    current_field: Option<String>,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line, returning what it did
    pub fn feed(&mut self, line: &str) -> LineOutcome {
        match CatalogLine::classify(line) {
            CatalogLine::Blank => {
                self.current_field = None;
                if self.current.is_empty() {
                    LineOutcome::Skipped
                } else {
                    LineOutcome::Emitted(std::mem::take(&mut self.current))
                }
            }
            CatalogLine::Continuation(text) => {
                let appended = match self.current_field.as_deref() {
                    Some(field) => self.current.append_line(field, text),
                    None => false,
                };
                if appended {
                    LineOutcome::Accepted
                } else {
                    LineOutcome::Skipped
                }
            }
            CatalogLine::Field { key, value } => {
                self.current.set(key, value);
                self.current_field = Some(key.to_string());
                LineOutcome::Accepted
            }
            CatalogLine::Malformed => LineOutcome::Skipped,
        }
    }

    /// End of input: hand back the unterminated record, if any
    pub fn finish(&mut self) -> Option<PackageRecord> {
        self.current_field = None;
        if self.current.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.current))
        }
    }
}

/// Iterator over the records produced from a sequence of lines
pub struct Records<I> {
    lines: I,
    state: ParserState,
    done: bool,
}

impl<I> Records<I> {
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            state: ParserState::new(),
            done: false,
        }
    }
}

impl<I> Iterator for Records<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = PackageRecord;

    fn next(&mut self) -> Option<PackageRecord> {
        if self.done {
            return None;
        }

        for line in self.lines.by_ref() {
            if let LineOutcome::Emitted(record) = self.state.feed(line.as_ref()) {
                return Some(record);
            }
        }

        self.done = true;
        self.state.finish()
    }
}
