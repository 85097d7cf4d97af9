// src/version.rs

//! Version ordering strategies
//!
//! Repositories publish versions as free-form strings. Two orderings are
//! provided:
//!
//! - [`Lexicographic`]: plain byte-wise string comparison. This is the
//!   default and is what selection uses unless told otherwise. Note that it
//!   orders `"10.0"` before `"9.0"`.
//! - [`DebianVersionOrder`]: `[epoch:]upstream[-revision]` comparison as dpkg
//!   does it.

use debian_packaging::package_version::PackageVersion;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Total ordering over version strings
pub trait VersionCompare {
    /// Compare two version strings
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Plain string comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lexicographic;

impl VersionCompare for Lexicographic {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

/// Debian package version comparison (epoch, upstream, revision)
///
/// Pairs where either side is not a valid Debian version fall back to
/// [`Lexicographic`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebianVersionOrder;

impl VersionCompare for DebianVersionOrder {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        match (PackageVersion::parse(a), PackageVersion::parse(b)) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            _ => Lexicographic.compare(a, b),
        }
    }
}

/// Ordering selectable at runtime (e.g. from the command line)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VersionOrder {
    #[default]
    Lexical,
    Debian,
}

impl VersionCompare for VersionOrder {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            VersionOrder::Lexical => Lexicographic.compare(a, b),
            VersionOrder::Debian => DebianVersionOrder.compare(a, b),
        }
    }
}

impl FromStr for VersionOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lexical" => Ok(VersionOrder::Lexical),
            "debian" => Ok(VersionOrder::Debian),
            other => Err(format!(
                "unknown version order '{}' (expected 'lexical' or 'debian')",
                other
            )),
        }
    }
}

impl fmt::Display for VersionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionOrder::Lexical => f.write_str("lexical"),
            VersionOrder::Debian => f.write_str("debian"),
        }
    }
}
