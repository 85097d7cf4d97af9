// src/repository/locator.rs

//! Building download locations relative to a repository base
//!
//! Paths are joined with a single `/` and passed through verbatim: no slash
//! collapsing and no URL encoding. `Filename` values are already relative
//! paths as the repository publishes them.

use super::parsers::{FILENAME_FIELD, PackageRecord};
use crate::error::{Error, Result};

/// Absolute URL of the artifact a record points at
///
/// Only the first line of `Filename` is used; continuation lines are not part
/// of the path.
pub fn locate(base: &str, record: &PackageRecord) -> Result<String> {
    let filename = record
        .filename()
        .ok_or_else(|| Error::MissingFieldError(FILENAME_FIELD.to_string()))?;
    let path = filename.lines().next().unwrap_or_default();

    Ok(format!("{}/{}", base, path))
}

/// URL of the `Packages.gz` catalog for one distribution/component/architecture
pub fn packages_url(base: &str, distribution: &str, component: &str, architecture: &str) -> String {
    format!(
        "{}/dists/{}/{}/binary-{}/Packages.gz",
        base, distribution, component, architecture
    )
}
