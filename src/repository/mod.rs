// src/repository/mod.rs

//! Repository access and package downloading
//!
//! This module provides functionality for:
//! - Fetching and decompressing a repository's `Packages.gz` catalog
//! - Selecting the newest record for one package
//! - Downloading the package artifact and saving it to disk
//!
//! Network access goes through the [`Fetcher`] trait. [`RepositoryClient`] is
//! the HTTP implementation.

pub mod locator;
pub mod parsers;
pub mod selector;

use crate::error::{Error, Result};
use crate::version::VersionCompare;
use parsers::debian;
use parsers::{PackageRecord, VERSION_FIELD};
use reqwest::blocking::Client;
use selector::PackageSelector;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default repository, the Debian mirror network
pub const DEFAULT_REPOSITORY: &str = "https://deb.debian.org/debian";
/// Default distribution (suite)
pub const DEFAULT_DISTRIBUTION: &str = "stable";
/// Default repository component
pub const DEFAULT_COMPONENT: &str = "main";
/// Default architecture
pub const DEFAULT_ARCHITECTURE: &str = "amd64";

/// Performs a GET and returns the whole response body
pub trait Fetcher {
    /// Fetch `url`; any failure or non-success status is an error
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP client
///
/// Every request is attempted once. A failure ends the invocation.
pub struct RepositoryClient {
    client: Client,
}

impl RepositoryClient {
    /// Create a new repository client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("debfetch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Fetcher for RepositoryClient {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::DownloadError(format!("Failed to download {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| Error::DownloadError(format!("Failed to read response: {}", e)))?;

        debug!("Received {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

/// One `dists/<dist>/<component>/binary-<arch>/` slice of a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebianRepository {
    /// Base URL, used verbatim as the prefix of every request
    pub url: String,
    /// Distribution name (e.g., "stable", "bookworm")
    pub distribution: String,
    /// Component (e.g., "main", "contrib")
    pub component: String,
    /// Architecture (e.g., "amd64", "arm64")
    pub architecture: String,
}

impl DebianRepository {
    /// Repository at `url` with the default distribution, component and architecture
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            distribution: DEFAULT_DISTRIBUTION.to_string(),
            component: DEFAULT_COMPONENT.to_string(),
            architecture: DEFAULT_ARCHITECTURE.to_string(),
        }
    }

    pub fn with_distribution(mut self, distribution: impl Into<String>) -> Self {
        self.distribution = distribution.into();
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = component.into();
        self
    }

    pub fn with_architecture(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = architecture.into();
        self
    }

    /// URL of this slice's `Packages.gz`
    pub fn packages_url(&self) -> String {
        locator::packages_url(&self.url, &self.distribution, &self.component, &self.architecture)
    }

    /// Download and decompress the Packages file
    pub fn fetch_catalog(&self, fetcher: &dyn Fetcher) -> Result<String> {
        info!("Try to download package index from {}", self.url);
        info!("Architecture: {}", self.architecture);
        info!("Distribution: {}", self.distribution);
        info!("Component: {}", self.component);

        let bytes = fetcher.get(&self.packages_url())?;
        debian::decompress_gzip(&bytes)
    }
}

impl Default for DebianRepository {
    fn default() -> Self {
        Self::new(DEFAULT_REPOSITORY)
    }
}

/// The record chosen for a package and where to download it from
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPackage {
    pub name: String,
    pub version: String,
    pub download_url: String,
    pub record: PackageRecord,
}

/// Find the newest published build of `name`
///
/// The catalog is parsed lazily; only the current best record is kept while
/// scanning.
pub fn resolve_package<C: VersionCompare>(
    fetcher: &dyn Fetcher,
    repo: &DebianRepository,
    name: &str,
    order: C,
) -> Result<ResolvedPackage> {
    let catalog = repo.fetch_catalog(fetcher)?;

    let record = PackageSelector::new(order)
        .select_from(debian::records(&catalog), name)
        .ok_or_else(|| Error::NotFoundError(name.to_string()))?;

    let version = record
        .version()
        .ok_or_else(|| Error::MissingFieldError(VERSION_FIELD.to_string()))?
        .to_string();
    info!("The latest version is {}", version);

    let download_url = locator::locate(&repo.url, &record)?;

    Ok(ResolvedPackage {
        name: name.to_string(),
        version,
        download_url,
        record,
    })
}

/// Every published version of `name`, newest first
pub fn list_versions<C: VersionCompare>(
    fetcher: &dyn Fetcher,
    repo: &DebianRepository,
    name: &str,
    order: C,
) -> Result<Vec<String>> {
    let catalog = repo.fetch_catalog(fetcher)?;
    let records = debian::parse(&catalog);

    let candidates = PackageSelector::new(order).candidates(&records, name);
    if candidates.is_empty() {
        return Err(Error::NotFoundError(name.to_string()));
    }

    Ok(candidates
        .into_iter()
        .map(|record| record.version().unwrap_or_default().to_string())
        .collect())
}

/// Default save location: `<name>.deb` in the working directory
pub fn default_output_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{}.deb", name))
}

/// Resolve, download and save the newest build of `name` to `dest`
///
/// An existing file at `dest` is replaced. Nothing is written unless the
/// download completed.
pub fn fetch_package<C: VersionCompare>(
    fetcher: &dyn Fetcher,
    repo: &DebianRepository,
    name: &str,
    order: C,
    dest: &Path,
) -> Result<PathBuf> {
    let resolved = resolve_package(fetcher, repo, name, order)?;

    info!("Download {}", resolved.download_url);
    let bytes = fetcher.get(&resolved.download_url)?;

    save_artifact(&bytes, dest)?;
    Ok(dest.to_path_buf())
}

/// Write the artifact through a temporary file and rename it into place
fn save_artifact(bytes: &[u8], dest_path: &Path) -> Result<()> {
    let temp_path = dest_path.with_extension("tmp");
    fs::write(&temp_path, bytes)?;

    if let Err(e) = fs::rename(&temp_path, dest_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    debug!("Wrote {} bytes to {}", bytes.len(), dest_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::VersionOrder;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    struct MockFetcher {
        responses: HashMap<String, Vec<u8>>,
        requests: RefCell<Vec<String>>,
    }

    impl MockFetcher {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn with(mut self, url: &str, body: Vec<u8>) -> Self {
            self.responses.insert(url.to_string(), body);
            self
        }
    }

    impl Fetcher for MockFetcher {
        fn get(&self, url: &str) -> Result<Vec<u8>> {
            self.requests.borrow_mut().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| Error::DownloadError(format!("Failed to download {}: HTTP 404 Not Found", url)))
        }
    }

    fn gzip(text: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    const CATALOG: &str = "Package: htop\nVersion: 2.0.1\nFilename: pool/h/htop_2.0.1.deb\n\nPackage: htop\nVersion: 3.0.5\nFilename: pool/h/htop_3.0.5.deb\n\nPackage: noversion\nFilename: pool/n/noversion.deb\n\nPackage: nofile\nVersion: 1.0\n";

    fn repo() -> DebianRepository {
        DebianRepository::new("http://repo")
    }

    #[test]
    fn test_repository_defaults() {
        let repo = DebianRepository::default();
        assert_eq!(repo.url, DEFAULT_REPOSITORY);
        assert_eq!(
            repo.packages_url(),
            "https://deb.debian.org/debian/dists/stable/main/binary-amd64/Packages.gz"
        );

        let custom = DebianRepository::new("http://mirror")
            .with_distribution("bookworm")
            .with_component("contrib")
            .with_architecture("arm64");
        assert_eq!(
            custom.packages_url(),
            "http://mirror/dists/bookworm/contrib/binary-arm64/Packages.gz"
        );
    }

    #[test]
    fn test_resolve_package() {
        let fetcher = MockFetcher::new().with(&repo().packages_url(), gzip(CATALOG));
        let resolved = resolve_package(&fetcher, &repo(), "htop", VersionOrder::Lexical).unwrap();

        assert_eq!(resolved.version, "3.0.5");
        assert_eq!(resolved.download_url, "http://repo/pool/h/htop_3.0.5.deb");
        assert_eq!(*fetcher.requests.borrow(), vec![repo().packages_url()]);
    }

    #[test]
    fn test_resolve_missing_fields() {
        let fetcher = MockFetcher::new().with(&repo().packages_url(), gzip(CATALOG));

        let err = resolve_package(&fetcher, &repo(), "noversion", VersionOrder::Lexical).unwrap_err();
        assert!(matches!(err, Error::MissingFieldError(ref f) if f == "Version"));

        let err = resolve_package(&fetcher, &repo(), "nofile", VersionOrder::Lexical).unwrap_err();
        assert!(matches!(err, Error::MissingFieldError(ref f) if f == "Filename"));
    }

    #[test]
    fn test_resolve_not_found() {
        let fetcher = MockFetcher::new().with(&repo().packages_url(), gzip(CATALOG));
        let err = resolve_package(&fetcher, &repo(), "nonexistent", VersionOrder::Lexical).unwrap_err();
        assert!(matches!(err, Error::NotFoundError(ref n) if n == "nonexistent"));
    }

    #[test]
    fn test_catalog_not_gzip() {
        let fetcher = MockFetcher::new().with(&repo().packages_url(), CATALOG.as_bytes().to_vec());
        let err = resolve_package(&fetcher, &repo(), "htop", VersionOrder::Lexical).unwrap_err();
        assert!(matches!(err, Error::DecompressError(_)));
    }

    #[test]
    fn test_list_versions() {
        let fetcher = MockFetcher::new().with(&repo().packages_url(), gzip(CATALOG));
        let versions = list_versions(&fetcher, &repo(), "htop", VersionOrder::Lexical).unwrap();
        assert_eq!(versions, vec!["3.0.5", "2.0.1"]);

        let err = list_versions(&fetcher, &repo(), "nonexistent", VersionOrder::Lexical).unwrap_err();
        assert!(matches!(err, Error::NotFoundError(_)));
    }

    #[test]
    fn test_fetch_package_writes_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("htop.deb");
        fs::write(&dest, b"stale").unwrap();

        let fetcher = MockFetcher::new()
            .with(&repo().packages_url(), gzip(CATALOG))
            .with("http://repo/pool/h/htop_3.0.5.deb", b"!<arch>\nnew".to_vec());

        let saved = fetch_package(&fetcher, &repo(), "htop", VersionOrder::Lexical, &dest).unwrap();
        assert_eq!(saved, dest);
        assert_eq!(fs::read(&dest).unwrap(), b"!<arch>\nnew");
        assert!(!temp_dir.path().join("htop.tmp").exists());
    }

    #[test]
    fn test_fetch_package_artifact_failure_leaves_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("htop.deb");

        let fetcher = MockFetcher::new().with(&repo().packages_url(), gzip(CATALOG));
        let err = fetch_package(&fetcher, &repo(), "htop", VersionOrder::Lexical, &dest).unwrap_err();

        assert!(err.is_transport());
        assert!(!dest.exists());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(default_output_path("htop"), PathBuf::from("htop.deb"));
    }
}
