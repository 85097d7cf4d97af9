// src/lib.rs

//! debfetch
//!
//! Fetches the newest build of one package from a Debian-style repository.
//!
//! # Architecture
//!
//! - Catalog: `dists/<dist>/<component>/binary-<arch>/Packages.gz`, parsed in a
//!   single pass into [`repository::parsers::PackageRecord`]s
//! - Selection: newest `Version` under a pluggable [`version::VersionCompare`]
//! - Download: `<repo>/<Filename>` saved as `<package>.deb`
//! - Transport: behind the [`repository::Fetcher`] trait so the pipeline runs
//!   without a network in tests

mod error;
pub mod repository;
pub mod version;

pub use error::{Error, Result};
