// src/error.rs

use thiserror::Error;

/// Core error types for debfetch
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be constructed
    #[error("Failed to initialize: {0}")]
    InitError(String),

    /// Network request failed or returned a non-success status
    #[error("Download error: {0}")]
    DownloadError(String),

    /// Catalog body was not valid gzip or not valid UTF-8
    #[error("Decompression error: {0}")]
    DecompressError(String),

    /// No catalog record matched the requested package
    #[error("Cannot find package {0}")]
    NotFoundError(String),

    /// Selected record lacks a field the download needs
    #[error("Package record is missing the {0} field")]
    MissingFieldError(String),
}

impl Error {
    /// True for failures of the network fetch or of reading its body.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::DownloadError(_) | Error::DecompressError(_))
    }
}

/// Result type alias using debfetch's Error type
pub type Result<T> = std::result::Result<T, Error>;
