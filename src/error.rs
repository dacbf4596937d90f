//! Error types
//!
//! One enum per failure kind. Interactive failures (validation, clipboard,
//! export) are shown to the user; persistence failures only reach the log.

use std::path::PathBuf;

use thiserror::Error;

/// Generation was attempted with an empty name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter your name first")]
    EmptyName,
}

/// Rasterizing or writing the signature image failed.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The font database has no face that can be loaded at all
    #[error("no usable font found for '{0}'")]
    NoFontAvailable(String),

    #[error("failed to load font face: {0}")]
    FontLoad(String),

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    /// The download name would resolve outside the download directory
    #[error("refusing to write outside the download directory: {0:?}")]
    OutsideDirectory(PathBuf),

    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Placing the signature on the clipboard failed.
#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("copy command failed: {0}")]
    CopyFailed(String),

    /// The fallback path found nothing selected to copy
    #[error("nothing selected")]
    EmptySelection,
}

/// Saving the signature to the backend failed. Logged, never surfaced.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The backend answered with a non-success status
    #[error("Failed to save signature: server responded {0}")]
    Rejected(reqwest::StatusCode),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        match err {
            arboard::Error::ClipboardNotSupported => ClipboardError::Unavailable(err.to_string()),
            other => ClipboardError::CopyFailed(other.to_string()),
        }
    }
}
