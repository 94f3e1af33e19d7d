//! Error types and handling infrastructure for dataroot.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types, with one variant per failure mode of the reader surface.
//!
//! ## Design Principles
//!
//! - **Fail at the point of violation**: construction, dispatch, and call-time
//!   failures are raised immediately and never retried internally
//! - **Context preservation**: errors carry the root, member path, or location
//!   they refer to
//! - **Consistency**: standardized Result type across all modules

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for dataroot operations.
///
/// This enum covers all failure modes of reader construction, location
/// resolution, member access, and image decoding. Downloader failures arrive
/// as [`DatarootError::Download`] values built by the collaborator and are
/// propagated without wrapping or retry.
#[derive(Error, Debug)]
pub enum DatarootError {
    /// A non-empty reader variant was constructed over a root that does not exist
    #[error("reader root does not exist: {path}")]
    RootNotFound { path: PathBuf },

    /// `open` was invoked on an empty reader, which holds no files
    #[error("cannot open '{path}': empty reader holds no files")]
    EmptyReader { path: String },

    /// The requested relative path is absent from the backing store
    #[error("file not found under {root}: '{path}'")]
    NotFound { root: PathBuf, path: String },

    /// More than one distinct local root resolved from the input locations
    #[error("resolved {} distinct roots {roots:?}; multi-root readers are unsupported", .roots.len())]
    MultiRootUnsupported { roots: Vec<PathBuf> },

    /// The resolved local path is neither a directory nor a recognized archive
    #[error("unsupported data format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Equality was requested across two different reader variants
    #[error("cannot compare a {left} reader with a {right} reader")]
    ComparisonUnsupported {
        left: &'static str,
        right: &'static str,
    },

    /// File system related errors (permission denied, interrupted reads, etc.)
    #[error("file operation failed: {message}")]
    File {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Archive index or member decoding errors from the zip/tar backends
    #[error("archive operation failed: {message}")]
    Archive { message: String },

    /// Image bytes that could not be decoded
    #[error("failed to decode image '{path}'")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// Downloader-originated failures (network retrieval, extraction)
    #[error("download failed: {message}")]
    Download { message: String },
}

/// Standard Result type for dataroot operations.
pub type Result<T> = std::result::Result<T, DatarootError>;

impl DatarootError {
    /// Create a File error from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::File {
            message: message.into(),
            source,
        }
    }

    /// Create an Archive error with a descriptive message
    pub fn archive(message: impl Into<String>) -> Self {
        Self::Archive {
            message: message.into(),
        }
    }

    /// Create a Download error with a descriptive message
    pub fn download(message: impl Into<String>) -> Self {
        Self::Download {
            message: message.into(),
        }
    }
}

// Automatic conversion from io::Error for call sites without extra context
impl From<std::io::Error> for DatarootError {
    fn from(err: std::io::Error) -> Self {
        Self::File {
            message: "IO operation failed".to_string(),
            source: err,
        }
    }
}

// walkdir wraps io errors with path context of its own; keep its message and
// surface the io source when one exists
impl From<walkdir::Error> for DatarootError {
    fn from(err: walkdir::Error) -> Self {
        let message = err.to_string();
        match err.into_io_error() {
            Some(source) => Self::File { message, source },
            None => Self::File {
                message,
                source: std::io::Error::other("directory walk failed"),
            },
        }
    }
}
