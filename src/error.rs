//! Error types for minfy-capture
//!
//! Field-level extraction never fails: missing structure degrades to typed
//! defaults inside the extractors. The errors here cover the three places
//! where a capture can actually be refused or fail:
//! - Record validation before persistence ([`ValidationError`])
//! - The storage collaborator ([`StorageError`], I/O, network)
//! - Configuration and serialization

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for minfy-capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for minfy-capture
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "base_url")
        key: Option<String>,
    },

    /// A record failed validation and was not persisted
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage collaborator error
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error while fetching a remote byte source
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Reasons the manifest assembler refuses a record
///
/// Each variant carries the record's `rawUrl` (possibly empty) so the
/// rejection can be reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The record has no identifier
    #[error("record {raw_url:?} has an empty id")]
    MissingId {
        /// The record's canonical URL
        raw_url: String,
    },

    /// The record has no canonical URL
    #[error("record has an empty rawUrl")]
    MissingRawUrl {
        /// Always empty, kept for a uniform shape
        raw_url: String,
    },

    /// The author could not be identified
    #[error("record {raw_url:?} has an empty author id")]
    MissingAuthorId {
        /// The record's canonical URL
        raw_url: String,
    },

    /// The author has no display name
    #[error("record {raw_url:?} has an empty author name")]
    MissingAuthorName {
        /// The record's canonical URL
        raw_url: String,
    },
}

impl ValidationError {
    /// The `rawUrl` of the rejected record
    pub fn raw_url(&self) -> &str {
        match self {
            ValidationError::MissingId { raw_url }
            | ValidationError::MissingRawUrl { raw_url }
            | ValidationError::MissingAuthorId { raw_url }
            | ValidationError::MissingAuthorName { raw_url } => raw_url,
        }
    }
}

/// Errors raised by the storage collaborator
#[derive(Debug, Error)]
pub enum StorageError {
    /// File collision at destination that the conflict policy cannot resolve
    #[error("file collision at {path}: {reason}")]
    FileCollision {
        /// The path where the collision occurred
        path: PathBuf,
        /// The reason for the collision
        reason: String,
    },

    /// A planned path is unusable (absolute, escapes the output directory, no file name)
    #[error("invalid path {path}: {reason}")]
    InvalidPath {
        /// The invalid path
        path: PathBuf,
        /// The reason the path is invalid
        reason: String,
    },

    /// A remote byte source answered with a non-success status
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The requested URL
        url: String,
        /// The HTTP status code
        status: u16,
    },
}

impl Error {
    /// Machine-readable error code, stable across releases
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Validation(e) => match e {
                ValidationError::MissingId { .. } => "missing_id",
                ValidationError::MissingRawUrl { .. } => "missing_raw_url",
                ValidationError::MissingAuthorId { .. } => "missing_author_id",
                ValidationError::MissingAuthorName { .. } => "missing_author_name",
            },
            Error::Storage(e) => match e {
                StorageError::FileCollision { .. } => "file_collision",
                StorageError::InvalidPath { .. } => "invalid_path",
                StorageError::HttpStatus { .. } => "http_status",
            },
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::InvalidUrl(_) => "invalid_url",
            Error::Other(_) => "internal_error",
        }
    }

    /// Shorthand for a configuration error on a specific key
    pub(crate) fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}
