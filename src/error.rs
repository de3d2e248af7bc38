//! Error types for nft-art-dl
//!
//! Every per-token failure is represented here so the pipeline can log it with
//! a machine-readable code and keep going. Only [`Error::Config`] and directory
//! level [`Error::Io`] failures are meant to stop a run.

use thiserror::Error;

/// Result type alias for nft-art-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for nft-art-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key or environment variable that caused the error
        key: Option<String>,
    },

    /// Transport-level HTTP failure (connect, timeout, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote answered with a non-success status
    #[error("request to {url} failed: {status} {reason}")]
    HttpStatus {
        /// The requested URL
        url: String,
        /// Numeric HTTP status
        status: u16,
        /// Reason phrase reported for the status (e.g. "Not Found")
        reason: String,
    },

    /// Metadata response body was not valid JSON
    #[error("invalid metadata response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Metadata was valid JSON but the expected image field is absent
    #[error("metadata has no usable `{field}` field")]
    MissingImage {
        /// Dotted path of the field that was expected
        field: &'static str,
    },

    /// Image was fetched but its declared MIME type has no known extension
    #[error("fetched content is not a supported image type: {content_type:?}")]
    UnsupportedContentType {
        /// The `Content-Type` header value, empty if absent
        content_type: String,
    },

    /// I/O error (output directory or artifact write)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a configuration error tied to a specific key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Machine-readable error code, used as a structured log field
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Network(_) => "network_error",
            Error::HttpStatus { .. } => "http_status",
            Error::Parse(_) => "parse_error",
            Error::MissingImage { .. } => "missing_image",
            Error::UnsupportedContentType { .. } => "unsupported_content_type",
            Error::Io(_) => "io_error",
        }
    }
}
