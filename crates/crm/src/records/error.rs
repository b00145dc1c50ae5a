//! Record store transport errors.

use thiserror::Error;

/// Errors that can occur when talking to the record store.
///
/// These are transport-level failures. An envelope with `success: false`
/// is not an error at this layer.
#[derive(Debug, Error)]
pub enum RecordClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Record store returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Unauthorized (unknown project or invalid public key).
    #[error("Unauthorized: invalid project credentials")]
    Unauthorized,

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),
}
