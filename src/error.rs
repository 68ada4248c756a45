//! Error types for the dashboard client.

use thiserror::Error;

/// Result type alias for dashboard client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for dashboard client operations
#[derive(Debug, Error)]
pub enum Error {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL could not be built or parsed
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Server answered with a non-success status
    #[error("API error: {path} returned {status}")]
    Api {
        status: reqwest::StatusCode,
        path: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTPステータスを取得（API エラーの場合のみ）
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Network(e) => e.status(),
            _ => None,
        }
    }
}
