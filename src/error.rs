//! Error types for route-planner

use thiserror::Error;

/// Main error type for route-planner operations
#[derive(Error, Debug)]
pub enum Error {
    /// Request rejected before any outbound call was made
    #[error("{0}")]
    Validation(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// At least one query could not be resolved by any provider
    #[error("{message}")]
    Unresolved { query: String, message: String },

    /// An external provider failed or answered with something unusable
    #[error("{0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl Error {
    /// Whether the error is the caller's fault rather than ours or upstream's
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidCoordinates(_) | Self::Unresolved { .. }
        )
    }
}

/// Result type alias for route-planner operations
pub type Result<T> = std::result::Result<T, Error>;
