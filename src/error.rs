//! Error types for Josephus
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in the elimination core
#[derive(Debug, Error)]
pub enum JosephusError {
    /// Participant count or step size outside the accepted range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The renderer faulted while handling a frame
    #[error("Render error: {0}")]
    Render(String),

    /// A background task failed or could not be joined
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Josephus operations
pub type Result<T> = std::result::Result<T, JosephusError>;
