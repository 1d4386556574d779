//! Error types for Kiln
//!
//! All modules use `KilnResult<T>` as their return type.

use thiserror::Error;

/// Result type alias for Kiln operations
pub type KilnResult<T> = Result<T, KilnError>;

/// All errors that can occur while handling a control API request
#[derive(Error, Debug)]
pub enum KilnError {
    // Request errors
    #[error("Invalid cache option entry: {reason}")]
    CacheOptionInvalid { reason: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
