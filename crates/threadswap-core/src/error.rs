// Rust guideline compliant 2026-10-19

//! Error types for the Threadswap core library.

use thiserror::Error;

/// Result type alias for Threadswap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Threadswap operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Entity id does not resolve.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation is not valid for the current status.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Caller lacks the required ownership or role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Malformed or self-referential input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Balance is below the required amount.
    #[error("Insufficient points: {required} required, {available} available")]
    InsufficientFunds {
        /// Points the operation needs.
        required: i64,
        /// Points the user holds.
        available: i64,
    },

    /// Duplicate of an existing record.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Ambiguous partial ID.
    #[error("Ambiguous ID: {0} matches {1:?}")]
    AmbiguousId(String, Vec<String>),

    /// Store could not complete the request.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Returns true for the precondition failures of the lifecycle taxonomy.
    ///
    /// Store, IO and serialization failures return false.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_)
                | Error::InvalidState(_)
                | Error::Forbidden(_)
                | Error::InvalidArgument(_)
                | Error::InsufficientFunds { .. }
                | Error::Conflict(_)
                | Error::AmbiguousId(_, _)
        )
    }
}
