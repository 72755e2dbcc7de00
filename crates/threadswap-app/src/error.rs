// Rust guideline compliant 2026-10-19

//! Error handling for Threadswap application services.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use threadswap_core::Error as CoreError;

/// Result type alias for application-level operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Stable error codes for tool and command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The requested entity was not found.
    NotFound,
    /// The provided identifier matched multiple entities.
    AmbiguousId,
    /// The operation is not valid for the entity's current status.
    InvalidState,
    /// The caller lacks the required ownership or role.
    Forbidden,
    /// Input was malformed or self-referential.
    InvalidArgument,
    /// The caller's points balance is too low.
    InsufficientFunds,
    /// A duplicate of an existing record.
    Conflict,
    /// IO failure while reading or writing the data directory.
    IoError,
    /// JSON serialization or parsing failed.
    JsonError,
    /// The store could not complete the request.
    StorageError,
    /// The data directory has not been initialized.
    RepoNotInitialized,
    /// The request included invalid inputs.
    InvalidInput,
    /// A fallback for unexpected errors.
    Unknown,
}

impl ErrorCode {
    /// Returns the wire name of the code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "not_found",
            ErrorCode::AmbiguousId => "ambiguous_id",
            ErrorCode::InvalidState => "invalid_state",
            ErrorCode::Forbidden => "forbidden",
            ErrorCode::InvalidArgument => "invalid_argument",
            ErrorCode::InsufficientFunds => "insufficient_funds",
            ErrorCode::Conflict => "conflict",
            ErrorCode::IoError => "io_error",
            ErrorCode::JsonError => "json_error",
            ErrorCode::StorageError => "storage_error",
            ErrorCode::RepoNotInitialized => "repo_not_initialized",
            ErrorCode::InvalidInput => "invalid_input",
            ErrorCode::Unknown => "unknown",
        }
    }
}

/// Application-level errors with stable mapping to error codes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Data directory is missing or not initialized.
    #[error("Threadswap not initialized at {path}. Run 'tsw init' first.")]
    RepoNotInitialized {
        /// Path where `.threadswap` was expected.
        path: PathBuf,
    },

    /// Invalid input was provided by the caller.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error from core library operations.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// IO error not represented by core errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Returns a stable error code for the error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::RepoNotInitialized { .. } => ErrorCode::RepoNotInitialized,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::Io(_) => ErrorCode::IoError,
            AppError::Core(core) => match core {
                CoreError::NotFound(_) => ErrorCode::NotFound,
                CoreError::AmbiguousId(_, _) => ErrorCode::AmbiguousId,
                CoreError::InvalidState(_) => ErrorCode::InvalidState,
                CoreError::Forbidden(_) => ErrorCode::Forbidden,
                CoreError::InvalidArgument(_) => ErrorCode::InvalidArgument,
                CoreError::InsufficientFunds { .. } => ErrorCode::InsufficientFunds,
                CoreError::Conflict(_) => ErrorCode::Conflict,
                CoreError::Io(_) => ErrorCode::IoError,
                CoreError::Json(_) => ErrorCode::JsonError,
                CoreError::Storage(_) => ErrorCode::StorageError,
            },
        }
    }

    /// Returns structured details for errors that benefit from extra context.
    #[must_use]
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::RepoNotInitialized { path } => Some(serde_json::json!({
                "path": path,
            })),
            AppError::InvalidInput(_) | AppError::Io(_) => None,
            AppError::Core(core) => match core {
                CoreError::AmbiguousId(partial, matches) => Some(serde_json::json!({
                    "partial": partial,
                    "matches": matches,
                })),
                CoreError::InsufficientFunds {
                    required,
                    available,
                } => Some(serde_json::json!({
                    "required": required,
                    "available": available,
                })),
                _ => None,
            },
        }
    }

    /// Returns the core error, if this wraps one.
    #[must_use]
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            AppError::Core(core) => Some(core),
            _ => None,
        }
    }
}
