//! Common error types for CourseBridge

use thiserror::Error;

/// Common result type for CourseBridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by the database layer and the server
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested row or resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid caller input (bad enum value, malformed date, out-of-range id)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
