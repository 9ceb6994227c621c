//! Error types for jotter-core

use thiserror::Error;

/// Result type alias using jotter-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in jotter-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Failure reported by a `KeyValueStore` backend that has no error
    /// type of its own; the bundled libSQL backend reports `LibSql` instead
    #[error("Storage error: {0}")]
    Storage(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Username already registered
    #[error("User already exists: {0}")]
    UserExists(String),

    /// No active session; the caller must log in first
    #[error("Not logged in")]
    LoginRequired,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
