//! Common error types for the backup plan UI

use thiserror::Error;

/// Common result type for backup plan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by every storage backend and the tools built on them
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV file (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The storage backend misbehaved in a way sqlx does not report
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No entry with the requested ID
    #[error("Entry not found: {0}")]
    NotFound(u16),

    /// A stored or supplied entry violates the data model
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    /// Every u16 ID is already in use
    #[error("No free entry ID left")]
    IdSpaceExhausted,
}
