//! Common error types for yome

use thiserror::Error;

/// Common result type for yome operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the yome crates
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

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid caller input (unknown field, unknown column, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Report query matched no rows for the given locus tag
    #[error("No knowledgebase rows for locus tag: {0}")]
    EmptyResult(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
