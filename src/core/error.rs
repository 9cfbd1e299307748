/// SQLDBO Error Module
///
/// This module defines the error type shared by every part of the crate.
/// Driver failures are never converted implicitly: the connection manager
/// and the statement executor map them into masked variants whose messages
/// carry no driver text.
use thiserror::Error;

/// Error type for all sqldbo operations.
#[derive(Error, Debug)]
pub enum DboError {
    /// The database connection could not be established or configured
    #[error("Database connection error occurred")]
    Connection,

    /// A statement failed inside the driver; the detail goes to the error logger only
    #[error("Server error occurred")]
    Server,

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session store misuse
    #[error("Session error: {0}")]
    Session(String),

    /// Cached values that could not be converted
    #[error("Cache error: {0}")]
    Cache(String),

    /// Generic application errors for unexpected conditions
    #[error("Application error: {0}")]
    App(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Result to use DboError as the error type.
pub type Result<T> = std::result::Result<T, DboError>;
