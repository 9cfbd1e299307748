/// Core Module for SQLDBO
///
/// This module contains the database access layer and the error type used
/// throughout the crate.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{DboError, Result};
