//! A small, safe interface to a relational database: parameterized
//! statements, single-row and single-field helpers, and flat transactions.
//!
//! ```
//! use sqldbo::{params, Database, DatabaseConfig, Value};
//!
//! let db = Database::connect(DatabaseConfig::in_memory())?;
//! db.execute_and_close("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT, balance INTEGER)")?;
//! let id = db.insert("INSERT INTO t (name, balance) VALUES (?, ?)", params!["Alice", 100])?;
//! let balance = db.select_single_field("SELECT balance FROM t WHERE id = ?", params![id])?;
//! assert_eq!(balance, Some(Value::Integer(100)));
//! # Ok::<(), sqldbo::DboError>(())
//! ```

// Core infrastructure modules
pub mod core;

// Collaborators
pub mod cache;
pub mod config;
pub mod guid;
pub mod session;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::config::{Config, DatabaseConfig};
pub use crate::core::db::{
    tracing_error_logger, Database, ErrorLogger, Params, Row, SharedDatabase, StatementHandle,
    StatementType, TransactionState, Value,
};
pub use crate::core::{DboError, Result};
