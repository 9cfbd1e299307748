/// Connection Management Module
///
/// Owns the single physical database connection of a `Database` and opens it
/// lazily on first use.

use crate::config::DatabaseConfig;
use crate::core::{DboError, Result};
use once_cell::unsync::OnceCell;
use rusqlite::Connection;
use tracing::{debug, error};

/// Settings applied to every new connection
const CONNECTION_PRAGMAS: &str = "
    PRAGMA foreign_keys = ON;
";

/// Connection manager for database operations
///
/// The connection is created the first time [`ConnectionManager::get_instance`]
/// succeeds and every later call returns the same one. A failed attempt
/// leaves the manager empty, so the next call tries again. There is no
/// teardown short of dropping the manager.
#[derive(Debug)]
pub struct ConnectionManager {
    config: DatabaseConfig,
    connection: OnceCell<Connection>,
}

impl ConnectionManager {
    /// Creates a manager without connecting
    pub fn new(config: DatabaseConfig) -> Self {
        ConnectionManager {
            config,
            connection: OnceCell::new(),
        }
    }

    /// Returns the connection, opening it on the first call
    ///
    /// # Errors
    ///
    /// `DboError::Config` for an invalid configuration, `DboError::Connection`
    /// when the driver cannot open or configure the link. Neither carries
    /// driver text.
    pub fn get_instance(&self) -> Result<&Connection> {
        self.connection
            .get_or_try_init(|| open_connection(&self.config))
    }

    /// Checks if the connection has been established
    pub fn is_connected(&self) -> bool {
        self.connection.get().is_some()
    }

    /// Whether the backend currently has an open transaction
    pub fn in_transaction(&self) -> bool {
        self.connection
            .get()
            .map(|conn| !conn.is_autocommit())
            .unwrap_or(false)
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }
}

fn open_connection(config: &DatabaseConfig) -> Result<Connection> {
    config.validate()?;
    let dsn = config.dsn();
    debug!(%dsn, "opening database connection");

    let conn = Connection::open(&config.database).map_err(|e| {
        debug!(%dsn, code = ?e.sqlite_error_code(), "driver refused connection");
        error!(%dsn, "failed to open database connection");
        DboError::Connection
    })?;

    conn.execute_batch(CONNECTION_PRAGMAS).map_err(|e| {
        debug!(%dsn, code = ?e.sqlite_error_code(), "driver refused connection settings");
        error!(%dsn, "failed to configure database connection");
        DboError::Connection
    })?;

    debug!(%dsn, "database connection established");
    Ok(conn)
}
