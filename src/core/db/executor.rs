/// Statement Execution Module
///
/// Every statement in the crate, transaction primitives included, runs
/// through [`StatementExecutor`]. Driver failures stop here: the raw message
/// goes to the registered error logger and the caller receives
/// `DboError::Server`.

use crate::core::db::connection::ConnectionManager;
use crate::core::db::value::{Params, Row, Value};
use crate::core::{DboError, Result};
use rusqlite::types::ToSql;
use rusqlite::Connection;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// Callback receiving the raw driver message of a failed statement
pub type ErrorLogger = Box<dyn Fn(&str) + Send>;

/// Returns an error logger that forwards driver messages to `tracing`.
pub fn tracing_error_logger() -> ErrorLogger {
    Box::new(|message: &str| error!(driver_message = %message, "database statement failed"))
}

/// Result cursor of one executed statement
///
/// The statement has already run to completion when the handle is returned;
/// the handle holds its pending rows until they are fetched or the cursor
/// is closed.
#[derive(Debug)]
pub struct StatementHandle {
    columns: Arc<[String]>,
    rows: VecDeque<Row>,
    affected_rows: u64,
    last_insert_id: i64,
    closed: bool,
}

impl StatementHandle {
    /// Fetches the next row, or `None` once the results are exhausted or the cursor is closed
    pub fn fetch(&mut self) -> Option<Row> {
        if self.closed {
            return None;
        }
        self.rows.pop_front()
    }

    /// Column names of the result, empty for statements that return no rows
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Rows changed by an INSERT, UPDATE or DELETE; the row count for read-only statements
    pub fn row_count(&self) -> u64 {
        self.affected_rows
    }

    /// Id of the last row inserted on the connection, as reported right after execution
    pub fn last_insert_id(&self) -> i64 {
        self.last_insert_id
    }

    /// Releases the cursor and any rows not yet fetched
    pub fn close_cursor(&mut self) {
        self.rows.clear();
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Transaction primitives issued through the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionPrimitive {
    Begin,
    Commit,
    Rollback,
}

impl TransactionPrimitive {
    fn sql(self) -> &'static str {
        match self {
            TransactionPrimitive::Begin => "BEGIN",
            TransactionPrimitive::Commit => "COMMIT",
            TransactionPrimitive::Rollback => "ROLLBACK",
        }
    }
}

/// Prepares and executes statements against the managed connection
pub struct StatementExecutor {
    connections: ConnectionManager,
    error_logger: Option<ErrorLogger>,
}

impl StatementExecutor {
    pub fn new(connections: ConnectionManager) -> Self {
        StatementExecutor {
            connections,
            error_logger: None,
        }
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    pub fn set_error_logger(&mut self, logger: ErrorLogger) {
        self.error_logger = Some(logger);
    }

    pub fn clear_error_logger(&mut self) {
        self.error_logger = None;
    }

    /// Prepares `sql`, binds `params` and runs the statement
    ///
    /// # Errors
    ///
    /// `DboError::Server` for any driver failure (syntax, constraint, bind
    /// mismatch, I/O). Connection failures surface as they come from the
    /// connection manager.
    pub fn prepare_and_execute(&self, sql: &str, params: &Params) -> Result<StatementHandle> {
        let conn = self.connections.get_instance()?;
        debug!(sql, params = params.len(), "executing statement");
        run_statement(conn, sql, params).map_err(|e| self.mask(sql, e))
    }

    /// Issues a transaction primitive through the same failure handling as statements
    pub fn run_primitive(&self, primitive: TransactionPrimitive) -> Result<()> {
        let conn = self.connections.get_instance()?;
        let sql = primitive.sql();
        debug!(sql, "transaction primitive");
        conn.execute_batch(sql).map_err(|e| self.mask(sql, e))
    }

    fn mask(&self, sql: &str, e: rusqlite::Error) -> DboError {
        if let Some(logger) = &self.error_logger {
            logger(&e.to_string());
        }
        error!(sql, "statement failed");
        DboError::Server
    }
}

impl fmt::Debug for StatementExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementExecutor")
            .field("connections", &self.connections)
            .field("error_logger", &self.error_logger.is_some())
            .finish()
    }
}

fn run_statement(conn: &Connection, sql: &str, params: &Params) -> rusqlite::Result<StatementHandle> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Arc<[String]> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>()
        .into();
    let column_count = columns.len();
    let read_only = stmt.readonly();
    let changes_before = if read_only { 0 } else { total_changes(conn)? };

    let mut rows = VecDeque::new();
    {
        let mut cursor = match params {
            Params::None => stmt.query([])?,
            Params::Positional(values) => stmt.query(rusqlite::params_from_iter(values.iter()))?,
            Params::Named(values) => {
                let names: Vec<String> = values
                    .iter()
                    .map(|(name, _)| placeholder_name(name))
                    .collect();
                let bound: Vec<(&str, &dyn ToSql)> = names
                    .iter()
                    .zip(values.iter())
                    .map(|(name, (_, value))| (name.as_str(), value as &dyn ToSql))
                    .collect();
                stmt.query(bound.as_slice())?
            }
        };

        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(row.get::<_, Value>(i)?);
            }
            rows.push_back(Row::new(Arc::clone(&columns), values));
        }
    }

    // changes() keeps the count of the last INSERT/UPDATE/DELETE, so it only
    // describes this statement if the running total moved.
    let affected_rows = if read_only {
        rows.len() as u64
    } else if total_changes(conn)? == changes_before {
        0
    } else {
        conn.changes() as u64
    };

    Ok(StatementHandle {
        columns,
        rows,
        affected_rows,
        last_insert_id: conn.last_insert_rowid(),
        closed: false,
    })
}

/// Rows changed by INSERT/UPDATE/DELETE since the connection opened; DDL never counts.
fn total_changes(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT total_changes()", [], |row| row.get(0))
}

/// Named placeholders are bound with their sigil; accept keys without one.
fn placeholder_name(name: &str) -> String {
    if name.starts_with([':', '@', '$']) {
        name.to_string()
    } else {
        format!(":{}", name)
    }
}
