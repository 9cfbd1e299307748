/// Query API Module
///
/// [`Database`] is the facade application code talks to. Every operation
/// runs through the statement executor and differs only in how the
/// resulting cursor is consumed.

use crate::config::DatabaseConfig;
use crate::core::db::connection::ConnectionManager;
use crate::core::db::executor::{ErrorLogger, StatementExecutor, StatementHandle};
use crate::core::db::transaction::{TransactionController, TransactionState};
use crate::core::db::value::{Params, Row, Value};
use crate::core::{DboError, Result};
use std::sync::{Arc, Mutex, MutexGuard};

/// A database handle: one connection, its executor and its transaction state
///
/// `Database` is `Send` but not `Sync`. Give each worker its own handle, or
/// share one through [`SharedDatabase`], which serializes access.
#[derive(Debug)]
pub struct Database {
    executor: StatementExecutor,
    transactions: TransactionController,
}

impl Database {
    /// Creates a handle that connects on first use
    pub fn new(config: DatabaseConfig) -> Self {
        Database {
            executor: StatementExecutor::new(ConnectionManager::new(config)),
            transactions: TransactionController::new(),
        }
    }

    /// Creates a handle and opens its connection immediately
    ///
    /// # Errors
    ///
    /// `DboError::Connection` if the backend cannot be reached,
    /// `DboError::Config` for an invalid configuration.
    pub fn connect(config: DatabaseConfig) -> Result<Self> {
        let db = Database::new(config);
        db.executor.connections().get_instance()?;
        Ok(db)
    }

    pub fn is_connected(&self) -> bool {
        self.executor.connections().is_connected()
    }

    pub fn config(&self) -> &DatabaseConfig {
        self.executor.connections().config()
    }

    /// Registers a callback that receives the raw driver message of every failed statement
    pub fn set_error_logger<F>(&mut self, logger: F)
    where
        F: Fn(&str) + Send + 'static,
    {
        let logger: ErrorLogger = Box::new(logger);
        self.executor.set_error_logger(logger);
    }

    pub fn clear_error_logger(&mut self) {
        self.executor.clear_error_logger();
    }

    /// Runs a statement and hands back its cursor; the caller closes it
    pub fn prepare_and_execute(&self, sql: &str, params: impl Into<Params>) -> Result<StatementHandle> {
        self.executor.prepare_and_execute(sql, &params.into())
    }

    /// Runs a statement that needs no parameters and whose rows are not wanted
    ///
    /// Meant for quick mutations such as bumping a counter or deleting a
    /// temporary record.
    pub fn execute_and_close(&self, sql: &str) -> Result<bool> {
        let mut statement = self.executor.prepare_and_execute(sql, &Params::None)?;
        statement.close_cursor();
        Ok(true)
    }

    /// Returns every row, in the order the backend produced them
    ///
    /// Zero rows yields an empty vector.
    pub fn select(&self, sql: &str, params: impl Into<Params>) -> Result<Vec<Row>> {
        let mut statement = self.executor.prepare_and_execute(sql, &params.into())?;
        let mut results = Vec::new();
        while let Some(row) = statement.fetch() {
            results.push(row);
        }
        statement.close_cursor();
        Ok(results)
    }

    /// Returns the first row, if any
    ///
    /// Intended for queries that are singular by construction, e.g. a lookup
    /// on a unique column.
    pub fn select_single_row(&self, sql: &str, params: impl Into<Params>) -> Result<Option<Row>> {
        let mut statement = self.executor.prepare_and_execute(sql, &params.into())?;
        let row = statement.fetch();
        statement.close_cursor();
        Ok(row)
    }

    /// Returns the first column of the first row
    ///
    /// `None` means the query produced no rows. A NULL column comes back as
    /// `Some(Value::Null)`.
    pub fn select_single_field(&self, sql: &str, params: impl Into<Params>) -> Result<Option<Value>> {
        let mut statement = self.executor.prepare_and_execute(sql, &params.into())?;
        let row = statement.fetch();
        statement.close_cursor();
        Ok(row.and_then(|row| row.into_values().into_iter().next()))
    }

    /// Inserts a record and returns the id of the inserted row as text
    pub fn insert(&self, sql: &str, params: impl Into<Params>) -> Result<String> {
        let mut statement = self.executor.prepare_and_execute(sql, &params.into())?;
        let id = statement.last_insert_id().to_string();
        statement.close_cursor();
        Ok(id)
    }

    /// Returns the number of rows the backend reports as changed
    pub fn update(&self, sql: &str, params: impl Into<Params>) -> Result<u64> {
        let mut statement = self.executor.prepare_and_execute(sql, &params.into())?;
        let row_count = statement.row_count();
        statement.close_cursor();
        Ok(row_count)
    }

    pub fn start_transaction(&self) -> Result<()> {
        self.transactions.start(&self.executor)
    }

    pub fn commit_transaction(&self) -> Result<()> {
        self.transactions.commit(&self.executor)
    }

    /// Abandons the active transaction. Failed statements never do this implicitly.
    pub fn rollback_transaction(&self) -> Result<()> {
        self.transactions.rollback(&self.executor)
    }

    pub fn transaction_state(&self) -> TransactionState {
        self.transactions.current_state(&self.executor)
    }
}

/// A [`Database`] shared between threads behind a mutex
///
/// Hold the guard from [`SharedDatabase::lock`] across a whole transaction;
/// releasing it between statements lets another thread's queries land
/// inside the transaction.
#[derive(Debug, Clone)]
pub struct SharedDatabase {
    inner: Arc<Mutex<Database>>,
}

impl SharedDatabase {
    pub fn new(db: Database) -> Self {
        SharedDatabase {
            inner: Arc::new(Mutex::new(db)),
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, Database>> {
        self.inner
            .lock()
            .map_err(|_| DboError::App("Failed to acquire database lock".to_string()))
    }
}

/// Represents different SQL statement types for dispatch
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    /// BEGIN/COMMIT/ROLLBACK transaction commands
    Transaction,
    Other,
}

impl StatementType {
    /// Determines the statement type from a SQL string
    pub fn from_sql(sql: &str) -> Self {
        let sql_upper = sql.trim().to_uppercase();

        if sql_upper.starts_with("SELECT") || sql_upper.starts_with("WITH") {
            StatementType::Select
        } else if sql_upper.starts_with("INSERT") || sql_upper.starts_with("REPLACE") {
            StatementType::Insert
        } else if sql_upper.starts_with("UPDATE") {
            StatementType::Update
        } else if sql_upper.starts_with("DELETE") {
            StatementType::Delete
        } else if sql_upper.starts_with("BEGIN")
            || sql_upper.starts_with("COMMIT")
            || sql_upper.starts_with("ROLLBACK")
        {
            StatementType::Transaction
        } else {
            StatementType::Other
        }
    }
}
