/// # Test Utilities Module
///
/// Database fixtures shared by the unit tests.

use crate::config::DatabaseConfig;
use crate::core::db::Database;
use crate::core::Result;
use crate::params;

const ACCOUNTS_SCHEMA: &str = "
    CREATE TABLE accounts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        balance INTEGER NOT NULL DEFAULT 0,
        note TEXT
    )";

/// Isolated in-memory database test fixture
pub struct DatabaseFixture {
    pub db: Database,
}

impl DatabaseFixture {
    /// Create a fixture with the accounts schema and no rows
    pub fn new() -> Result<Self> {
        let db = Database::connect(DatabaseConfig::in_memory())?;
        db.execute_and_close(ACCOUNTS_SCHEMA)?;
        Ok(DatabaseFixture { db })
    }

    /// Create fixture with three accounts: Alice (100), Bob (250), Carol (75)
    pub fn with_sample_data() -> Result<Self> {
        let fixture = Self::new()?;
        let accounts = [
            ("Alice", 100, None),
            ("Bob", 250, Some("vip")),
            ("Carol", 75, Some("new")),
        ];
        for (name, balance, note) in accounts {
            fixture.db.insert(
                "INSERT INTO accounts (name, balance, note) VALUES (?, ?, ?)",
                params![name, balance, note],
            )?;
        }
        Ok(fixture)
    }
}
