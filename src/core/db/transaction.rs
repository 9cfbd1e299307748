/// Transaction Control Module
///
/// Flat Idle/Active state machine over the backend's begin, commit and
/// rollback primitives. There is no nesting: starting twice is a no-op, and
/// committing or rolling back while idle is a no-op.

use crate::core::db::executor::{StatementExecutor, TransactionPrimitive};
use crate::core::Result;
use std::cell::Cell;
use tracing::debug;

/// Represents database transaction states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionState {
    /// No active transaction (autocommit mode)
    #[default]
    Idle,
    /// Transaction in progress
    Active,
}

/// Tracks and drives the transaction state of one connection
///
/// A statement failure while `Active` does not roll back on its own; the
/// caller decides whether to call [`TransactionController::rollback`].
#[derive(Debug, Default)]
pub struct TransactionController {
    state: Cell<TransactionState>,
}

impl TransactionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known state, without consulting the backend
    pub fn state(&self) -> TransactionState {
        self.state.get()
    }

    /// State after reconciling with the backend
    pub fn current_state(&self, executor: &StatementExecutor) -> TransactionState {
        self.sync(executor);
        self.state.get()
    }

    /// Idle -> Active; no-op when already active
    pub fn start(&self, executor: &StatementExecutor) -> Result<()> {
        if self.sync(executor) == TransactionState::Active {
            debug!("transaction already active");
            return Ok(());
        }
        executor.run_primitive(TransactionPrimitive::Begin)?;
        self.state.set(TransactionState::Active);
        Ok(())
    }

    /// Active -> Idle by committing; no-op when idle
    pub fn commit(&self, executor: &StatementExecutor) -> Result<()> {
        self.finish(executor, TransactionPrimitive::Commit)
    }

    /// Active -> Idle by rolling back; no-op when idle
    pub fn rollback(&self, executor: &StatementExecutor) -> Result<()> {
        self.finish(executor, TransactionPrimitive::Rollback)
    }

    fn finish(&self, executor: &StatementExecutor, primitive: TransactionPrimitive) -> Result<()> {
        if self.sync(executor) == TransactionState::Idle {
            return Ok(());
        }
        executor.run_primitive(primitive)?;
        self.state.set(TransactionState::Idle);
        Ok(())
    }

    /// The backend may end a transaction on its own (`INSERT OR ROLLBACK`,
    /// I/O errors, a COMMIT sent as a plain statement). Drops to Idle when it has.
    fn sync(&self, executor: &StatementExecutor) -> TransactionState {
        if self.state.get() == TransactionState::Active && !executor.connections().in_transaction() {
            debug!("backend already left the transaction");
            self.state.set(TransactionState::Idle);
        }
        self.state.get()
    }
}
