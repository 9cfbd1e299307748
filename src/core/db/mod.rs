/// Database Module
///
/// The database access layer, split into focused submodules:
/// - **Connection Management** (`connection.rs`): lazily opens and owns the one connection
/// - **Statement Execution** (`executor.rs`): the single path every statement takes, with error masking
/// - **Transactions** (`transaction.rs`): flat Idle/Active state machine
/// - **Query API** (`query.rs`): the `Database` facade used by application code
/// - **Values** (`value.rs`): bind values, parameters and name-keyed rows
///
/// ## Error Handling
///
/// Driver failures surface as `DboError::Server` or `DboError::Connection`;
/// the raw driver message is only handed to the optional error logger.
pub mod connection;
pub mod executor;
pub mod query;
pub mod transaction;
pub mod value;

pub use connection::*;
pub use executor::*;
pub use query::*;
pub use transaction::*;
pub use value::*;
