//! External execution boundary and an in-memory ledger behind it

pub mod executor;
pub mod ledger;

pub use executor::{Call, Executor, ExecutorError};
pub use ledger::{CallRecord, Ledger, MAX_CALL_HISTORY};
