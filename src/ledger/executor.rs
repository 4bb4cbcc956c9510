//! The external transfer/call boundary
//!
//! The wallet engine never moves value itself. When an action executes, the
//! engine hands a [`Call`] to an [`Executor`] and only learns whether it
//! succeeded.

use crate::crypto::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported by an executor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("Insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: u128, need: u128 },
    #[error("Balance overflow for {0}")]
    BalanceOverflow(Address),
    #[error("Call to {destination} rejected: {reason}")]
    Rejected { destination: Address, reason: String },
}

/// A value transfer and/or call handed to the executor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// The wallet the value is taken from
    pub source: Address,
    /// Recipient of the value and target of the payload
    pub destination: Address,
    /// Amount to transfer
    pub amount: u128,
    /// Opaque call data
    pub payload: Vec<u8>,
}

/// Performs the underlying transfer or call for an executed action.
///
/// Implementations must be all-or-nothing: an `Err` means nothing happened.
pub trait Executor {
    fn execute(&mut self, call: &Call) -> Result<(), ExecutorError>;
}

impl<F> Executor for F
where
    F: FnMut(&Call) -> Result<(), ExecutorError>,
{
    fn execute(&mut self, call: &Call) -> Result<(), ExecutorError> {
        self(call)
    }
}
