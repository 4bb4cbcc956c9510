//! In-memory account ledger
//!
//! A balance book that backs the wallet engine in the CLI and in tests. It
//! implements [`Executor`] by moving value from the call's source to its
//! destination.

use crate::crypto::Address;
use crate::ledger::executor::{Call, Executor, ExecutorError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of executed calls kept in the history
pub const MAX_CALL_HISTORY: usize = 100;

/// A call the ledger has applied
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallRecord {
    pub call: Call,
    pub timestamp: DateTime<Utc>,
}

/// Account balances plus a short history of applied calls
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// Balances: address -> amount
    balances: HashMap<Address, u128>,
    /// Applied calls (last 100)
    history: Vec<CallRecord>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            history: Vec::new(),
        }
    }

    /// Get balance of an address
    pub fn balance_of(&self, address: &Address) -> u128 {
        *self.balances.get(address).unwrap_or(&0)
    }

    /// Add funds to an address, returning the new balance
    pub fn credit(&mut self, address: Address, amount: u128) -> Result<u128, ExecutorError> {
        let balance = self
            .balance_of(&address)
            .checked_add(amount)
            .ok_or(ExecutorError::BalanceOverflow(address))?;
        self.balances.insert(address, balance);
        Ok(balance)
    }

    /// Move funds between two addresses
    ///
    /// Either both balances change or neither does.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), ExecutorError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(ExecutorError::InsufficientFunds {
                have: from_balance,
                need: amount,
            });
        }

        if from == to || amount == 0 {
            return Ok(());
        }

        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(ExecutorError::BalanceOverflow(*to))?;

        self.balances.insert(*from, from_balance - amount);
        self.balances.insert(*to, to_balance);
        Ok(())
    }

    /// Applied calls, oldest first
    pub fn history(&self) -> &[CallRecord] {
        &self.history
    }

    /// Get all accounts with a non-zero balance
    pub fn accounts(&self) -> Vec<(&Address, &u128)> {
        self.balances.iter().filter(|(_, &b)| b > 0).collect()
    }

    /// Sum of all balances, or `None` if it does not fit in a `u128`
    pub fn total_supply(&self) -> Option<u128> {
        self.balances
            .values()
            .try_fold(0u128, |total, &balance| total.checked_add(balance))
    }

    fn record(&mut self, call: &Call) {
        self.history.push(CallRecord {
            call: call.clone(),
            timestamp: Utc::now(),
        });
        if self.history.len() > MAX_CALL_HISTORY {
            self.history.remove(0);
        }
    }
}

impl Executor for Ledger {
    fn execute(&mut self, call: &Call) -> Result<(), ExecutorError> {
        self.transfer(&call.source, &call.destination, call.amount)?;
        self.record(call);

        log::debug!(
            "Ledger applied call {} -> {} ({} units, {} payload bytes)",
            call.source,
            call.destination,
            call.amount,
            call.payload.len()
        );

        Ok(())
    }
}
