//! Proposed actions awaiting quorum
//!
//! An [`Action`] is one transfer or call proposed by an owner, together with
//! the set of owners currently approving it.

use crate::crypto::Address;
use crate::ledger::Call;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Status of an action
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionStatus {
    /// Waiting for execution, with the current number of approvals
    Pending { approvals: usize },
    /// Executed; no further approve, revoke or execute is accepted
    Executed,
}

/// A proposed transfer or call
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Action {
    /// Position in the wallet's action log
    pub index: usize,
    /// Recipient of the value and target of the payload
    pub destination: Address,
    /// Amount to transfer
    pub amount: u128,
    /// Opaque call data
    pub payload: Vec<u8>,
    /// Set once the executor has succeeded
    pub executed: bool,
    /// Owner who proposed the action
    pub submitted_by: Address,
    /// Submission timestamp
    pub submitted_at: DateTime<Utc>,
    /// Execution timestamp
    pub executed_at: Option<DateTime<Utc>>,
    /// Owners currently approving
    approvals: BTreeSet<Address>,
}

impl Action {
    /// Create a new action with no approvals
    pub fn new(
        index: usize,
        submitted_by: Address,
        destination: Address,
        amount: u128,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            index,
            destination,
            amount,
            payload,
            executed: false,
            submitted_by,
            submitted_at: Utc::now(),
            executed_at: None,
            approvals: BTreeSet::new(),
        }
    }

    /// Whether `owner` currently approves this action
    pub fn is_approved_by(&self, owner: &Address) -> bool {
        self.approvals.contains(owner)
    }

    /// Number of approvals collected
    pub fn approval_count(&self) -> usize {
        self.approvals.len()
    }

    /// Owners currently approving, in address order
    pub fn approvers(&self) -> impl Iterator<Item = &Address> {
        self.approvals.iter()
    }

    /// Whether the action has at least `required` approvals
    pub fn has_quorum(&self, required: usize) -> bool {
        self.approvals.len() >= required
    }

    pub fn status(&self) -> ActionStatus {
        if self.executed {
            ActionStatus::Executed
        } else {
            ActionStatus::Pending {
                approvals: self.approvals.len(),
            }
        }
    }

    /// The call handed to the executor, drawing value from `source`
    pub fn call(&self, source: Address) -> Call {
        Call {
            source,
            destination: self.destination,
            amount: self.amount,
            payload: self.payload.clone(),
        }
    }

    /// Returns false if `owner` had already approved
    pub(crate) fn add_approval(&mut self, owner: Address) -> bool {
        self.approvals.insert(owner)
    }

    /// Returns false if `owner` had not approved
    pub(crate) fn remove_approval(&mut self, owner: &Address) -> bool {
        self.approvals.remove(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    #[test]
    fn test_action_creation() {
        let action = Action::new(0, addr(1), addr(9), 1000, vec![0x00]);

        assert_eq!(action.index, 0);
        assert!(!action.executed);
        assert!(action.executed_at.is_none());
        assert_eq!(action.approval_count(), 0);
        assert_eq!(action.status(), ActionStatus::Pending { approvals: 0 });
        // Submitting does not approve
        assert!(!action.is_approved_by(&addr(1)));
    }

    #[test]
    fn test_approval_bookkeeping() {
        let mut action = Action::new(0, addr(1), addr(9), 1000, vec![]);

        assert!(action.add_approval(addr(1)));
        assert!(!action.add_approval(addr(1)));
        assert!(action.add_approval(addr(2)));
        assert_eq!(action.approval_count(), 2);
        assert!(action.has_quorum(2));
        assert!(!action.has_quorum(3));

        assert!(action.remove_approval(&addr(1)));
        assert!(!action.remove_approval(&addr(1)));
        assert!(action.is_approved_by(&addr(2)));
        assert_eq!(action.approvers().collect::<Vec<_>>(), vec![&addr(2)]);
    }

    #[test]
    fn test_status_executed() {
        let mut action = Action::new(0, addr(1), addr(9), 1000, vec![]);
        action.add_approval(addr(1));
        action.executed = true;
        assert_eq!(action.status(), ActionStatus::Executed);
    }

    #[test]
    fn test_call_from_action() {
        let action = Action::new(4, addr(1), addr(9), 55, vec![0xca, 0xfe]);
        let call = action.call(addr(7));

        assert_eq!(call.source, addr(7));
        assert_eq!(call.destination, addr(9));
        assert_eq!(call.amount, 55);
        assert_eq!(call.payload, vec![0xca, 0xfe]);
    }
}
