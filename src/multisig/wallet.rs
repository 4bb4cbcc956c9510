//! Multi-signature wallet engine
//!
//! A fixed set of owners controls a shared account. Any owner may propose an
//! action; it executes only once at least `required` distinct owners approve.

use crate::crypto::{sha256, Address};
use crate::ledger::{Executor, ExecutorError};
use crate::multisig::events::{EventSink, WalletEvent};
use crate::multisig::transaction::{Action, ActionStatus};
use chrono::{DateTime, Utc};
use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::Digest;
use std::collections::HashSet;
use thiserror::Error;

/// Errors related to multisig operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MultisigError {
    #[error("Owners required")]
    OwnersRequired,
    #[error("Invalid threshold: {required} of {owners} owners")]
    InvalidThreshold { required: usize, owners: usize },
    #[error("Invalid owner: {0}")]
    InvalidOwner(Address),
    #[error("Duplicate owner: {0}")]
    DuplicateOwner(Address),
    #[error("Caller is not an owner: {0}")]
    NotOwner(Address),
    #[error("Action not found: {0}")]
    ActionNotFound(usize),
    #[error("Action {index} already approved by {owner}")]
    AlreadyApproved { index: usize, owner: Address },
    #[error("Action {index} not approved by {owner}")]
    NotApproved { index: usize, owner: Address },
    #[error("Action already executed: {0}")]
    AlreadyExecuted(usize),
    #[error("Insufficient approvals for action {index}: have {have}, need {need}")]
    InsufficientApprovals {
        index: usize,
        have: usize,
        need: usize,
    },
    #[error("Execution of action {index} failed: {source}")]
    ExecutionFailed {
        index: usize,
        #[source]
        source: ExecutorError,
    },
}

/// Owner set and approval threshold, validated at construction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigRecord", into = "ConfigRecord")]
pub struct MultisigConfig {
    /// Owners in the order they were given
    owners: Vec<Address>,
    /// Membership index over `owners`
    owner_set: HashSet<Address>,
    /// Minimum approvals needed to execute (M in M-of-N)
    required: usize,
}

#[derive(Serialize, Deserialize)]
struct ConfigRecord {
    owners: Vec<Address>,
    required: usize,
}

impl MultisigConfig {
    /// Create a new multisig configuration
    ///
    /// # Errors
    /// Checked in this order: empty owner list, threshold outside
    /// `1..=owners.len()`, zero address, repeated address.
    pub fn new(owners: Vec<Address>, required: usize) -> Result<Self, MultisigError> {
        if owners.is_empty() {
            return Err(MultisigError::OwnersRequired);
        }

        if required == 0 || required > owners.len() {
            return Err(MultisigError::InvalidThreshold {
                required,
                owners: owners.len(),
            });
        }

        if let Some(zero) = owners.iter().find(|owner| owner.is_zero()) {
            return Err(MultisigError::InvalidOwner(*zero));
        }

        let mut owner_set = HashSet::with_capacity(owners.len());
        for owner in &owners {
            if !owner_set.insert(*owner) {
                return Err(MultisigError::DuplicateOwner(*owner));
            }
        }

        Ok(Self {
            owners,
            owner_set,
            required,
        })
    }

    /// Get the threshold (M)
    pub fn required(&self) -> usize {
        self.required
    }

    /// Owners in construction order
    pub fn owners(&self) -> &[Address] {
        &self.owners
    }

    /// Get the owner count (N)
    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    pub fn is_owner(&self, address: &Address) -> bool {
        self.owner_set.contains(address)
    }

    /// Get description like "2-of-3"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.required, self.owners.len())
    }
}

impl TryFrom<ConfigRecord> for MultisigConfig {
    type Error = MultisigError;

    fn try_from(record: ConfigRecord) -> Result<Self, Self::Error> {
        Self::new(record.owners, record.required)
    }
}

impl From<MultisigConfig> for ConfigRecord {
    fn from(config: MultisigConfig) -> Self {
        Self {
            owners: config.owners,
            required: config.required,
        }
    }
}

/// A multi-signature wallet: owner set, action log and approval matrix
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultisigWallet {
    /// The wallet's own account; executed calls draw value from it
    address: Address,
    /// Wallet configuration
    config: MultisigConfig,
    /// Append-only action log; position is the action index
    actions: Vec<Action>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Events of committed operations not yet published
    #[serde(skip)]
    outbox: Vec<WalletEvent>,
}

impl MultisigWallet {
    /// Create a wallet from a candidate owner list and threshold
    pub fn new(owners: Vec<Address>, required: usize) -> Result<Self, MultisigError> {
        let config = MultisigConfig::new(owners, required)?;
        Ok(Self::from_config(config))
    }

    /// Create a wallet from an already validated configuration
    pub fn from_config(config: MultisigConfig) -> Self {
        let address = Self::generate_address(&config);

        log::info!(
            "Multisig wallet {} created ({})",
            address,
            config.description()
        );

        Self {
            address,
            config,
            actions: Vec::new(),
            created_at: Utc::now(),
            outbox: Vec::new(),
        }
    }

    /// Derive the wallet address from its configuration
    ///
    /// Address = RIPEMD160(SHA256(required || sorted owners))
    fn generate_address(config: &MultisigConfig) -> Address {
        let mut sorted_owners = config.owners.clone();
        sorted_owners.sort();

        let mut script_data = (config.required as u64).to_be_bytes().to_vec();
        for owner in &sorted_owners {
            script_data.extend_from_slice(owner.as_bytes());
        }

        let sha256_hash = sha256(&script_data);

        let mut ripemd = Ripemd160::new();
        ripemd.update(&sha256_hash);
        let ripemd_hash = ripemd.finalize();

        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&ripemd_hash);
        Address::new(bytes)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Accept value from any sender. No approval and no action record.
    pub fn deposit(&mut self, sender: Address, amount: u128) {
        log::info!("Wallet {} received {} from {}", self.address, amount, sender);
        self.outbox.push(WalletEvent::Deposit { sender, amount });
    }

    /// Propose a new action, returning its index
    ///
    /// The proposal carries no approvals, not even the submitter's.
    pub fn submit(
        &mut self,
        caller: &Address,
        destination: Address,
        amount: u128,
        payload: Vec<u8>,
    ) -> Result<usize, MultisigError> {
        self.ensure_owner(caller)?;

        let index = self.actions.len();
        self.actions
            .push(Action::new(index, *caller, destination, amount, payload));
        self.outbox.push(WalletEvent::Submit { index });

        log::info!(
            "Action {} submitted by {}: {} to {}",
            index,
            caller,
            amount,
            destination
        );

        Ok(index)
    }

    /// Record the caller's approval of an action
    pub fn approve(&mut self, caller: &Address, index: usize) -> Result<(), MultisigError> {
        self.ensure_owner(caller)?;

        let action = self.pending_action_mut(index)?;
        if !action.add_approval(*caller) {
            return Err(rejected(MultisigError::AlreadyApproved {
                index,
                owner: *caller,
            }));
        }
        let approvals = action.approval_count();

        self.outbox.push(WalletEvent::Approve {
            owner: *caller,
            index,
        });

        log::info!(
            "Action {} approved by {} ({}/{})",
            index,
            caller,
            approvals,
            self.config.required()
        );

        Ok(())
    }

    /// Withdraw the caller's approval of an action
    pub fn revoke(&mut self, caller: &Address, index: usize) -> Result<(), MultisigError> {
        self.ensure_owner(caller)?;

        let action = self.pending_action_mut(index)?;
        if !action.remove_approval(caller) {
            return Err(rejected(MultisigError::NotApproved {
                index,
                owner: *caller,
            }));
        }

        self.outbox.push(WalletEvent::Revoke {
            owner: *caller,
            index,
        });

        log::info!("Action {} approval revoked by {}", index, caller);

        Ok(())
    }

    /// Execute an action that has reached quorum
    ///
    /// Anyone may call this. The action is marked executed before the
    /// executor runs; if the executor fails the mark is undone and the
    /// action stays pending with its approvals intact.
    pub fn execute<E>(&mut self, index: usize, executor: &mut E) -> Result<(), MultisigError>
    where
        E: Executor + ?Sized,
    {
        let wallet_address = self.address;
        let required = self.config.required();

        let action = self.pending_action_mut(index)?;
        if !action.has_quorum(required) {
            return Err(rejected(MultisigError::InsufficientApprovals {
                index,
                have: action.approval_count(),
                need: required,
            }));
        }

        action.executed = true;
        let call = action.call(wallet_address);

        if let Err(source) = executor.execute(&call) {
            action.executed = false;
            log::warn!(
                "Execution of action {} failed, rolled back: {}",
                index,
                source
            );
            return Err(MultisigError::ExecutionFailed { index, source });
        }
        action.executed_at = Some(Utc::now());

        self.outbox.push(WalletEvent::Execute { index });

        log::info!(
            "Action {} executed: {} to {}",
            index,
            call.amount,
            call.destination
        );

        Ok(())
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Remove and return events of committed operations
    pub fn take_events(&mut self) -> Vec<WalletEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Forward queued events to a sink
    pub fn publish(&mut self, sink: &dyn EventSink) {
        for event in self.outbox.drain(..) {
            sink.emit(&event);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Get the wallet address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Get the configuration
    pub fn config(&self) -> &MultisigConfig {
        &self.config
    }

    pub fn is_owner(&self, address: &Address) -> bool {
        self.config.is_owner(address)
    }

    /// Get the required threshold
    pub fn required(&self) -> usize {
        self.config.required()
    }

    pub fn owners(&self) -> &[Address] {
        self.config.owners()
    }

    /// Look up an action by index
    pub fn action(&self, index: usize) -> Result<&Action, MultisigError> {
        self.actions
            .get(index)
            .ok_or(MultisigError::ActionNotFound(index))
    }

    /// All actions in submission order
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Whether `owner` approves the action. False for unknown indices.
    pub fn is_approved(&self, index: usize, owner: &Address) -> bool {
        self.actions
            .get(index)
            .map(|action| action.is_approved_by(owner))
            .unwrap_or(false)
    }

    pub fn approval_count(&self, index: usize) -> Result<usize, MultisigError> {
        Ok(self.action(index)?.approval_count())
    }

    /// Owners approving the action, in address order
    pub fn approvers(&self, index: usize) -> Result<Vec<Address>, MultisigError> {
        Ok(self.action(index)?.approvers().copied().collect())
    }

    pub fn status(&self, index: usize) -> Result<ActionStatus, MultisigError> {
        Ok(self.action(index)?.status())
    }

    /// Get human-readable description
    pub fn description(&self) -> String {
        self.config.description()
    }

    /// Verify invariants that deserialization alone cannot enforce
    pub fn check_integrity(&self) -> Result<(), String> {
        let expected = Self::generate_address(&self.config);
        if self.address != expected {
            return Err(format!(
                "wallet address {} does not match its configuration ({})",
                self.address, expected
            ));
        }
        for (position, action) in self.actions.iter().enumerate() {
            if action.index != position {
                return Err(format!(
                    "action at position {} carries index {}",
                    position, action.index
                ));
            }
            if !self.is_owner(&action.submitted_by) {
                return Err(format!(
                    "action {} submitted by non-owner {}",
                    position, action.submitted_by
                ));
            }
            if let Some(stranger) = action.approvers().find(|a| !self.is_owner(a)) {
                return Err(format!(
                    "action {} approved by non-owner {}",
                    position, stranger
                ));
            }
            if action.executed != action.executed_at.is_some() {
                return Err(format!(
                    "action {} has inconsistent execution state",
                    position
                ));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Guards
    // =========================================================================

    fn ensure_owner(&self, caller: &Address) -> Result<(), MultisigError> {
        if self.config.is_owner(caller) {
            Ok(())
        } else {
            Err(rejected(MultisigError::NotOwner(*caller)))
        }
    }

    /// Existing, not yet executed action
    fn pending_action_mut(&mut self, index: usize) -> Result<&mut Action, MultisigError> {
        let action = self
            .actions
            .get_mut(index)
            .ok_or_else(|| rejected(MultisigError::ActionNotFound(index)))?;

        if action.executed {
            return Err(rejected(MultisigError::AlreadyExecuted(index)));
        }

        Ok(action)
    }
}

fn rejected(err: MultisigError) -> MultisigError {
    log::debug!("Rejected: {}", err);
    err
}
