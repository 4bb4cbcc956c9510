//! Multisig Wallet: an M-of-N multi-signature wallet engine in Rust
//!
//! This crate provides:
//! - A fixed owner set with a validated approval threshold
//! - Submit / approve / revoke / execute with strict state checks
//! - Execution that marks the action first and rolls back if the transfer fails
//! - A serialized, cloneable handle for concurrent callers
//! - Event sinks (in-memory, broadcast channel, log)
//! - An in-memory ledger executor and JSON persistence
//!
//! # Example
//!
//! ```rust
//! use multisig_wallet::crypto::KeyPair;
//! use multisig_wallet::ledger::Ledger;
//! use multisig_wallet::multisig::{MultisigError, MultisigWallet};
//!
//! let alice = KeyPair::generate().address();
//! let bob = KeyPair::generate().address();
//! let receiver = KeyPair::generate().address();
//!
//! // Create a 2-of-2 wallet and fund it
//! let mut wallet = MultisigWallet::new(vec![alice, bob], 2).unwrap();
//! let mut ledger = Ledger::new();
//! ledger.credit(*wallet.address(), 1_000).unwrap();
//!
//! // Propose a transfer and collect approvals
//! let index = wallet.submit(&alice, receiver, 400, vec![]).unwrap();
//! wallet.approve(&alice, index).unwrap();
//! assert!(matches!(
//!     wallet.execute(index, &mut ledger),
//!     Err(MultisigError::InsufficientApprovals { .. })
//! ));
//!
//! wallet.approve(&bob, index).unwrap();
//! wallet.execute(index, &mut ledger).unwrap();
//! assert_eq!(ledger.balance_of(&receiver), 400);
//! ```

pub mod cli;
pub mod crypto;
pub mod ledger;
pub mod multisig;
pub mod storage;

// Re-export commonly used types
pub use crypto::{Address, KeyPair};
pub use ledger::{Call, Executor, ExecutorError, Ledger};
pub use multisig::{
    Action, ActionStatus, EventSink, MultisigConfig, MultisigError, MultisigWallet,
    SharedWallet, WalletEvent,
};
pub use storage::{Storage, StorageConfig, WalletSnapshot};
