//! Multi-signature wallet engine
//!
//! An M-of-N wallet where any of N owners may propose an action and the
//! action executes once M distinct owners approve it.
//!
//! # Example
//!
//! ```
//! use multisig_wallet::crypto::Address;
//! use multisig_wallet::ledger::Ledger;
//! use multisig_wallet::multisig::MultisigWallet;
//!
//! let alice = Address::new([0xa1; 20]);
//! let bob = Address::new([0xb2; 20]);
//! let carol = Address::new([0xc3; 20]);
//!
//! let mut wallet = MultisigWallet::new(vec![alice, bob], 2)?;
//! let mut ledger = Ledger::new();
//! ledger.credit(*wallet.address(), 5_000)?;
//!
//! let index = wallet.submit(&alice, carol, 1_000, vec![])?;
//! wallet.approve(&alice, index)?;
//! wallet.approve(&bob, index)?;
//! wallet.execute(index, &mut ledger)?;
//!
//! assert_eq!(ledger.balance_of(&carol), 1_000);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod events;
pub mod shared;
pub mod transaction;
pub mod wallet;

pub use events::{EventBroadcaster, EventLog, EventSink, LogSink, WalletEvent};
pub use shared::SharedWallet;
pub use transaction::{Action, ActionStatus};
pub use wallet::{MultisigConfig, MultisigError, MultisigWallet};
