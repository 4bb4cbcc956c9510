//! Wallet notifications
//!
//! The engine queues a [`WalletEvent`] for every committed state change and
//! never looks at what observers do with it. Sinks are fire-and-forget.

use crate::crypto::Address;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;

/// Maximum number of events to buffer per broadcast subscriber
const BROADCAST_CAPACITY: usize = 100;

/// Events emitted by the wallet engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WalletEvent {
    /// Value arrived from any sender
    Deposit { sender: Address, amount: u128 },
    /// An owner proposed a new action
    Submit { index: usize },
    /// An owner approved an action
    Approve { owner: Address, index: usize },
    /// An owner withdrew their approval
    Revoke { owner: Address, index: usize },
    /// An action was executed
    Execute { index: usize },
}

/// Receives wallet events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &WalletEvent);
}

/// Collects events in memory
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<WalletEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything received so far
    pub fn events(&self) -> Vec<WalletEvent> {
        self.guard().clone()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    /// Remove and return everything received so far
    pub fn drain(&self) -> Vec<WalletEvent> {
        std::mem::take(&mut *self.guard())
    }

    fn guard(&self) -> MutexGuard<'_, Vec<WalletEvent>> {
        // Poisoning only means an observer panicked; the Vec is still valid
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: &WalletEvent) {
        self.guard().push(event.clone());
    }
}

/// Fans events out to async subscribers
#[derive(Debug)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<WalletEvent>,
}

impl EventBroadcaster {
    /// Create a new broadcaster
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { sender }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventBroadcaster {
    fn emit(&self, event: &WalletEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event.clone());
    }
}

/// Writes events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &WalletEvent) {
        match event {
            WalletEvent::Deposit { sender, amount } => {
                log::info!("Deposit of {} from {}", amount, sender)
            }
            WalletEvent::Submit { index } => log::info!("Action {} submitted", index),
            WalletEvent::Approve { owner, index } => {
                log::info!("Action {} approved by {}", index, owner)
            }
            WalletEvent::Revoke { owner, index } => {
                log::info!("Action {} approval revoked by {}", index, owner)
            }
            WalletEvent::Execute { index } => log::info!("Action {} executed", index),
        }
    }
}
