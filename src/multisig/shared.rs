//! Serialized access to one wallet from many tasks
//!
//! All operations go through a single async mutex that also guards the
//! executor, so every call (including the executor hand-off inside
//! `execute`) runs to completion before the next one starts.

use crate::crypto::Address;
use crate::ledger::{Executor, ExecutorError, Ledger};
use crate::multisig::events::EventSink;
use crate::multisig::transaction::Action;
use crate::multisig::wallet::{MultisigError, MultisigWallet};
use std::sync::Arc;
use tokio::sync::Mutex;

struct Inner<E> {
    wallet: MultisigWallet,
    executor: E,
}

/// Cloneable handle to a wallet and its executor
pub struct SharedWallet<E> {
    inner: Arc<Mutex<Inner<E>>>,
    sink: Arc<dyn EventSink>,
}

impl<E> Clone for SharedWallet<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<E: Executor + Send> SharedWallet<E> {
    /// Wrap a wallet; events of committed operations go to `sink`
    pub fn new(wallet: MultisigWallet, executor: E, sink: Arc<dyn EventSink>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { wallet, executor })),
            sink,
        }
    }

    /// Record an incoming deposit
    pub async fn deposit(&self, sender: Address, amount: u128) {
        let mut inner = self.inner.lock().await;
        inner.wallet.deposit(sender, amount);
        inner.wallet.publish(self.sink.as_ref());
    }

    pub async fn submit(
        &self,
        caller: &Address,
        destination: Address,
        amount: u128,
        payload: Vec<u8>,
    ) -> Result<usize, MultisigError> {
        let mut inner = self.inner.lock().await;
        let result = inner.wallet.submit(caller, destination, amount, payload);
        inner.wallet.publish(self.sink.as_ref());
        result
    }

    pub async fn approve(&self, caller: &Address, index: usize) -> Result<(), MultisigError> {
        let mut inner = self.inner.lock().await;
        let result = inner.wallet.approve(caller, index);
        inner.wallet.publish(self.sink.as_ref());
        result
    }

    pub async fn revoke(&self, caller: &Address, index: usize) -> Result<(), MultisigError> {
        let mut inner = self.inner.lock().await;
        let result = inner.wallet.revoke(caller, index);
        inner.wallet.publish(self.sink.as_ref());
        result
    }

    /// Execute an action; the lock is held until the executor returns
    pub async fn execute(&self, index: usize) -> Result<(), MultisigError> {
        let mut guard = self.inner.lock().await;
        let Inner { wallet, executor } = &mut *guard;
        let result = wallet.execute(index, executor);
        wallet.publish(self.sink.as_ref());
        result
    }

    pub async fn is_owner(&self, address: &Address) -> bool {
        self.inner.lock().await.wallet.is_owner(address)
    }

    pub async fn required(&self) -> usize {
        self.inner.lock().await.wallet.required()
    }

    /// Copy of the action at `index`
    pub async fn action(&self, index: usize) -> Result<Action, MultisigError> {
        self.inner.lock().await.wallet.action(index).cloned()
    }

    pub async fn is_approved(&self, index: usize, owner: &Address) -> bool {
        self.inner.lock().await.wallet.is_approved(index, owner)
    }

    /// Consistent copy of the whole wallet state
    pub async fn snapshot(&self) -> MultisigWallet {
        self.inner.lock().await.wallet.clone()
    }

    /// Run `f` against the executor while holding the engine lock
    pub async fn with_executor<R>(&self, f: impl FnOnce(&mut E) -> R) -> R {
        let mut inner = self.inner.lock().await;
        f(&mut inner.executor)
    }
}

impl SharedWallet<Ledger> {
    /// Credit the wallet's ledger account and record the deposit
    pub async fn fund(&self, sender: Address, amount: u128) -> Result<u128, ExecutorError> {
        let mut guard = self.inner.lock().await;
        let Inner { wallet, executor } = &mut *guard;
        let balance = executor.credit(*wallet.address(), amount)?;
        wallet.deposit(sender, amount);
        wallet.publish(self.sink.as_ref());
        Ok(balance)
    }

    /// Ledger balance of the wallet account
    pub async fn balance(&self) -> u128 {
        let inner = self.inner.lock().await;
        inner.executor.balance_of(inner.wallet.address())
    }
}
