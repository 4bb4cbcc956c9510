//! CLI commands for the wallet
//!
//! Implements all command handlers for the CLI interface.

use crate::crypto::{Address, KeyPair};
use crate::ledger::Ledger;
use crate::multisig::{ActionStatus, LogSink, MultisigWallet};
use crate::storage::{Storage, StorageConfig, WalletSnapshot};
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub wallet: MultisigWallet,
    pub ledger: Ledger,
    pub storage: Storage,
}

impl AppState {
    /// Load the wallet from the data directory
    pub fn load(data_dir: &Path) -> CliResult<Self> {
        let storage = open_storage(data_dir)?;

        if !storage.exists() {
            return Err(format!(
                "no wallet at {:?}; create one with: multisig init --owners <a,b> --required <n>",
                data_dir
            )
            .into());
        }

        let WalletSnapshot { wallet, ledger } = storage.load()?;

        Ok(Self {
            wallet,
            ledger,
            storage,
        })
    }

    /// Forward pending events and save the current state
    pub fn save(&mut self) -> CliResult<()> {
        self.wallet.publish(&LogSink);
        let snapshot = WalletSnapshot::new(self.wallet.clone(), self.ledger.clone());
        self.storage.save(&snapshot)?;
        Ok(())
    }
}

fn open_storage(data_dir: &Path) -> CliResult<Storage> {
    let storage_config = StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    };
    Ok(Storage::new(storage_config)?)
}

/// Parse hex call data, with or without a 0x prefix
pub fn parse_payload(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s))
}

/// The authenticated caller behind a private key
fn caller_from_key(key_hex: &str) -> CliResult<Address> {
    Ok(KeyPair::from_private_key_hex(key_hex)?.address())
}

/// Create a new wallet
pub fn cmd_init(
    data_dir: &Path,
    owners: Vec<Address>,
    required: usize,
    force: bool,
) -> CliResult<()> {
    let storage = open_storage(data_dir)?;

    if storage.exists() && !force {
        println!("⚠️  Wallet already exists at {:?}", data_dir);
        println!("   Use --force to reinitialize (this will delete existing data)");
        return Ok(());
    }

    let mut wallet = MultisigWallet::new(owners, required)?;
    wallet.publish(&LogSink);
    storage.save(&WalletSnapshot::new(wallet.clone(), Ledger::new()))?;

    println!("✅ Multisig wallet initialized!");
    println!("   📁 Data directory: {:?}", data_dir);
    println!("   📍 Address: {}", wallet.address());
    println!("   🔐 Policy: {}", wallet.description());
    for owner in wallet.owners() {
        println!("   └─ Owner: {}", owner);
    }

    Ok(())
}

/// Generate an owner key pair
pub fn cmd_keygen() -> CliResult<()> {
    let key_pair = KeyPair::generate();

    println!("🔐 New owner key generated!");
    println!("   📍 Address: {}", key_pair.address());
    println!("   🔑 Public Key: {}", key_pair.public_key_hex());
    println!("   🗝️  Private Key: {}", key_pair.private_key_hex());
    println!("\n   ⚠️  IMPORTANT: Store the private key safely; it is not saved anywhere.");

    Ok(())
}

/// Send value into the wallet
pub fn cmd_deposit(state: &mut AppState, from: Address, amount: u128) -> CliResult<()> {
    let balance = state.ledger.credit(*state.wallet.address(), amount)?;
    state.wallet.deposit(from, amount);
    state.save()?;

    println!("📥 Deposited {} from {}", amount, from);
    println!("   💰 Wallet balance: {}", balance);

    Ok(())
}

/// Propose a new action
pub fn cmd_submit(
    state: &mut AppState,
    key: &str,
    to: Address,
    amount: u128,
    payload: Vec<u8>,
) -> CliResult<()> {
    let caller = caller_from_key(key)?;
    let index = state.wallet.submit(&caller, to, amount, payload)?;
    state.save()?;

    println!("📝 Action submitted!");
    println!("   Index: {}", index);
    println!("   To: {}", to);
    println!("   Amount: {}", amount);
    println!(
        "   Needs {} approval(s) before execution",
        state.wallet.required()
    );

    Ok(())
}

/// Approve an action
pub fn cmd_approve(state: &mut AppState, key: &str, index: usize) -> CliResult<()> {
    let caller = caller_from_key(key)?;
    state.wallet.approve(&caller, index)?;
    state.save()?;

    let approvals = state.wallet.approval_count(index)?;
    println!("✍️  Action {} approved by {}", index, caller);
    println!("   Approvals: {}/{}", approvals, state.wallet.required());

    Ok(())
}

/// Revoke an approval
pub fn cmd_revoke(state: &mut AppState, key: &str, index: usize) -> CliResult<()> {
    let caller = caller_from_key(key)?;
    state.wallet.revoke(&caller, index)?;
    state.save()?;

    let approvals = state.wallet.approval_count(index)?;
    println!("↩️  Approval for action {} revoked by {}", index, caller);
    println!("   Approvals: {}/{}", approvals, state.wallet.required());

    Ok(())
}

/// Execute an approved action
pub fn cmd_execute(state: &mut AppState, index: usize) -> CliResult<()> {
    let AppState { wallet, ledger, .. } = state;
    wallet.execute(index, ledger)?;
    state.save()?;

    let action = state.wallet.action(index)?;
    println!("🚀 Action {} executed!", index);
    println!("   Sent {} to {}", action.amount, action.destination);
    println!(
        "   💰 Wallet balance: {}",
        state.ledger.balance_of(state.wallet.address())
    );

    Ok(())
}

/// Show one action
pub fn cmd_show(state: &AppState, index: usize) -> CliResult<()> {
    let action = state.wallet.action(index)?;

    println!("📄 Action {}", index);
    println!("   ├─ To: {}", action.destination);
    println!("   ├─ Amount: {}", action.amount);
    println!("   ├─ Data: 0x{}", hex::encode(&action.payload));
    println!("   ├─ Submitted by: {}", action.submitted_by);
    println!(
        "   ├─ Submitted at: {}",
        action.submitted_at.format("%Y-%m-%d %H:%M:%S")
    );
    match action.status() {
        ActionStatus::Pending { approvals } => {
            println!(
                "   ├─ Status: pending ({}/{})",
                approvals,
                state.wallet.required()
            );
        }
        ActionStatus::Executed => {
            let at = action
                .executed_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default();
            println!("   ├─ Status: executed {}", at);
        }
    }
    println!("   └─ Approvals:");
    for owner in state.wallet.owners() {
        let mark = if action.is_approved_by(owner) { "✅" } else { "⬜" };
        println!("      {} {}", mark, owner);
    }

    Ok(())
}

/// Display wallet information
pub fn cmd_status(state: &AppState) -> CliResult<()> {
    let wallet = &state.wallet;

    println!("🔐 Multisig Wallet");
    println!("   ├─ Address: {}", wallet.address());
    println!("   ├─ Policy: {}", wallet.description());
    println!(
        "   ├─ Balance: {}",
        state.ledger.balance_of(wallet.address())
    );
    println!(
        "   ├─ Created: {}",
        wallet.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("   └─ Actions: {}", wallet.action_count());

    if wallet.action_count() > 0 {
        println!("\n   Recent actions:");
        for action in wallet.actions().iter().rev().take(10) {
            let status = match action.status() {
                ActionStatus::Pending { approvals } => {
                    format!("pending {}/{}", approvals, wallet.required())
                }
                ActionStatus::Executed => "executed".to_string(),
            };
            println!(
                "   #{} | {} → {} | {}",
                action.index, action.amount, action.destination, status
            );
        }
        if wallet.action_count() > 10 {
            println!("   ... and {} more", wallet.action_count() - 10);
        }
    }

    Ok(())
}

/// Export wallet state to file
pub fn cmd_export(state: &AppState, path: &PathBuf) -> CliResult<()> {
    let snapshot = WalletSnapshot::new(state.wallet.clone(), state.ledger.clone());
    crate::storage::save_to_file(&snapshot, path)?;
    println!("📦 Wallet exported to {:?}", path);
    Ok(())
}

/// Import wallet state from file
pub fn cmd_import(data_dir: &Path, path: &PathBuf, force: bool) -> CliResult<()> {
    let snapshot = crate::storage::load_from_file(path)?;
    let storage = open_storage(data_dir)?;

    if storage.exists() && !force {
        println!("⚠️  Wallet already exists at {:?}", data_dir);
        println!("   Use --force to replace it with the imported wallet");
        return Ok(());
    }

    storage.save(&snapshot)?;

    println!("📥 Wallet imported from {:?}", path);
    println!("   Address: {}", snapshot.wallet.address());
    println!("   Actions: {}", snapshot.wallet.action_count());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload() {
        assert_eq!(parse_payload("0x00ff").unwrap(), vec![0x00, 0xff]);
        assert_eq!(parse_payload("abcd").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(parse_payload("").unwrap(), Vec::<u8>::new());
        assert!(parse_payload("0xz").is_err());
    }

    #[test]
    fn test_cli_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let receiver = Address::new([0xee; 20]);

        cmd_init(dir.path(), vec![alice.address(), bob.address()], 2, false).unwrap();

        let mut state = AppState::load(dir.path()).unwrap();
        cmd_deposit(&mut state, receiver, 5_000).unwrap();
        cmd_submit(&mut state, &alice.private_key_hex(), receiver, 1_000, vec![]).unwrap();
        cmd_approve(&mut state, &alice.private_key_hex(), 0).unwrap();

        // Quorum not reached yet
        assert!(cmd_execute(&mut state, 0).is_err());

        // Reload from disk between steps
        let mut state = AppState::load(dir.path()).unwrap();
        cmd_approve(&mut state, &bob.private_key_hex(), 0).unwrap();
        cmd_execute(&mut state, 0).unwrap();
        cmd_show(&state, 0).unwrap();
        cmd_status(&state).unwrap();

        let state = AppState::load(dir.path()).unwrap();
        assert!(state.wallet.action(0).unwrap().executed);
        assert_eq!(state.ledger.balance_of(&receiver), 1_000);
        assert_eq!(state.ledger.balance_of(state.wallet.address()), 4_000);
    }

    #[test]
    fn test_cli_rejects_stranger_key() {
        let dir = tempfile::tempdir().unwrap();
        let alice = KeyPair::generate();
        let stranger = KeyPair::generate();

        cmd_init(dir.path(), vec![alice.address()], 1, false).unwrap();
        let mut state = AppState::load(dir.path()).unwrap();

        let result = cmd_submit(
            &mut state,
            &stranger.private_key_hex(),
            alice.address(),
            1,
            vec![],
        );
        assert!(result.is_err());
        assert_eq!(state.wallet.action_count(), 0);
    }

    #[test]
    fn test_init_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();

        cmd_init(dir.path(), vec![alice.address()], 1, false).unwrap();
        cmd_init(dir.path(), vec![bob.address()], 1, false).unwrap();
        let state = AppState::load(dir.path()).unwrap();
        assert!(state.wallet.is_owner(&alice.address()));

        cmd_init(dir.path(), vec![bob.address()], 1, true).unwrap();
        let state = AppState::load(dir.path()).unwrap();
        assert!(state.wallet.is_owner(&bob.address()));
    }

    #[test]
    fn test_init_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(cmd_init(dir.path(), vec![], 1, false).is_err());
        assert!(AppState::load(dir.path()).is_err());
    }

    #[test]
    fn test_export_import() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let alice = KeyPair::generate();

        cmd_init(source.path(), vec![alice.address()], 1, false).unwrap();
        let state = AppState::load(source.path()).unwrap();
        let export_path = source.path().join("export.json");
        cmd_export(&state, &export_path).unwrap();

        cmd_import(target.path(), &export_path, false).unwrap();
        let imported = AppState::load(target.path()).unwrap();
        assert_eq!(imported.wallet.address(), state.wallet.address());
    }

    #[test]
    fn test_import_does_not_overwrite() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();

        cmd_init(source.path(), vec![alice.address()], 1, false).unwrap();
        let exported = AppState::load(source.path()).unwrap();
        let export_path = source.path().join("export.json");
        cmd_export(&exported, &export_path).unwrap();

        cmd_init(target.path(), vec![bob.address()], 1, false).unwrap();
        cmd_import(target.path(), &export_path, false).unwrap();
        let state = AppState::load(target.path()).unwrap();
        assert!(state.wallet.is_owner(&bob.address()));

        cmd_import(target.path(), &export_path, true).unwrap();
        let state = AppState::load(target.path()).unwrap();
        assert_eq!(state.wallet.address(), exported.wallet.address());
    }
}
