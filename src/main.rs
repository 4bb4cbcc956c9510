//! Multisig Wallet CLI Application
//!
//! A command-line interface for operating an M-of-N multisig wallet.

use clap::{Parser, Subcommand};
use multisig_wallet::cli::{self, AppState};
use multisig_wallet::crypto::Address;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "multisig")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "An M-of-N multi-signature wallet", long_about = None)]
struct Cli {
    /// Data directory for wallet storage
    #[arg(short, long, default_value = ".multisig_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new multisig wallet
    Init {
        /// Owner addresses (comma-separated, 0x-prefixed)
        #[arg(short, long, value_delimiter = ',', required = true)]
        owners: Vec<Address>,

        /// Number of approvals required to execute
        #[arg(short, long)]
        required: usize,

        /// Overwrite an existing wallet
        #[arg(long)]
        force: bool,
    },

    /// Generate an owner key pair
    Keygen,

    /// Deposit funds into the wallet
    Deposit {
        /// Depositor address
        #[arg(short, long)]
        from: Address,

        /// Amount to deposit
        #[arg(short, long)]
        amount: u128,
    },

    /// Propose a transfer or call
    Submit {
        /// Owner private key (hex)
        #[arg(short, long)]
        key: String,

        /// Destination address
        #[arg(short, long)]
        to: Address,

        /// Amount to send
        #[arg(short, long, default_value = "0")]
        amount: u128,

        /// Call data (hex)
        #[arg(long, default_value = "")]
        data: String,
    },

    /// Approve a pending action
    Approve {
        /// Owner private key (hex)
        #[arg(short, long)]
        key: String,

        /// Action index
        #[arg(short, long)]
        index: usize,
    },

    /// Revoke your approval of a pending action
    Revoke {
        /// Owner private key (hex)
        #[arg(short, long)]
        key: String,

        /// Action index
        #[arg(short, long)]
        index: usize,
    },

    /// Execute an action that has enough approvals
    Execute {
        /// Action index
        #[arg(short, long)]
        index: usize,
    },

    /// Show an action
    Show {
        /// Action index
        #[arg(short, long)]
        index: usize,
    },

    /// Display wallet information
    Status,

    /// Export wallet state to file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import wallet state from file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Overwrite an existing wallet
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Commands that don't need a loaded wallet
    match &cli.command {
        Commands::Init {
            owners,
            required,
            force,
        } => return cli::cmd_init(&cli.data_dir, owners.clone(), *required, *force),
        Commands::Keygen => return cli::cmd_keygen(),
        Commands::Import { input, force } => {
            return cli::cmd_import(&cli.data_dir, input, *force)
        }
        _ => {}
    }

    let mut state = AppState::load(&cli.data_dir)?;

    match cli.command {
        Commands::Init { .. } | Commands::Keygen | Commands::Import { .. } => unreachable!(),

        Commands::Deposit { from, amount } => {
            cli::cmd_deposit(&mut state, from, amount)?;
        }

        Commands::Submit {
            key,
            to,
            amount,
            data,
        } => {
            let payload = cli::parse_payload(&data)?;
            cli::cmd_submit(&mut state, &key, to, amount, payload)?;
        }

        Commands::Approve { key, index } => {
            cli::cmd_approve(&mut state, &key, index)?;
        }

        Commands::Revoke { key, index } => {
            cli::cmd_revoke(&mut state, &key, index)?;
        }

        Commands::Execute { index } => {
            cli::cmd_execute(&mut state, index)?;
        }

        Commands::Show { index } => {
            cli::cmd_show(&state, index)?;
        }

        Commands::Status => {
            cli::cmd_status(&state)?;
        }

        Commands::Export { output } => {
            cli::cmd_export(&state, &output)?;
        }
    }

    Ok(())
}
