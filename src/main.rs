//! Multisig Wallet CLI Application
//!
//! A command-line interface for driving the multi-signature
//! authorization engine against a local ledger.

use clap::{Parser, Subcommand};
use multisig_wallet::cli::{self, AppState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "multisig")]
#[command(version = "0.1.0")]
#[command(about = "A multi-signature transaction authorization engine", long_about = None)]
struct Cli {
    /// Data directory for wallet storage
    #[arg(short, long, default_value = ".multisig_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new multisig wallet
    Init {
        /// Owner account (repeat for each owner)
        #[arg(long = "owner", value_name = "ACCOUNT", required = true)]
        owners: Vec<String>,

        /// Number of confirmations required to execute
        #[arg(short, long)]
        required: usize,

        /// Expiry window in blocks (0 disables expiry)
        #[arg(short, long, default_value = "200")]
        expiry_blocks: u64,

        /// Wallet's own ledger account
        #[arg(short, long, default_value = "wallet")]
        address: String,

        /// Allow retrying a transaction whose transfer failed
        #[arg(long)]
        allow_retry: bool,
    },

    /// Deposit funds into an account (defaults to the wallet)
    Deposit {
        /// Account to credit
        #[arg(long)]
        account: Option<String>,

        /// Amount to deposit
        #[arg(short, long)]
        amount: u64,
    },

    /// Submit a transaction proposal
    Submit {
        /// Submitting owner
        #[arg(short, long)]
        from: String,

        /// Recipient account
        #[arg(short, long)]
        to: String,

        /// Amount to transfer
        #[arg(short, long)]
        value: u64,

        /// Optional hex-encoded call payload
        #[arg(long)]
        data: Option<String>,
    },

    /// Confirm a pending transaction
    Confirm {
        /// Confirming owner
        #[arg(short, long)]
        from: String,

        /// Transaction index
        #[arg(short, long)]
        tx: u64,
    },

    /// Revoke a prior confirmation
    Revoke {
        /// Revoking owner
        #[arg(short, long)]
        from: String,

        /// Transaction index
        #[arg(short, long)]
        tx: u64,
    },

    /// Execute a fully confirmed transaction
    Execute {
        /// Executing owner
        #[arg(short, long)]
        from: String,

        /// Transaction index
        #[arg(short, long)]
        tx: u64,
    },

    /// Show a single transaction
    Show {
        /// Transaction index
        #[arg(short, long)]
        tx: u64,
    },

    /// List all transactions
    List,

    /// Show the owner set and quorum
    Owners,

    /// Show an account balance (defaults to the wallet)
    Balance {
        /// Account to query
        #[arg(long)]
        account: Option<String>,
    },

    /// Advance the ledger block height
    Advance {
        /// Number of blocks
        #[arg(short, long, default_value = "1")]
        blocks: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Handle init command separately (doesn't need existing state)
    if let Commands::Init {
        owners,
        required,
        expiry_blocks,
        address,
        allow_retry,
    } = &cli.command
    {
        return cli::cmd_init(
            &cli.data_dir,
            address,
            owners.clone(),
            *required,
            *expiry_blocks,
            *allow_retry,
        );
    }

    // Load persisted state for everything else
    let mut app = AppState::load(&cli.data_dir)?;

    match cli.command {
        Commands::Init { .. } => unreachable!(),

        Commands::Deposit { account, amount } => {
            cli::cmd_deposit(&mut app, account.as_deref(), amount)?;
        }

        Commands::Submit {
            from,
            to,
            value,
            data,
        } => {
            cli::cmd_submit(&mut app, &from, &to, value, data.as_deref())?;
        }

        Commands::Confirm { from, tx } => {
            cli::cmd_confirm(&mut app, &from, tx)?;
        }

        Commands::Revoke { from, tx } => {
            cli::cmd_revoke(&mut app, &from, tx)?;
        }

        Commands::Execute { from, tx } => {
            cli::cmd_execute(&mut app, &from, tx)?;
        }

        Commands::Show { tx } => {
            cli::cmd_show(&app, tx)?;
        }

        Commands::List => {
            cli::cmd_list(&app)?;
        }

        Commands::Owners => {
            cli::cmd_owners(&app)?;
        }

        Commands::Balance { account } => {
            cli::cmd_balance(&app, account.as_deref())?;
        }

        Commands::Advance { blocks } => {
            cli::cmd_advance(&mut app, blocks)?;
        }
    }

    Ok(())
}
