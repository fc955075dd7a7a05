//! CLI commands for the multisig wallet
//!
//! Implements all command handlers for the CLI interface.

use crate::engine::{FailurePolicy, MultisigWallet, WalletConfig};
use crate::runtime::{InMemoryLedger, Runtime};
use crate::storage::{Storage, StorageConfig, WalletState};
use std::path::Path;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub state: WalletState,
    pub storage: Storage,
}

impl AppState {
    /// Load the persisted wallet state
    pub fn load(data_dir: &Path) -> CliResult<Self> {
        let storage_config = StorageConfig {
            data_dir: data_dir.to_path_buf(),
            ..Default::default()
        };
        let storage = Storage::new(storage_config)?;

        if !storage.exists() {
            return Err(format!(
                "No wallet found in {:?}. Run 'multisig init' first.",
                data_dir
            )
            .into());
        }

        let state = storage.load()?;
        Ok(Self { state, storage })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.state)?;
        Ok(())
    }
}

/// Initialize a new wallet
pub fn cmd_init(
    data_dir: &Path,
    address: &str,
    owners: Vec<String>,
    required: usize,
    expiry_blocks: u64,
    allow_retry: bool,
) -> CliResult<()> {
    let storage_config = StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    };
    let storage = Storage::new(storage_config)?;

    if storage.exists() {
        println!("⚠️  Wallet already exists at {:?}", data_dir);
        println!("   Remove the data directory to start over.");
        return Ok(());
    }

    let policy = if allow_retry {
        FailurePolicy::Rollback
    } else {
        FailurePolicy::Consume
    };
    let config = WalletConfig::new(owners, required, expiry_blocks)?.with_failure_policy(policy);
    let description = config.description();
    let owner_list = config.owners.clone();

    let state = WalletState {
        wallet: MultisigWallet::new(address, config),
        ledger: InMemoryLedger::new(),
    };
    storage.save(&state)?;

    println!("✅ Multisig wallet initialized!");
    println!("   📁 Data directory: {:?}", data_dir);
    println!("   📍 Wallet account: {}", address);
    println!("   🔐 Quorum: {}", description);
    for owner in &owner_list {
        println!("   👤 Owner: {}", owner);
    }
    if expiry_blocks > 0 {
        println!("   ⏳ Expiry window: {} blocks", expiry_blocks);
    } else {
        println!("   ⏳ Expiry: disabled");
    }
    if allow_retry {
        println!("   🔁 Failed executions may be retried");
    }

    Ok(())
}

/// Deposit funds into an account
pub fn cmd_deposit(app: &mut AppState, account: Option<&str>, amount: u64) -> CliResult<()> {
    let account = account.unwrap_or(app.state.wallet.address()).to_string();
    app.state.ledger.deposit(&account, amount);
    app.save()?;

    println!("💰 Deposited {} units into {}", amount, account);
    println!("   New balance: {}", app.state.ledger.balance(&account));
    Ok(())
}

/// Submit a new transaction proposal
pub fn cmd_submit(
    app: &mut AppState,
    from: &str,
    to: &str,
    value: u64,
    data_hex: Option<&str>,
) -> CliResult<()> {
    let data = match data_hex {
        Some(h) => hex::decode(h.trim_start_matches("0x"))?,
        None => Vec::new(),
    };

    let index = app
        .state
        .wallet
        .submit_transaction(from, to, value, data, &app.state.ledger)?;
    app.save()?;

    println!("📨 Transaction {} submitted by {}", index, from);
    println!("   ├─ To: {}", to);
    println!("   ├─ Value: {}", value);
    println!(
        "   └─ Confirmations: 0 of {} required",
        app.state.wallet.required()
    );
    println!(
        "\n   Owners must now confirm: multisig confirm --from <owner> --tx {}",
        index
    );

    Ok(())
}

/// Confirm a pending transaction
pub fn cmd_confirm(app: &mut AppState, from: &str, index: u64) -> CliResult<()> {
    app.state
        .wallet
        .confirm_transaction(from, index, &app.state.ledger)?;
    app.save()?;

    let tx = app.state.wallet.get_transaction(index)?;
    println!("✍️  Transaction {} confirmed by {}", index, from);
    println!(
        "   Confirmations: {} of {} required",
        tx.num_confirmations,
        app.state.wallet.required()
    );
    if tx.num_confirmations >= app.state.wallet.required() {
        println!("   ✅ Quorum reached, ready to execute");
    }

    Ok(())
}

/// Revoke a prior confirmation
pub fn cmd_revoke(app: &mut AppState, from: &str, index: u64) -> CliResult<()> {
    app.state.wallet.revoke_confirmation(from, index)?;
    app.save()?;

    let tx = app.state.wallet.get_transaction(index)?;
    println!("↩️  Confirmation revoked by {} on transaction {}", from, index);
    println!(
        "   Confirmations: {} of {} required",
        tx.num_confirmations,
        app.state.wallet.required()
    );

    Ok(())
}

/// Execute a fully confirmed transaction
pub fn cmd_execute(app: &mut AppState, from: &str, index: u64) -> CliResult<()> {
    let result = app
        .state
        .wallet
        .execute_transaction(from, index, &mut app.state.ledger);
    // Persist either way: a consumed failed attempt is state too
    app.save()?;
    result?;

    let tx = app.state.wallet.get_transaction(index)?;
    println!("🚀 Transaction {} executed!", index);
    println!("   ├─ {} units sent to {}", tx.value, tx.to);
    println!(
        "   └─ Wallet balance: {}",
        app.state.ledger.balance(app.state.wallet.address())
    );

    Ok(())
}

/// Show a single transaction
pub fn cmd_show(app: &AppState, index: u64) -> CliResult<()> {
    let tx = app.state.wallet.get_transaction(index)?;

    println!("🧾 Transaction {}", tx.index);
    println!("   ├─ To: {}", tx.to);
    println!("   ├─ Value: {}", tx.value);
    if tx.data.is_empty() {
        println!("   ├─ Data: (plain transfer)");
    } else {
        println!("   ├─ Data: 0x{}", hex::encode(&tx.data));
    }
    println!(
        "   ├─ Confirmations: {} of {}",
        tx.num_confirmations,
        app.state.wallet.required()
    );
    println!("   ├─ Submitted at block: {}", tx.submitted_at_block);
    println!("   └─ Executed: {}", tx.executed);

    Ok(())
}

/// List all transactions ever submitted
pub fn cmd_list(app: &AppState) -> CliResult<()> {
    let transactions = app.state.wallet.list_transactions();

    if transactions.is_empty() {
        println!("📭 No transactions submitted yet");
        return Ok(());
    }

    println!("🧾 {} transaction(s):", transactions.len());
    for tx in transactions {
        let status = if tx.executed {
            "executed"
        } else if tx.num_confirmations >= app.state.wallet.required() {
            "ready"
        } else {
            "pending"
        };
        println!(
            "   [{}] {:8} {} units to {} ({}/{} confirmations)",
            tx.index,
            status,
            tx.value,
            tx.to,
            tx.num_confirmations,
            app.state.wallet.required()
        );
    }

    Ok(())
}

/// Show the owner set and quorum
pub fn cmd_owners(app: &AppState) -> CliResult<()> {
    println!(
        "🔐 Quorum: {} of {} owners",
        app.state.wallet.required(),
        app.state.wallet.owners().len()
    );
    for owner in app.state.wallet.owners() {
        println!("   👤 {}", owner);
    }
    Ok(())
}

/// Show an account balance (defaults to the wallet's own account)
pub fn cmd_balance(app: &AppState, account: Option<&str>) -> CliResult<()> {
    let account = account.unwrap_or(app.state.wallet.address());
    println!(
        "💰 Balance of {}: {} units",
        account,
        app.state.ledger.balance(account)
    );
    Ok(())
}

/// Advance the ledger's block height
pub fn cmd_advance(app: &mut AppState, blocks: u64) -> CliResult<()> {
    app.state.ledger.advance_blocks(blocks);
    app.save()?;

    println!(
        "⛓️  Advanced {} block(s), height now {}",
        blocks,
        app.state.ledger.block_height()
    );
    Ok(())
}
