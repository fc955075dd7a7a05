//! Ledger runtime boundary
//!
//! The wallet engine never moves value itself: it asks the surrounding
//! runtime for the current block height and, on execution, hands it an
//! opaque `(to, value, data)` tuple to perform. This module defines that
//! boundary and an in-memory implementation used by the CLI and tests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Ledger-related errors
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: u64, need: u64 },
    #[error("Transfer rejected: {0}")]
    TransferRejected(String),
}

/// The execution environment the wallet runs against
///
/// Implementations hold account balances and the block clock. Caller
/// authentication happens before any operation reaches the wallet, so the
/// engine trusts the caller identity it is handed.
pub trait Runtime {
    /// Current ledger block height
    fn block_height(&self) -> u64;

    /// Native balance of an account (0 if unknown)
    fn balance(&self, account: &str) -> u64;

    /// Perform a value transfer / external call on behalf of `from`
    ///
    /// The payload is opaque to the ledger; a non-empty payload represents
    /// a contract call carrying `value` alongside it.
    fn perform(&mut self, from: &str, to: &str, value: u64, data: &[u8])
        -> Result<(), LedgerError>;
}

/// A simple in-memory ledger
///
/// Tracks balances in a flat table and exposes a manually advanced block
/// counter, standing in for a real chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryLedger {
    /// Current block height
    height: u64,
    /// Account balances
    balances: HashMap<String, u64>,
}

impl InMemoryLedger {
    /// Create an empty ledger at height 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account unconditionally
    ///
    /// This is the deposit path: anyone may fund any account, including the
    /// wallet's own, with no authorization gate.
    pub fn deposit(&mut self, account: &str, amount: u64) {
        let balance = self.balances.entry(account.to_string()).or_insert(0);
        *balance += amount;
        log::debug!("deposit: {} +{} -> {}", account, amount, *balance);
    }

    /// Advance the block height by `blocks`
    pub fn advance_blocks(&mut self, blocks: u64) {
        self.height += blocks;
    }
}

impl Runtime for InMemoryLedger {
    fn block_height(&self) -> u64 {
        self.height
    }

    fn balance(&self, account: &str) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn perform(
        &mut self,
        from: &str,
        to: &str,
        value: u64,
        data: &[u8],
    ) -> Result<(), LedgerError> {
        let have = self.balance(from);
        if have < value {
            return Err(LedgerError::InsufficientFunds { have, need: value });
        }

        if let Some(balance) = self.balances.get_mut(from) {
            *balance -= value;
        }
        let recipient = self.balances.entry(to.to_string()).or_insert(0);
        *recipient += value;

        if data.is_empty() {
            log::info!("transfer: {} -> {} ({} units)", from, to, value);
        } else {
            log::info!(
                "call: {} -> {} ({} units, {} payload bytes)",
                from,
                to,
                value,
                data.len()
            );
        }

        Ok(())
    }
}
