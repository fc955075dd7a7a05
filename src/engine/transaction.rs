//! Transaction records
//!
//! Entries in the wallet's append-only registry: a proposed transfer/call
//! together with its confirmation bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A proposed transfer/call awaiting owner confirmations
///
/// Records are created by submission, mutated only through the wallet's
/// confirm/revoke/execute operations, and never deleted: the registry is an
/// append-only audit log indexed by submission order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    /// Target account or contract identifier
    pub to: String,
    /// Native-currency amount to transfer
    pub value: u64,
    /// Opaque call payload; empty for a plain value transfer
    pub data: Vec<u8>,
    /// Whether the transaction has been executed (terminal, set at most once)
    pub executed: bool,
    /// Owners who have confirmed and not revoked
    pub confirmed_by: HashSet<String>,
    /// Block height at submission, used to compute expiry
    pub submitted_at_block: u64,
    /// Submission timestamp, kept for audit trails
    pub submitted_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new unconfirmed transaction
    pub fn new(to: String, value: u64, data: Vec<u8>, submitted_at_block: u64) -> Self {
        Self {
            to,
            value,
            data,
            executed: false,
            confirmed_by: HashSet::new(),
            submitted_at_block,
            submitted_at: Utc::now(),
        }
    }

    /// Number of distinct owners who have confirmed
    pub fn num_confirmations(&self) -> usize {
        self.confirmed_by.len()
    }

    /// Check if an owner has an active confirmation on this record
    pub fn is_confirmed_by(&self, owner: &str) -> bool {
        self.confirmed_by.contains(owner)
    }

    /// Check if the record has aged past the expiry window
    ///
    /// A window of 0 disables expiry. A record submitted at block `b` is
    /// still actionable at block `b + expiry_blocks` and expired at
    /// `b + expiry_blocks + 1`.
    pub fn is_expired(&self, current_block: u64, expiry_blocks: u64) -> bool {
        if expiry_blocks == 0 {
            return false;
        }
        current_block.saturating_sub(self.submitted_at_block) > expiry_blocks
    }

    /// Whether this record is a plain value transfer (no call payload)
    pub fn is_plain_transfer(&self) -> bool {
        self.data.is_empty()
    }
}

/// Immutable snapshot of a transaction, returned by read accessors
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TransactionView {
    pub index: u64,
    pub to: String,
    pub value: u64,
    pub data: Vec<u8>,
    pub executed: bool,
    pub num_confirmations: usize,
    pub submitted_at_block: u64,
}

impl TransactionView {
    /// Snapshot a registry record at a given index
    pub fn from_record(index: u64, tx: &Transaction) -> Self {
        Self {
            index,
            to: tx.to.clone(),
            value: tx.value,
            data: tx.data.clone(),
            executed: tx.executed,
            num_confirmations: tx.num_confirmations(),
            submitted_at_block: tx.submitted_at_block,
        }
    }
}
