//! Multi-signature wallet engine
//!
//! The authorization state machine: owns the owner set and the append-only
//! transaction registry, and enforces every precondition on the
//! submit/confirm/revoke/execute path.

use crate::engine::config::{FailurePolicy, WalletConfig};
use crate::engine::transaction::{Transaction, TransactionView};
use crate::runtime::Runtime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to wallet operations
///
/// Every precondition violation has its own variant so callers can branch
/// on the exact condition. A failed operation never leaves partial state.
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Not an owner: {0}")]
    NotOwner(String),
    #[error("Transaction not found: {0}")]
    TxNotFound(u64),
    #[error("Transaction {0} already executed")]
    AlreadyExecuted(u64),
    #[error("Transaction {index} expired: submitted at block {submitted_at}, current block {current}")]
    Expired {
        index: u64,
        submitted_at: u64,
        current: u64,
    },
    #[error("Transaction {index} already confirmed by {owner}")]
    AlreadyConfirmed { index: u64, owner: String },
    #[error("No confirmation by {owner} to revoke on transaction {index}")]
    NotConfirmed { index: u64, owner: String },
    #[error("Insufficient confirmations: have {have}, need {need}")]
    InsufficientConfirmations { have: usize, need: usize },
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// A multi-signature wallet engine
///
/// A fixed owner set jointly controls the funds held by `address` on the
/// ledger: any owner may propose a transfer/call, and it becomes executable
/// only once `required` distinct owners have confirmed it. The registry is
/// append-only; executed and expired records stay in the log for audit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultisigWallet {
    /// The wallet's own account on the ledger
    pub address: String,
    /// Owner set, threshold, and expiry window (immutable post-construction)
    config: WalletConfig,
    /// Append-only registry, indexed by submission order
    transactions: Vec<Transaction>,
}

impl MultisigWallet {
    /// Create a new wallet for a ledger account
    pub fn new(address: impl Into<String>, config: WalletConfig) -> Self {
        Self {
            address: address.into(),
            config,
            transactions: Vec::new(),
        }
    }

    /// Get the wallet's ledger account
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Owner accounts in deployment order
    pub fn owners(&self) -> &[String] {
        &self.config.owners
    }

    /// Required confirmation threshold
    pub fn required(&self) -> usize {
        self.config.required
    }

    /// Expiry window in blocks (0 = no expiry)
    pub fn expiry_blocks(&self) -> u64 {
        self.config.expiry_blocks
    }

    /// Check if an account is an owner
    pub fn is_owner(&self, account: &str) -> bool {
        self.config.is_owner(account)
    }

    /// Total number of records ever submitted
    pub fn transaction_count(&self) -> u64 {
        self.transactions.len() as u64
    }

    /// Propose a new transfer/call
    ///
    /// Owner-only. The record starts with zero confirmations: submitting
    /// does not imply approving, the submitter must confirm separately.
    /// Returns the new record's index.
    pub fn submit_transaction<R: Runtime + ?Sized>(
        &mut self,
        caller: &str,
        to: impl Into<String>,
        value: u64,
        data: Vec<u8>,
        runtime: &R,
    ) -> Result<u64, WalletError> {
        self.require_owner(caller)?;

        let index = self.transactions.len() as u64;
        let tx = Transaction::new(to.into(), value, data, runtime.block_height());
        log::info!(
            "wallet {}: tx {} submitted by {} ({} units to {})",
            self.address,
            index,
            caller,
            tx.value,
            tx.to
        );
        self.transactions.push(tx);

        Ok(index)
    }

    /// Record an owner's approval of a pending transaction
    pub fn confirm_transaction<R: Runtime + ?Sized>(
        &mut self,
        caller: &str,
        index: u64,
        runtime: &R,
    ) -> Result<(), WalletError> {
        self.require_owner(caller)?;
        let current_block = runtime.block_height();
        let expiry_blocks = self.config.expiry_blocks;

        let tx = self.actionable_record(index, current_block, expiry_blocks)?;
        if tx.is_confirmed_by(caller) {
            return Err(WalletError::AlreadyConfirmed {
                index,
                owner: caller.to_string(),
            });
        }

        tx.confirmed_by.insert(caller.to_string());
        log::debug!(
            "wallet: tx {} confirmed by {} ({} confirmations)",
            index,
            caller,
            tx.num_confirmations()
        );

        Ok(())
    }

    /// Withdraw an owner's prior approval of a pending transaction
    ///
    /// Available until execution; an expired record can still be revoked,
    /// since withdrawing approval from an unactionable record is harmless.
    pub fn revoke_confirmation(&mut self, caller: &str, index: u64) -> Result<(), WalletError> {
        self.require_owner(caller)?;

        let tx = self
            .transactions
            .get_mut(index as usize)
            .ok_or(WalletError::TxNotFound(index))?;
        if tx.executed {
            return Err(WalletError::AlreadyExecuted(index));
        }

        if !tx.confirmed_by.remove(caller) {
            return Err(WalletError::NotConfirmed {
                index,
                owner: caller.to_string(),
            });
        }
        log::debug!(
            "wallet: tx {} confirmation revoked by {} ({} confirmations)",
            index,
            caller,
            tx.num_confirmations()
        );

        Ok(())
    }

    /// Execute a fully confirmed transaction through the runtime
    ///
    /// The record is marked executed before the runtime is invoked, so a
    /// call that somehow reaches back into this wallet for the same index
    /// hits the `AlreadyExecuted` check. When the runtime reports failure,
    /// the configured `FailurePolicy` decides whether the attempt is
    /// consumed or the flag is rolled back for a retry.
    pub fn execute_transaction<R: Runtime + ?Sized>(
        &mut self,
        caller: &str,
        index: u64,
        runtime: &mut R,
    ) -> Result<(), WalletError> {
        self.require_owner(caller)?;
        let current_block = runtime.block_height();
        let expiry_blocks = self.config.expiry_blocks;
        let required = self.config.required;
        let failure_policy = self.config.failure_policy;

        let tx = self.actionable_record(index, current_block, expiry_blocks)?;
        let have = tx.num_confirmations();
        if have < required {
            return Err(WalletError::InsufficientConfirmations {
                have,
                need: required,
            });
        }

        // Effects before interaction: mark executed, then call out
        tx.executed = true;
        let (to, value, data) = (tx.to.clone(), tx.value, tx.data.clone());

        if let Err(e) = runtime.perform(&self.address, &to, value, &data) {
            if failure_policy == FailurePolicy::Rollback {
                // Record is pending again; confirmations are kept
                self.transactions[index as usize].executed = false;
            }
            log::warn!("wallet {}: tx {} execution failed: {}", self.address, index, e);
            return Err(WalletError::ExecutionFailed(e.to_string()));
        }

        log::info!(
            "wallet {}: tx {} executed by {} ({} units to {})",
            self.address,
            index,
            caller,
            value,
            to
        );

        Ok(())
    }

    /// Read-only snapshot of a transaction
    pub fn get_transaction(&self, index: u64) -> Result<TransactionView, WalletError> {
        self.transactions
            .get(index as usize)
            .map(|tx| TransactionView::from_record(index, tx))
            .ok_or(WalletError::TxNotFound(index))
    }

    /// Snapshots of every record ever submitted, in submission order
    pub fn list_transactions(&self) -> Vec<TransactionView> {
        self.transactions
            .iter()
            .enumerate()
            .map(|(i, tx)| TransactionView::from_record(i as u64, tx))
            .collect()
    }

    fn require_owner(&self, caller: &str) -> Result<(), WalletError> {
        if !self.config.is_owner(caller) {
            return Err(WalletError::NotOwner(caller.to_string()));
        }
        Ok(())
    }

    /// Look up a record that may still be confirmed/executed: it must
    /// exist, be unexecuted, and be within the expiry window.
    fn actionable_record(
        &mut self,
        index: u64,
        current_block: u64,
        expiry_blocks: u64,
    ) -> Result<&mut Transaction, WalletError> {
        let tx = self
            .transactions
            .get_mut(index as usize)
            .ok_or(WalletError::TxNotFound(index))?;
        if tx.executed {
            return Err(WalletError::AlreadyExecuted(index));
        }
        if tx.is_expired(current_block, expiry_blocks) {
            return Err(WalletError::Expired {
                index,
                submitted_at: tx.submitted_at_block,
                current: current_block,
            });
        }
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{InMemoryLedger, LedgerError};

    const EXPIRY: u64 = 200;

    fn test_wallet() -> (MultisigWallet, InMemoryLedger) {
        let config = WalletConfig::new(
            vec![
                "alice".to_string(),
                "bob".to_string(),
                "carol".to_string(),
            ],
            2,
            EXPIRY,
        )
        .unwrap();
        (MultisigWallet::new("vault", config), InMemoryLedger::new())
    }

    /// A runtime whose transfers always fail
    struct FailingRuntime {
        height: u64,
    }

    impl Runtime for FailingRuntime {
        fn block_height(&self) -> u64 {
            self.height
        }

        fn balance(&self, _account: &str) -> u64 {
            0
        }

        fn perform(
            &mut self,
            _from: &str,
            _to: &str,
            _value: u64,
            _data: &[u8],
        ) -> Result<(), LedgerError> {
            Err(LedgerError::TransferRejected("runtime says no".to_string()))
        }
    }

    #[test]
    fn test_construction_accessors() {
        let (wallet, _) = test_wallet();

        assert_eq!(wallet.owners(), &["alice", "bob", "carol"]);
        assert_eq!(wallet.required(), 2);
        assert_eq!(wallet.expiry_blocks(), EXPIRY);
        assert_eq!(wallet.transaction_count(), 0);
        assert!(wallet.is_owner("bob"));
        assert!(!wallet.is_owner("mallory"));
    }

    #[test]
    fn test_submit_by_owner() {
        let (mut wallet, ledger) = test_wallet();

        let index = wallet
            .submit_transaction("alice", "recipient", 50, vec![], &ledger)
            .unwrap();
        assert_eq!(index, 0);

        let tx = wallet.get_transaction(0).unwrap();
        assert_eq!(tx.to, "recipient");
        assert_eq!(tx.value, 50);
        assert!(!tx.executed);
        // Submission alone does not confirm
        assert_eq!(tx.num_confirmations, 0);
    }

    #[test]
    fn test_submit_by_non_owner_rejected() {
        let (mut wallet, ledger) = test_wallet();

        let result = wallet.submit_transaction("mallory", "mallory", 50, vec![], &ledger);
        assert!(matches!(result, Err(WalletError::NotOwner(_))));
        assert_eq!(wallet.transaction_count(), 0);
    }

    #[test]
    fn test_indices_are_monotonic() {
        let (mut wallet, ledger) = test_wallet();

        for expected in 0..5u64 {
            let index = wallet
                .submit_transaction("alice", "recipient", expected, vec![], &ledger)
                .unwrap();
            assert_eq!(index, expected);
        }
        assert_eq!(wallet.transaction_count(), 5);
    }

    #[test]
    fn test_confirm_and_double_confirm() {
        let (mut wallet, ledger) = test_wallet();
        wallet
            .submit_transaction("alice", "recipient", 0, vec![], &ledger)
            .unwrap();

        wallet.confirm_transaction("alice", 0, &ledger).unwrap();
        assert_eq!(wallet.get_transaction(0).unwrap().num_confirmations, 1);

        let result = wallet.confirm_transaction("alice", 0, &ledger);
        assert!(matches!(result, Err(WalletError::AlreadyConfirmed { .. })));
        // Failed confirm must not bump the count
        assert_eq!(wallet.get_transaction(0).unwrap().num_confirmations, 1);
    }

    #[test]
    fn test_confirm_by_non_owner_rejected() {
        let (mut wallet, ledger) = test_wallet();
        wallet
            .submit_transaction("alice", "recipient", 0, vec![], &ledger)
            .unwrap();

        let result = wallet.confirm_transaction("mallory", 0, &ledger);
        assert!(matches!(result, Err(WalletError::NotOwner(_))));
    }

    #[test]
    fn test_confirm_unknown_index() {
        let (mut wallet, ledger) = test_wallet();

        let result = wallet.confirm_transaction("alice", 7, &ledger);
        assert!(matches!(result, Err(WalletError::TxNotFound(7))));
    }

    #[test]
    fn test_revoke_symmetry() {
        let (mut wallet, ledger) = test_wallet();
        wallet
            .submit_transaction("alice", "recipient", 0, vec![], &ledger)
            .unwrap();

        wallet.confirm_transaction("alice", 0, &ledger).unwrap();
        wallet.revoke_confirmation("alice", 0).unwrap();
        assert_eq!(wallet.get_transaction(0).unwrap().num_confirmations, 0);

        // Re-confirming after a revoke is allowed
        wallet.confirm_transaction("alice", 0, &ledger).unwrap();
        assert_eq!(wallet.get_transaction(0).unwrap().num_confirmations, 1);
    }

    #[test]
    fn test_revoke_without_confirm_rejected() {
        let (mut wallet, ledger) = test_wallet();
        wallet
            .submit_transaction("alice", "recipient", 0, vec![], &ledger)
            .unwrap();

        let result = wallet.revoke_confirmation("bob", 0);
        assert!(matches!(result, Err(WalletError::NotConfirmed { .. })));
    }

    #[test]
    fn test_execute_below_quorum_rejected() {
        let (mut wallet, mut ledger) = test_wallet();
        ledger.deposit("vault", 100);
        wallet
            .submit_transaction("alice", "recipient", 50, vec![], &ledger)
            .unwrap();
        wallet.confirm_transaction("alice", 0, &ledger).unwrap();

        let result = wallet.execute_transaction("alice", 0, &mut ledger);
        assert!(matches!(
            result,
            Err(WalletError::InsufficientConfirmations { have: 1, need: 2 })
        ));
        assert!(!wallet.get_transaction(0).unwrap().executed);
        assert_eq!(ledger.balance("recipient"), 0);
    }

    #[test]
    fn test_deposit_and_spend_scenario() {
        let (mut wallet, mut ledger) = test_wallet();
        assert_eq!(ledger.balance("vault"), 0);

        ledger.deposit("vault", 100);
        let index = wallet
            .submit_transaction("alice", "xavier", 50, vec![], &ledger)
            .unwrap();
        wallet.confirm_transaction("alice", index, &ledger).unwrap();
        wallet.confirm_transaction("bob", index, &ledger).unwrap();

        wallet.execute_transaction("alice", index, &mut ledger).unwrap();

        assert_eq!(ledger.balance("xavier"), 50);
        assert_eq!(ledger.balance("vault"), 50);
        let tx = wallet.get_transaction(index).unwrap();
        assert!(tx.executed);
        assert_eq!(tx.num_confirmations, 2);
    }

    #[test]
    fn test_single_execution() {
        let (mut wallet, mut ledger) = test_wallet();
        ledger.deposit("vault", 100);
        wallet
            .submit_transaction("alice", "recipient", 50, vec![], &ledger)
            .unwrap();
        wallet.confirm_transaction("alice", 0, &ledger).unwrap();
        wallet.confirm_transaction("bob", 0, &ledger).unwrap();
        wallet.execute_transaction("alice", 0, &mut ledger).unwrap();

        // A second execution attempt is blocked by the executed flag, which
        // is also what stops a re-entrant call from the runtime
        let result = wallet.execute_transaction("bob", 0, &mut ledger);
        assert!(matches!(result, Err(WalletError::AlreadyExecuted(0))));
        // The transfer happened exactly once
        assert_eq!(ledger.balance("recipient"), 50);

        // Post-execution mutation is blocked across the board
        let result = wallet.confirm_transaction("carol", 0, &ledger);
        assert!(matches!(result, Err(WalletError::AlreadyExecuted(0))));
        let result = wallet.revoke_confirmation("alice", 0);
        assert!(matches!(result, Err(WalletError::AlreadyExecuted(0))));

        // Reads still work
        assert!(wallet.get_transaction(0).unwrap().executed);
    }

    #[test]
    fn test_expiry_blocks_confirm_and_execute() {
        let (mut wallet, mut ledger) = test_wallet();
        ledger.deposit("vault", 100);
        wallet
            .submit_transaction("alice", "recipient", 50, vec![], &ledger)
            .unwrap();
        wallet.confirm_transaction("alice", 0, &ledger).unwrap();

        // At exactly the window boundary the record is still actionable
        ledger.advance_blocks(EXPIRY);
        wallet.confirm_transaction("bob", 0, &ledger).unwrap();

        // One block past the window it is permanently unactionable
        ledger.advance_blocks(1);
        let result = wallet.confirm_transaction("carol", 0, &ledger);
        assert!(matches!(result, Err(WalletError::Expired { .. })));
        let result = wallet.execute_transaction("alice", 0, &mut ledger);
        assert!(matches!(result, Err(WalletError::Expired { .. })));

        // But it stays in the log for audit
        let tx = wallet.get_transaction(0).unwrap();
        assert!(!tx.executed);
        assert_eq!(tx.num_confirmations, 2);
    }

    #[test]
    fn test_expired_record_can_still_be_revoked() {
        let (mut wallet, mut ledger) = test_wallet();
        wallet
            .submit_transaction("alice", "recipient", 0, vec![], &ledger)
            .unwrap();
        wallet.confirm_transaction("alice", 0, &ledger).unwrap();

        ledger.advance_blocks(EXPIRY + 1);
        wallet.revoke_confirmation("alice", 0).unwrap();
        assert_eq!(wallet.get_transaction(0).unwrap().num_confirmations, 0);
    }

    #[test]
    fn test_zero_expiry_never_expires() {
        let config = WalletConfig::new(
            vec!["alice".to_string(), "bob".to_string()],
            2,
            0,
        )
        .unwrap();
        let mut wallet = MultisigWallet::new("vault", config);
        let mut ledger = InMemoryLedger::new();
        ledger.deposit("vault", 10);

        wallet
            .submit_transaction("alice", "recipient", 10, vec![], &ledger)
            .unwrap();
        ledger.advance_blocks(1_000_000);

        wallet.confirm_transaction("alice", 0, &ledger).unwrap();
        wallet.confirm_transaction("bob", 0, &ledger).unwrap();
        wallet.execute_transaction("alice", 0, &mut ledger).unwrap();
        assert_eq!(ledger.balance("recipient"), 10);
    }

    #[test]
    fn test_failed_execution_consumes_attempt() {
        let (mut wallet, ledger) = test_wallet();
        wallet
            .submit_transaction("alice", "recipient", 50, vec![], &ledger)
            .unwrap();
        wallet.confirm_transaction("alice", 0, &ledger).unwrap();
        wallet.confirm_transaction("bob", 0, &ledger).unwrap();

        let mut failing = FailingRuntime { height: 0 };
        let result = wallet.execute_transaction("alice", 0, &mut failing);
        assert!(matches!(result, Err(WalletError::ExecutionFailed(_))));

        // Default policy: the flag was set before the call and is kept, so
        // the attempt is spent
        assert!(wallet.get_transaction(0).unwrap().executed);
        let result = wallet.execute_transaction("bob", 0, &mut failing);
        assert!(matches!(result, Err(WalletError::AlreadyExecuted(0))));
    }

    #[test]
    fn test_rollback_policy_allows_retry() {
        let config = WalletConfig::new(
            vec!["alice".to_string(), "bob".to_string()],
            2,
            0,
        )
        .unwrap()
        .with_failure_policy(FailurePolicy::Rollback);
        let mut wallet = MultisigWallet::new("vault", config);
        let mut ledger = InMemoryLedger::new();

        wallet
            .submit_transaction("alice", "recipient", 50, vec![], &ledger)
            .unwrap();
        wallet.confirm_transaction("alice", 0, &ledger).unwrap();
        wallet.confirm_transaction("bob", 0, &ledger).unwrap();

        // Wallet is unfunded: the transfer fails and the flag rolls back
        let result = wallet.execute_transaction("alice", 0, &mut ledger);
        assert!(matches!(result, Err(WalletError::ExecutionFailed(_))));
        let tx = wallet.get_transaction(0).unwrap();
        assert!(!tx.executed);
        // Confirmations survive the failed attempt
        assert_eq!(tx.num_confirmations, 2);

        // Fund it and retry
        ledger.deposit("vault", 50);
        wallet.execute_transaction("alice", 0, &mut ledger).unwrap();
        assert!(wallet.get_transaction(0).unwrap().executed);
        assert_eq!(ledger.balance("recipient"), 50);
    }

    #[test]
    fn test_execute_by_non_owner_rejected() {
        let (mut wallet, mut ledger) = test_wallet();
        wallet
            .submit_transaction("alice", "recipient", 0, vec![], &ledger)
            .unwrap();
        wallet.confirm_transaction("alice", 0, &ledger).unwrap();
        wallet.confirm_transaction("bob", 0, &ledger).unwrap();

        let result = wallet.execute_transaction("mallory", 0, &mut ledger);
        assert!(matches!(result, Err(WalletError::NotOwner(_))));
        assert!(!wallet.get_transaction(0).unwrap().executed);
    }

    #[test]
    fn test_revoke_reopens_quorum_gate() {
        let (mut wallet, mut ledger) = test_wallet();
        ledger.deposit("vault", 100);
        wallet
            .submit_transaction("alice", "recipient", 50, vec![], &ledger)
            .unwrap();
        wallet.confirm_transaction("alice", 0, &ledger).unwrap();
        wallet.confirm_transaction("bob", 0, &ledger).unwrap();

        // Bob withdraws approval before anyone executes
        wallet.revoke_confirmation("bob", 0).unwrap();

        let result = wallet.execute_transaction("alice", 0, &mut ledger);
        assert!(matches!(
            result,
            Err(WalletError::InsufficientConfirmations { have: 1, need: 2 })
        ));
    }

    #[test]
    fn test_call_payload_round_trip() {
        let (mut wallet, mut ledger) = test_wallet();
        ledger.deposit("vault", 10);

        let payload = vec![0xa9, 0x05, 0x9c, 0xbb];
        let index = wallet
            .submit_transaction("alice", "contract", 10, payload.clone(), &ledger)
            .unwrap();
        assert_eq!(wallet.get_transaction(index).unwrap().data, payload);

        wallet.confirm_transaction("bob", index, &ledger).unwrap();
        wallet.confirm_transaction("carol", index, &ledger).unwrap();
        wallet.execute_transaction("carol", index, &mut ledger).unwrap();
        assert_eq!(ledger.balance("contract"), 10);
    }

    #[test]
    fn test_get_transaction_not_found() {
        let (wallet, _) = test_wallet();
        assert!(matches!(
            wallet.get_transaction(0),
            Err(WalletError::TxNotFound(0))
        ));
    }

    #[test]
    fn test_list_transactions() {
        let (mut wallet, ledger) = test_wallet();
        wallet
            .submit_transaction("alice", "x", 1, vec![], &ledger)
            .unwrap();
        wallet
            .submit_transaction("bob", "y", 2, vec![], &ledger)
            .unwrap();

        let list = wallet.list_transactions();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].index, 0);
        assert_eq!(list[0].to, "x");
        assert_eq!(list[1].index, 1);
        assert_eq!(list[1].to, "y");
    }
}
