//! Multisig Wallet: a multi-signature transaction authorization engine
//!
//! A fixed set of owners jointly controls a pool of funds: any owner may
//! propose a transfer or external call, a configurable quorum of distinct
//! owners must confirm it, and only then can it be executed through the
//! surrounding ledger runtime. Pending proposals expire after a
//! configurable number of blocks, and the registry keeps every proposal
//! forever for audit.
//!
//! # Example
//!
//! ```rust
//! use multisig_wallet::engine::{MultisigWallet, WalletConfig};
//! use multisig_wallet::runtime::{InMemoryLedger, Runtime};
//!
//! // 2-of-3 wallet, proposals expire after 200 blocks
//! let owners = vec!["alice".into(), "bob".into(), "carol".into()];
//! let config = WalletConfig::new(owners, 2, 200).unwrap();
//! let mut wallet = MultisigWallet::new("vault", config);
//!
//! let mut ledger = InMemoryLedger::new();
//! ledger.deposit("vault", 100);
//!
//! let tx = wallet.submit_transaction("alice", "dave", 40, vec![], &ledger).unwrap();
//! wallet.confirm_transaction("alice", tx, &ledger).unwrap();
//! wallet.confirm_transaction("bob", tx, &ledger).unwrap();
//! wallet.execute_transaction("bob", tx, &mut ledger).unwrap();
//!
//! assert_eq!(ledger.balance("dave"), 40);
//! assert!(wallet.get_transaction(tx).unwrap().executed);
//! ```

pub mod cli;
pub mod engine;
pub mod runtime;
pub mod storage;

// Re-export commonly used types
pub use engine::{
    FailurePolicy, MultisigWallet, Transaction, TransactionView, WalletConfig, WalletError,
};
pub use runtime::{InMemoryLedger, LedgerError, Runtime};
pub use storage::{Storage, StorageConfig, WalletState};
