//! Multi-signature authorization engine
//!
//! An M-of-N wallet: a fixed set of owners jointly controls a pool of
//! funds, and a transaction leaves the wallet only after M distinct owners
//! have confirmed it.
//!
//! # Example
//!
//! ```
//! use multisig_wallet::engine::{MultisigWallet, WalletConfig};
//! use multisig_wallet::runtime::{InMemoryLedger, Runtime};
//!
//! // Create a 2-of-3 wallet with a 200-block expiry window
//! let owners = vec!["alice".into(), "bob".into(), "carol".into()];
//! let config = WalletConfig::new(owners, 2, 200).unwrap();
//! let mut wallet = MultisigWallet::new("vault", config);
//!
//! // Fund it, propose a transfer, collect confirmations, execute
//! let mut ledger = InMemoryLedger::new();
//! ledger.deposit("vault", 100);
//!
//! let index = wallet.submit_transaction("alice", "dave", 40, vec![], &ledger).unwrap();
//! wallet.confirm_transaction("alice", index, &ledger).unwrap();
//! wallet.confirm_transaction("bob", index, &ledger).unwrap();
//! wallet.execute_transaction("alice", index, &mut ledger).unwrap();
//!
//! assert_eq!(ledger.balance("dave"), 40);
//! ```

pub mod config;
pub mod transaction;
pub mod wallet;

pub use config::{FailurePolicy, WalletConfig};
pub use transaction::{Transaction, TransactionView};
pub use wallet::{MultisigWallet, WalletError};
