//! Persistence layer
//!
//! JSON storage for the wallet + ledger state used by the CLI.

pub mod persistence;

pub use persistence::{Storage, StorageConfig, StorageError, WalletState};
