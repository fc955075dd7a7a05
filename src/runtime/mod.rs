//! Execution environment boundary
//!
//! The `Runtime` trait is everything the wallet needs from the outside
//! world: a block clock, account balances, and a transfer/call primitive.

pub mod ledger;

pub use ledger::{InMemoryLedger, LedgerError, Runtime};
