//! Command-line interface
//!
//! Command handlers driving the wallet against the persisted ledger state.

pub mod commands;

pub use commands::*;
