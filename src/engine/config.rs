//! Wallet configuration
//!
//! Construction-time parameters for the authorization engine: the owner
//! set, the confirmation threshold, and the expiry window.

use crate::engine::wallet::WalletError;
use serde::{Deserialize, Serialize};

/// Policy applied when the runtime reports that an execution's underlying
/// transfer/call failed.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The failed attempt is consumed: the record stays `executed` and can
    /// never be retried. Resists griefing by repeated failing executions.
    #[default]
    Consume,
    /// The `executed` flag is rolled back after the failure, allowing a
    /// retry once the cause (e.g. insufficient balance) is fixed.
    Rollback,
}

/// Configuration for a multisig wallet
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WalletConfig {
    /// Account identifiers of all owners, in deployment order
    pub owners: Vec<String>,
    /// Minimum distinct owner confirmations required to execute
    pub required: usize,
    /// Maximum age (in blocks) a record may reach before it becomes
    /// permanently unactionable; 0 disables expiry
    pub expiry_blocks: u64,
    /// What happens to the `executed` flag when a transfer fails
    pub failure_policy: FailurePolicy,
}

impl WalletConfig {
    /// Create a new wallet configuration
    ///
    /// # Arguments
    /// * `owners` - Account identifiers of all owners (N)
    /// * `required` - Minimum confirmations to execute (M)
    /// * `expiry_blocks` - Expiry window in blocks; 0 means no expiry
    ///
    /// # Errors
    /// Returns `WalletError::InvalidConfig` if the owner list is empty or
    /// contains duplicates, or if `required` is out of `1..=owners.len()`.
    pub fn new(
        owners: Vec<String>,
        required: usize,
        expiry_blocks: u64,
    ) -> Result<Self, WalletError> {
        if owners.is_empty() {
            return Err(WalletError::InvalidConfig(
                "owner list must not be empty".to_string(),
            ));
        }

        if required == 0 {
            return Err(WalletError::InvalidConfig(
                "required confirmations must be at least 1".to_string(),
            ));
        }

        if required > owners.len() {
            return Err(WalletError::InvalidConfig(format!(
                "required confirmations {} exceeds owner count {}",
                required,
                owners.len()
            )));
        }

        // Check for duplicates without disturbing deployment order
        let mut sorted = owners.clone();
        sorted.sort();
        for i in 1..sorted.len() {
            if sorted[i] == sorted[i - 1] {
                return Err(WalletError::InvalidConfig(format!(
                    "duplicate owner: {}",
                    sorted[i]
                )));
            }
        }

        Ok(Self {
            owners,
            required,
            expiry_blocks,
            failure_policy: FailurePolicy::Consume,
        })
    }

    /// Select the policy applied when an execution's transfer fails
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Check if an account is an owner
    pub fn is_owner(&self, account: &str) -> bool {
        self.owners.iter().any(|o| o == account)
    }

    /// Get the required threshold (M)
    pub fn required(&self) -> usize {
        self.required
    }

    /// Get the total owner count (N)
    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    /// Whether the expiry window is enforced at all
    pub fn expiry_enabled(&self) -> bool {
        self.expiry_blocks > 0
    }

    /// Get description like "2-of-3"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.required, self.owners.len())
    }
}
