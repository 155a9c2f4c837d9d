//! Host configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default chain id mixed into every sign-bytes.
pub const DEFAULT_CHAIN_ID: &str = "civic-chain";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Chain id the host verifies signatures against.
    pub chain_id: String,
    /// Interval between produced blocks.
    #[serde(with = "humantime_serde")]
    pub block_interval: Duration,
    /// Maximum admitted transactions awaiting a block.
    pub mempool_capacity: usize,
    /// Maximum transactions delivered per block.
    pub max_txs_per_block: usize,
    /// Run the in-process block producer. Disable when an external engine
    /// drives `deliver_tx`/`commit` over the socket transport.
    pub produce_blocks: bool,
    /// Accept admin registrations after the first admin exists.
    pub open_admin_registration: bool,
    /// Durable history log; `None` keeps history in memory only.
    pub history_path: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            block_interval: Duration::from_secs(1),
            mempool_capacity: 10_000,
            max_txs_per_block: 500,
            produce_blocks: true,
            open_admin_registration: false,
            history_path: None,
        }
    }
}

impl HostConfig {
    pub fn validate(&self) -> Result<(), HostConfigError> {
        if self.chain_id.trim().is_empty() {
            return Err(HostConfigError::Invalid("chain_id cannot be empty".into()));
        }
        if self.block_interval.is_zero() {
            return Err(HostConfigError::Invalid(
                "block_interval cannot be 0".into(),
            ));
        }
        if self.mempool_capacity == 0 {
            return Err(HostConfigError::Invalid(
                "mempool_capacity cannot be 0".into(),
            ));
        }
        if self.max_txs_per_block == 0 {
            return Err(HostConfigError::Invalid(
                "max_txs_per_block cannot be 0".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum HostConfigError {
    #[error("invalid host configuration: {0}")]
    Invalid(String),
}
