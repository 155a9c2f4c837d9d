//! Committed history records.

use super::state::Effect;
use cc_02_transactions::Tx;
use serde::{Deserialize, Serialize};
use shared_types::{Hash, TxId};

/// One committed block: the raw bytes of every successfully delivered tx,
/// in delivery order, and the app hash after applying them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedBlock {
    pub height: u64,
    pub app_hash: Hash,
    pub txs: Vec<Vec<u8>>,
}

/// A transaction as seen by commit listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedTx {
    pub height: u64,
    /// Position within the block.
    pub index: usize,
    pub tx_id: TxId,
    pub tx: Tx,
    pub effect: Effect,
}
