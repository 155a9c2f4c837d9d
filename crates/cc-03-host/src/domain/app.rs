//! # Civic Application
//!
//! The state machine behind the host entry points. Three views of the state
//! are kept:
//!
//! ```text
//! committed  - last committed block; serves queries
//! deliver    - committed + txs delivered in the current block
//! check      - committed + txs admitted to the mempool since the last commit
//! ```
//!
//! `commit` promotes `deliver` to `committed` and resets `check` to it.

use super::errors::HostError;
use super::history::{CommittedBlock, CommittedTx};
use super::state::{AppState, Effect, Rules};
use cc_02_transactions::Tx;
use serde::{Deserialize, Serialize};
use shared_types::{Hash, TxId};
use tracing::debug;

/// Summary returned by `info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    pub chain_id: String,
    pub height: u64,
    pub app_hash: String,
    pub accounts: usize,
    pub forms: usize,
}

#[derive(Debug)]
struct Delivered {
    bytes: Vec<u8>,
    tx_id: TxId,
    tx: Tx,
    effect: Effect,
}

#[derive(Debug)]
pub struct CivicApp {
    chain_id: String,
    rules: Rules,
    committed: AppState,
    deliver: AppState,
    check: AppState,
    delivered: Vec<Delivered>,
    height: u64,
    app_hash: Hash,
}

impl CivicApp {
    pub fn new(chain_id: impl Into<String>, rules: Rules) -> Self {
        let committed = AppState::new();
        let app_hash = committed.app_hash(0);
        Self {
            chain_id: chain_id.into(),
            rules,
            deliver: committed.clone(),
            check: committed.clone(),
            committed,
            delivered: Vec::new(),
            height: 0,
            app_hash,
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn app_hash(&self) -> Hash {
        self.app_hash
    }

    /// Committed state.
    pub fn state(&self) -> &AppState {
        &self.committed
    }

    /// State including admitted but uncommitted transactions.
    pub fn pending_state(&self) -> &AppState {
        &self.check
    }

    pub fn info(&self) -> HostInfo {
        HostInfo {
            chain_id: self.chain_id.clone(),
            height: self.height,
            app_hash: hex::encode(self.app_hash),
            accounts: self.committed.account_count(),
            forms: self.committed.form_count(),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<(Tx, TxId), HostError> {
        let tx = Tx::decode(bytes)?;
        let tx_id = tx.id(&self.chain_id);
        Ok((tx, tx_id))
    }

    /// Validate against the mempool view without changing anything.
    pub fn check_tx(&self, bytes: &[u8]) -> Result<TxId, HostError> {
        let (tx, tx_id) = self.decode(bytes)?;
        self.check.check(&tx, &self.chain_id, self.rules)?;
        Ok(tx_id)
    }

    /// Validate against the mempool view and apply to it, so that later
    /// admissions see this transaction's sequence.
    pub fn admit(&mut self, bytes: &[u8]) -> Result<TxId, HostError> {
        let (tx, tx_id) = self.decode(bytes)?;
        self.check.execute(&tx, &self.chain_id, self.rules)?;
        Ok(tx_id)
    }

    /// Apply to the block being built.
    pub fn deliver_tx(&mut self, bytes: &[u8]) -> Result<TxId, HostError> {
        let (tx, tx_id) = self.decode(bytes)?;
        let effect = self.deliver.execute(&tx, &self.chain_id, self.rules)?;
        debug!(tx_id = %tx_id, tx_type = %tx.tx_type, "Delivered tx");
        self.delivered.push(Delivered {
            bytes: bytes.to_vec(),
            tx_id,
            tx,
            effect,
        });
        Ok(tx_id)
    }

    /// The block `commit` would produce now, with nothing promoted.
    pub fn stage_block(&self) -> CommittedBlock {
        let height = self.height + 1;
        CommittedBlock {
            height,
            app_hash: self.deliver.app_hash(height),
            txs: self.delivered.iter().map(|d| d.bytes.clone()).collect(),
        }
    }

    /// Transactions delivered since the last commit.
    pub fn delivered_len(&self) -> usize {
        self.delivered.len()
    }

    /// Drop everything delivered since the last commit.
    pub fn abort_block(&mut self) {
        self.deliver = self.committed.clone();
        self.delivered.clear();
    }

    /// Finalize the current block.
    pub fn commit(&mut self) -> (CommittedBlock, Vec<CommittedTx>) {
        self.height += 1;
        self.committed = self.deliver.clone();
        self.check = self.deliver.clone();
        self.app_hash = self.committed.app_hash(self.height);

        let height = self.height;
        let mut txs = Vec::with_capacity(self.delivered.len());
        let mut committed = Vec::with_capacity(self.delivered.len());
        for (index, d) in self.delivered.drain(..).enumerate() {
            txs.push(d.bytes);
            committed.push(CommittedTx {
                height,
                index,
                tx_id: d.tx_id,
                tx: d.tx,
                effect: d.effect,
            });
        }
        let block = CommittedBlock {
            height,
            app_hash: self.app_hash,
            txs,
        };
        (block, committed)
    }

    /// Re-apply a recorded block, checking the result against its app hash.
    /// On a mismatch nothing is committed and the block in progress is
    /// discarded.
    pub fn replay_block(&mut self, block: &CommittedBlock) -> Result<Vec<CommittedTx>, HostError> {
        let mismatch = HostError::ReplayMismatch {
            height: block.height,
        };
        if block.height != self.height + 1 {
            return Err(mismatch);
        }
        for bytes in &block.txs {
            if self.deliver_tx(bytes).is_err() {
                self.abort_block();
                return Err(mismatch);
            }
        }
        if self.stage_block().app_hash != block.app_hash {
            self.abort_block();
            return Err(mismatch);
        }
        Ok(self.commit().1)
    }
}
