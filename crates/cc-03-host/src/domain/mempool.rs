//! Bounded FIFO of admitted transactions, keyed by tx id.

use shared_types::TxId;
use std::collections::{HashSet, VecDeque};

/// A transaction waiting for a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PooledTx {
    pub tx_id: TxId,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct Mempool {
    capacity: usize,
    queue: VecDeque<PooledTx>,
    ids: HashSet<TxId>,
}

impl Mempool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            queue: VecDeque::new(),
            ids: HashSet::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.capacity
    }

    pub fn contains(&self, tx_id: &TxId) -> bool {
        self.ids.contains(tx_id)
    }

    /// Queue a transaction. Returns `false` when it is already pooled or the
    /// pool is full.
    pub fn push(&mut self, tx: PooledTx) -> bool {
        if self.is_full() || !self.ids.insert(tx.tx_id) {
            return false;
        }
        self.queue.push_back(tx);
        true
    }

    /// Remove up to `max` transactions in arrival order.
    pub fn drain(&mut self, max: usize) -> Vec<PooledTx> {
        let n = max.min(self.queue.len());
        let batch: Vec<PooledTx> = self.queue.drain(..n).collect();
        for tx in &batch {
            self.ids.remove(&tx.tx_id);
        }
        batch
    }

    /// Keep only transactions for which `keep` returns true, in order.
    pub fn retain(&mut self, mut keep: impl FnMut(&PooledTx) -> bool) {
        let ids = &mut self.ids;
        self.queue.retain(|tx| {
            let kept = keep(tx);
            if !kept {
                ids.remove(&tx.tx_id);
            }
            kept
        });
    }
}
