//! # Host Service
//!
//! Thread-safe wrapper around [`CivicApp`] that owns the mempool, the commit
//! listeners and the history store, and drives block production.
//!
//! ## Commit Path
//!
//! ```text
//! broadcast_tx ──admit──→ [mempool] ──drain──→ deliver_tx* ──→ history.append ──→ commit
//!                                                                                   │
//!                                        recheck leftovers ←── reset check state ←──┤
//!                                                                                   └──→ listeners (in order)
//! ```
//!
//! A block is recorded before it is promoted. If the append fails nothing is
//! committed or published and the delivered transactions stay in the block
//! in progress for the next commit.
//!
//! Lock order is `commit_guard → app → mempool`. Listeners fire outside the
//! app lock but inside `commit_guard`, so commit order is preserved across
//! concurrent committers.

use crate::adapters::{FileHistoryLog, InMemoryHistory};
use crate::config::HostConfig;
use crate::domain::{
    Account, CivicApp, CommittedBlock, CommittedTx, FormQuery, HostError, HostInfo, Mempool,
    PooledTx, Rules,
};
use crate::ports::{CommitListener, HistoryStore, HostApi};
use async_trait::async_trait;
use cc_01_forms::Form;
use parking_lot::{Mutex, RwLock};
use shared_types::{Address, FormId, HostResult, TxId};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

pub struct HostService {
    config: HostConfig,
    app: Mutex<CivicApp>,
    mempool: Mutex<Mempool>,
    listeners: RwLock<Vec<Arc<dyn CommitListener>>>,
    history: Arc<dyn HistoryStore>,
    commit_guard: Mutex<()>,
}

impl HostService {
    pub fn new(config: HostConfig, history: Arc<dyn HistoryStore>) -> Self {
        let rules = Rules {
            open_admin_registration: config.open_admin_registration,
        };
        Self {
            app: Mutex::new(CivicApp::new(config.chain_id.clone(), rules)),
            mempool: Mutex::new(Mempool::new(config.mempool_capacity)),
            listeners: RwLock::new(Vec::new()),
            history,
            commit_guard: Mutex::new(()),
            config,
        }
    }

    /// Build a host backed by the history store `config` names.
    pub fn open(config: HostConfig) -> Result<Self, HostError> {
        let history: Arc<dyn HistoryStore> = match &config.history_path {
            Some(path) => Arc::new(FileHistoryLog::open(path)?),
            None => Arc::new(InMemoryHistory::new()),
        };
        Ok(Self::new(config, history))
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn add_listener(&self, listener: Arc<dyn CommitListener>) {
        self.listeners.write().push(listener);
    }

    /// Re-apply the recorded history and notify listeners of every replayed
    /// transaction. Must run before any new transaction is committed.
    pub fn replay(&self) -> Result<u64, HostError> {
        let _guard = self.commit_guard.lock();
        let blocks = self.history.load()?;
        let mut replayed = 0;
        for block in &blocks {
            let txs = self.app.lock().replay_block(block)?;
            self.notify(&txs);
            replayed += 1;
        }
        if replayed > 0 {
            let app = self.app.lock();
            info!(
                blocks = replayed,
                height = app.height(),
                app_hash = %hex::encode(app.app_hash()),
                "Replayed committed history"
            );
        }
        Ok(replayed)
    }

    pub fn check(&self, bytes: &[u8]) -> Result<TxId, HostError> {
        self.app.lock().check_tx(bytes)
    }

    /// Admit to the mempool view and enqueue.
    pub fn broadcast(&self, bytes: Vec<u8>) -> Result<TxId, HostError> {
        let mut app = self.app.lock();
        let mut mempool = self.mempool.lock();
        if mempool.is_full() {
            return Err(HostError::MempoolFull(mempool.capacity()));
        }
        let tx_id = app.admit(&bytes)?;
        mempool.push(PooledTx { tx_id, bytes });
        debug!(tx_id = %tx_id, pending = mempool.len(), "Admitted tx");
        Ok(tx_id)
    }

    pub fn deliver(&self, bytes: &[u8]) -> Result<TxId, HostError> {
        self.app.lock().deliver_tx(bytes)
    }

    /// Commit whatever has been delivered.
    pub fn commit(&self) -> Result<CommittedBlock, HostError> {
        let _guard = self.commit_guard.lock();
        self.finish_block()
    }

    /// Deliver up to `max_txs_per_block` pooled transactions and commit.
    /// Returns `None` when the mempool was empty and nothing is left over
    /// from a deferred commit.
    pub fn produce_block(&self) -> Result<Option<CommittedBlock>, HostError> {
        let _guard = self.commit_guard.lock();
        let batch = self.mempool.lock().drain(self.config.max_txs_per_block);
        if batch.is_empty() && self.app.lock().delivered_len() == 0 {
            return Ok(None);
        }
        {
            let mut app = self.app.lock();
            for pooled in &batch {
                if let Err(e) = app.deliver_tx(&pooled.bytes) {
                    warn!(tx_id = %pooled.tx_id, code = %e.code(), error = %e, "Dropped tx at delivery");
                }
            }
        }
        self.finish_block().map(Some)
    }

    fn finish_block(&self) -> Result<CommittedBlock, HostError> {
        let (block, txs) = {
            let mut app = self.app.lock();
            let staged = app.stage_block();
            if let Err(e) = self.history.append(&staged) {
                error!(height = staged.height, error = %e, "Failed to record block, commit deferred");
                return Err(e);
            }
            let committed = app.commit();
            let mut mempool = self.mempool.lock();
            mempool.retain(|pooled| match app.admit(&pooled.bytes) {
                Ok(_) => true,
                Err(e) => {
                    debug!(tx_id = %pooled.tx_id, error = %e, "Evicted tx on recheck");
                    false
                }
            });
            committed
        };
        info!(
            height = block.height,
            txs = block.txs.len(),
            app_hash = %hex::encode(block.app_hash),
            "Committed block"
        );
        self.notify(&txs);
        Ok(block)
    }

    fn notify(&self, txs: &[CommittedTx]) {
        let listeners = self.listeners.read().clone();
        for committed in txs {
            for listener in &listeners {
                listener.on_commit(committed);
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.mempool.lock().len()
    }

    pub fn height(&self) -> u64 {
        self.app.lock().height()
    }

    pub fn info_snapshot(&self) -> HostInfo {
        self.app.lock().info()
    }

    /// Produce a block every `block_interval` until `shutdown` flips.
    pub async fn run_block_producer(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.config.block_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        info!(interval = ?self.config.block_interval, "Block producer started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.produce_block() {
                        error!(error = %e, "Block production failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Block producer stopped");
    }
}

fn reply(result: Result<TxId, HostError>) -> HostResult {
    match result {
        Ok(tx_id) => HostResult::ok_with_data(tx_id.as_bytes().to_vec()),
        Err(e) => {
            debug!(code = %e.code(), error = %e, "Rejected tx");
            e.into()
        }
    }
}

#[async_trait]
impl HostApi for HostService {
    async fn broadcast_tx(&self, tx: Vec<u8>) -> HostResult {
        reply(self.broadcast(tx))
    }

    async fn account(&self, address: &Address) -> Option<Account> {
        self.app.lock().state().account(address).copied()
    }

    async fn next_sequence(&self, address: &Address) -> Option<u64> {
        self.app
            .lock()
            .pending_state()
            .account(address)
            .map(Account::next_sequence)
    }

    async fn find_form(&self, id: &FormId) -> Option<Form> {
        self.app.lock().state().form(id).cloned()
    }

    async fn search_forms(&self, query: &FormQuery) -> Vec<(FormId, Form)> {
        self.app.lock().state().search(query)
    }

    async fn info(&self) -> HostInfo {
        self.info_snapshot()
    }
}
