//! # Commit Worker
//!
//! Single consumer of committed transactions. The host calls
//! [`ChannelCommitListener::on_commit`] synchronously inside its commit
//! path; the listener only enqueues, and the worker folds each transaction
//! into the [`FeedIndex`] and publishes the resulting event.
//!
//! The channel is unbounded so the host's commit path never waits on the
//! feed. Commit order is preserved end to end.

use super::publisher::FeedPublisher;
use crate::domain::FeedIndex;
use cc_03_host::{CommitListener, CommittedTx};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Host-side end of the commit channel.
pub struct ChannelCommitListener {
    tx: mpsc::UnboundedSender<CommittedTx>,
}

impl CommitListener for ChannelCommitListener {
    fn on_commit(&self, committed: &CommittedTx) {
        if self.tx.send(committed.clone()).is_err() {
            warn!(tx_id = %committed.tx_id, "Commit worker gone, dropping committed tx");
        }
    }
}

pub struct CommitWorker {
    rx: mpsc::UnboundedReceiver<CommittedTx>,
    index: FeedIndex,
    publisher: Arc<FeedPublisher>,
}

/// Create a connected listener and worker.
pub fn commit_channel(publisher: Arc<FeedPublisher>) -> (ChannelCommitListener, CommitWorker) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ChannelCommitListener { tx },
        CommitWorker {
            rx,
            index: FeedIndex::new(),
            publisher,
        },
    )
}

impl CommitWorker {
    pub fn index(&self) -> &FeedIndex {
        &self.index
    }

    /// Apply one committed transaction.
    pub fn handle(&mut self, committed: &CommittedTx) {
        let Some(event) = self.index.apply(committed) else {
            return;
        };
        let delivered = self.publisher.publish(event);
        debug!(
            height = committed.height,
            index = committed.index,
            tx_id = %committed.tx_id,
            subscribers = delivered,
            "Published feed event"
        );
    }

    /// Consume until the host side is dropped or `shutdown` flips, then close
    /// every subscriber.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Commit worker started");
        loop {
            tokio::select! {
                biased;
                committed = self.rx.recv() => match committed {
                    Some(committed) => self.handle(&committed),
                    None => break,
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        self.publisher.close_all();
        info!(forms = self.index.len(), "Commit worker stopped");
    }
}
