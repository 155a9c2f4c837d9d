//! # Outbound Ports
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `CommitListener` | Notified of each committed tx, in commit order |
//! | `HistoryStore` | Durable committed-block log for replay |

use crate::domain::{CommittedBlock, CommittedTx, HostError};

/// Commit callback.
///
/// Called once per successfully delivered transaction, in delivery order,
/// after its block commits. Implementations must not block.
pub trait CommitListener: Send + Sync {
    fn on_commit(&self, committed: &CommittedTx);
}

/// Committed-block storage.
pub trait HistoryStore: Send + Sync {
    fn append(&self, block: &CommittedBlock) -> Result<(), HostError>;

    /// Every recorded block, oldest first.
    fn load(&self) -> Result<Vec<CommittedBlock>, HostError>;
}
