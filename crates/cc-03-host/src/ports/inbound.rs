//! # Inbound Port - HostApi
//!
//! What the action dispatcher needs from the replicated state machine.
//! Replies carry the TMSP-style `{ code, data, log }` shape.

use crate::domain::{Account, FormQuery, HostInfo};
use async_trait::async_trait;
use cc_01_forms::Form;
use shared_types::{Address, FormId, HostResult};

#[async_trait]
pub trait HostApi: Send + Sync {
    /// `check_tx` plus enqueue in the mempool. On success `data` holds the
    /// 20-byte tx id.
    async fn broadcast_tx(&self, tx: Vec<u8>) -> HostResult;

    /// Committed account.
    async fn account(&self, address: &Address) -> Option<Account>;

    /// Sequence the account's next transaction must carry, counting
    /// transactions already admitted to the mempool. `None` for an unknown
    /// account.
    async fn next_sequence(&self, address: &Address) -> Option<u64>;

    async fn find_form(&self, id: &FormId) -> Option<Form>;

    async fn search_forms(&self, query: &FormQuery) -> Vec<(FormId, Form)>;

    async fn info(&self) -> HostInfo;
}
