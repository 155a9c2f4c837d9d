//! # Domain Layer - Host
//!
//! Pure state machine logic; no I/O and no locking.

pub mod accounts;
pub mod app;
pub mod errors;
pub mod history;
pub mod mempool;
pub mod state;

pub use accounts::Account;
pub use app::{CivicApp, HostInfo};
pub use errors::HostError;
pub use history::{CommittedBlock, CommittedTx};
pub use mempool::{Mempool, PooledTx};
pub use state::{AppState, Effect, FormQuery, Rules, StatusFilter};
