//! # Host Subsystem
//!
//! **Subsystem ID:** 3
//!
//! ## Purpose
//!
//! The replicated state machine the gateway submits transactions to. Holds
//! account and form state, admits transactions to a bounded mempool, produces
//! blocks, notifies commit listeners and records committed history for
//! replay.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Rejected txs never change state | `domain/state.rs` - `check()` before `apply()` |
//! | Sequence = account sequence + 1 | `domain/state.rs` - `signer()` |
//! | Only admins resolve forms | `domain/state.rs` - `check_resolve()` |
//! | Listeners fire in commit order | `service.rs` - `commit_guard` |
//! | Replay reproduces the recorded app hash | `domain/app.rs` - `replay_block()` |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/history_log.rs - In-memory and file history stores    │
//! │  adapters/socket.rs      - TCP transport for external engines   │
//! │  service.rs              - HostService (locks, producer loop)   │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - HostApi trait                              │
//! │  ports/outbound.rs - CommitListener, HistoryStore traits        │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/state.rs   - AppState: check / apply / app hash         │
//! │  domain/app.rs     - CivicApp: check, deliver, commit, replay   │
//! │  domain/mempool.rs - Bounded FIFO keyed by tx id                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{FileHistoryLog, InMemoryHistory, Request, Response, SocketClient, SocketServer};
pub use config::{HostConfig, HostConfigError, DEFAULT_CHAIN_ID};
pub use domain::{
    Account, AppState, CivicApp, CommittedBlock, CommittedTx, Effect, FormQuery, HostError,
    HostInfo, Rules, StatusFilter,
};
pub use ports::{CommitListener, HistoryStore, HostApi};
pub use service::HostService;
