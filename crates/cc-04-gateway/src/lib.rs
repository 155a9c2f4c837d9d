//! # Gateway Subsystem
//!
//! **Subsystem ID:** 4
//!
//! ## Purpose
//!
//! Accepts user actions over HTTP, turns them into signed transactions for
//! the host, and pushes committed activity to live-feed subscribers over
//! WebSocket.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Parse errors never reach the host | `domain/actions.rs` - request parsing |
//! | Host codes map to one HTTP status each | `domain/error.rs` - `ActionError::status()` |
//! | Feed index has a single writer | `feed/worker.rs` - `CommitWorker` |
//! | Per-subscriber events in commit order | `feed/publisher.rs` - FIFO queues |
//! | Publishing never blocks | `feed/publisher.rs` - drop-oldest on overflow |
//!
//! ## Data Flow
//!
//! ```text
//! POST /submit_form ──→ SubmitRequest ──→ ActionDispatcher ──broadcast_tx──→ Host
//!                                                                             │ commit
//!                                                                             ↓
//!   WS /feed ←── FeedSubscription ←── FeedPublisher ←── CommitWorker ←── ChannelCommitListener
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! domain/      - config, errors, action parsing, feed events, feed index
//! dispatcher.rs - builds, signs and submits transactions
//! feed/        - commit worker and subscriber fan-out
//! http/        - axum routes, handlers, WebSocket feed
//! service.rs   - GatewayService (wiring and server lifecycle)
//! ```

pub mod dispatcher;
pub mod domain;
pub mod feed;
pub mod http;
pub mod service;

pub use dispatcher::ActionDispatcher;
pub use domain::{
    AccountCreated, ActionError, ConfigError, FeedEvent, FeedIndex, FormView, GatewayConfig,
    GatewayError, TxAccepted,
};
pub use feed::{FeedPublisher, FeedSubscription};
pub use http::{build_router, GatewayState};
pub use service::GatewayService;
