//! # Node Runtime
//!
//! Wires the civic-chain subsystems into one process.
//!
//! ```text
//! consensus engine ──tcp──→ SocketServer ──→ HostService ←── ActionDispatcher ←── HTTP
//!                                                 │ commit
//!                                                 ↓
//!                                        CommitWorker ──→ FeedPublisher ──→ WS /feed
//! ```
//!
//! ## Modules
//!
//! - `cli` - command-line flags
//! - `config` - TOML file, `CC_*` environment overrides
//! - `runtime` - subsystem construction, startup order, shutdown

pub mod cli;
pub mod config;
pub mod runtime;

pub use cli::Args;
pub use config::{NodeConfig, NodeConfigError, Tmsp, TransportConfig};
pub use runtime::NodeRuntime;
