//! # Ports Layer - Host
//!
//! - `inbound.rs`: `HostApi`, the driving port used by the gateway
//! - `outbound.rs`: `CommitListener` and `HistoryStore`, the driven ports

pub mod inbound;
pub mod outbound;

pub use inbound::HostApi;
pub use outbound::{CommitListener, HistoryStore};
