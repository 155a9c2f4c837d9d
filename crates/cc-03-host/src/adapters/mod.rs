//! # Adapters Layer - Host
//!
//! - `history_log.rs`: in-memory and bincode file implementations of `HistoryStore`
//! - `socket.rs`: length-prefixed TCP transport for an external consensus engine

pub mod history_log;
pub mod socket;

pub use history_log::{FileHistoryLog, InMemoryHistory};
pub use socket::{parse_listen_addr, Request, Response, ResultFrame, SocketClient, SocketServer};
