//! HTTP and WebSocket surface.

pub mod handlers;
pub mod router;
pub mod ws;

pub use router::{build_router, GatewayState};
