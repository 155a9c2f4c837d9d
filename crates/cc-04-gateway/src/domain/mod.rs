//! Gateway domain: configuration, errors, action parsing, feed events and
//! the feed index.

pub mod actions;
pub mod config;
pub mod error;
pub mod events;
pub mod index;

pub use actions::{
    AccountCreated, Fields, FormView, RemoveRequest, ResolveRequest, SubmitRequest, TxAccepted,
};
pub use config::{ConfigError, FeedConfig, GatewayConfig, HttpConfig, TimeoutConfig};
pub use error::{ActionError, ErrorBody, GatewayError};
pub use events::FeedEvent;
pub use index::FeedIndex;
