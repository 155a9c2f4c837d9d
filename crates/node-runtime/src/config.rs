//! # Node Configuration
//!
//! Unified configuration for the host, the transport and the gateway.
//!
//! ## Precedence
//!
//! ```text
//! defaults  <  TOML file (--config)  <  CC_* environment  <  CLI flags
//! ```
//!
//! ```toml
//! data_dir = "./data"
//!
//! [transport]
//! addr = "tcp://0.0.0.0:46658"
//! tmsp = "socket"
//!
//! [host]
//! chain_id = "civic-chain"
//! block_interval = "1s"
//!
//! [gateway.http]
//! port = 8888
//! ```

use cc_03_host::HostConfig;
use cc_04_gateway::GatewayConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// File name of the history log inside `data_dir`.
pub const HISTORY_FILE: &str = "history.log";

/// Consensus-engine transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tmsp {
    #[default]
    Socket,
    Grpc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Listen address for the consensus engine.
    pub addr: String,
    pub tmsp: Tmsp,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            addr: "tcp://0.0.0.0:46658".to_string(),
            tmsp: Tmsp::Socket,
        }
    }
}

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub transport: TransportConfig,
    pub host: HostConfig,
    pub gateway: GatewayConfig,
    /// Directory for durable state; the history log lives here unless
    /// `host.history_path` names another file.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum NodeConfigError {
    #[error("failed to read {path}: {error}")]
    Io { path: String, error: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid environment variable {name}: {value}")]
    Env { name: &'static str, value: String },

    #[error(transparent)]
    Host(#[from] cc_03_host::HostConfigError),

    #[error(transparent)]
    Gateway(#[from] cc_04_gateway::ConfigError),

    #[error("host chain id {host} does not match gateway chain id {gateway}")]
    ChainIdMismatch { host: String, gateway: String },
}

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, NodeConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| NodeConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, NodeConfigError> {
        toml::from_str(content).map_err(|e| NodeConfigError::Parse(e.to_string()))
    }

    /// Apply `CC_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), NodeConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Apply `CC_*` overrides from `lookup`.
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), NodeConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(chain_id) = lookup("CC_CHAIN_ID") {
            self.set_chain_id(chain_id);
        }
        if let Some(addr) = lookup("CC_ADDR") {
            self.transport.addr = addr;
        }
        if let Some(addr) = lookup("CC_HTTP_ADDR") {
            self.set_http_addr(parsed("CC_HTTP_ADDR", addr)?);
        }
        if let Some(dir) = lookup("CC_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(ms) = lookup("CC_BLOCK_INTERVAL_MS") {
            self.host.block_interval = Duration::from_millis(parsed("CC_BLOCK_INTERVAL_MS", ms)?);
        }
        if let Some(capacity) = lookup("CC_MEMPOOL_CAPACITY") {
            self.host.mempool_capacity = parsed("CC_MEMPOOL_CAPACITY", capacity)?;
        }
        if let Some(produce) = lookup("CC_PRODUCE_BLOCKS") {
            self.host.produce_blocks = parsed("CC_PRODUCE_BLOCKS", produce)?;
        }
        Ok(())
    }

    /// Set the chain id both the host and the gateway sign against.
    pub fn set_chain_id(&mut self, chain_id: String) {
        self.gateway.chain_id = chain_id.clone();
        self.host.chain_id = chain_id;
    }

    pub fn set_http_addr(&mut self, addr: SocketAddr) {
        self.gateway.http.host = addr.ip();
        self.gateway.http.port = addr.port();
    }

    /// Derive the history log path from `data_dir` when none is set.
    pub fn resolve_paths(&mut self) {
        if self.host.history_path.is_none() {
            if let Some(dir) = &self.data_dir {
                self.host.history_path = Some(dir.join(HISTORY_FILE));
            }
        }
    }

    pub fn validate(&self) -> Result<(), NodeConfigError> {
        self.host.validate()?;
        self.gateway.validate()?;
        if self.host.chain_id != self.gateway.chain_id {
            return Err(NodeConfigError::ChainIdMismatch {
                host: self.host.chain_id.clone(),
                gateway: self.gateway.chain_id.clone(),
            });
        }
        Ok(())
    }
}

fn parsed<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, NodeConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| NodeConfigError::Env { name, value })
}
