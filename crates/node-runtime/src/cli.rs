//! Command-line flags.

use crate::config::{NodeConfig, Tmsp};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "node-runtime")]
#[command(about = "Civic-chain node: forms host, consensus transport and HTTP gateway")]
#[command(version)]
pub struct Args {
    /// Listen address for the consensus engine
    #[arg(long)]
    pub addr: Option<String>,

    /// Transport spoken with the consensus engine
    #[arg(long, value_enum)]
    pub tmsp: Option<Tmsp>,

    /// HTTP gateway listen address
    #[arg(long)]
    pub http_addr: Option<SocketAddr>,

    /// Chain id the host and the gateway sign against
    #[arg(long)]
    pub chain_id: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for the history log
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    /// Flags win over file and environment settings.
    pub fn apply(&self, config: &mut NodeConfig) {
        if let Some(addr) = &self.addr {
            config.transport.addr = addr.clone();
        }
        if let Some(tmsp) = self.tmsp {
            config.transport.tmsp = tmsp;
        }
        if let Some(addr) = self.http_addr {
            config.set_http_addr(addr);
        }
        if let Some(chain_id) = &self.chain_id {
            config.set_chain_id(chain_id.clone());
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
    }
}
