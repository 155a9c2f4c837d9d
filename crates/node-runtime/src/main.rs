//! # Civic-Chain Node
//!
//! ```bash
//! node-runtime --addr tcp://0.0.0.0:46658 --tmsp socket --http-addr 0.0.0.0:8888
//! RUST_LOG=debug node-runtime --config node.toml --log-json
//! ```

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use node_runtime::{Args, NodeConfig, NodeRuntime};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_json)?;

    let mut config = match &args.config {
        Some(path) => NodeConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => NodeConfig::default(),
    };
    config.apply_env().context("invalid environment")?;
    args.apply(&mut config);

    let mut runtime = NodeRuntime::new(config)?;
    runtime.start().await?;

    info!("Press Ctrl+C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    Ok(())
}

fn init_logging(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow!("failed to initialise logging: {e}"))
}
