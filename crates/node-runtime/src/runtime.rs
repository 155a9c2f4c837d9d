//! Node runtime: owns the subsystems and their task lifecycle.
//!
//! ## Startup Order
//!
//! ```text
//! 1. validate config (reject grpc transport)
//! 2. open host, create gateway, register the gateway's commit listener
//! 3. spawn commit worker          (must drain before replay pushes commits)
//! 4. replay history               (rebuilds host state and the feed index)
//! 5. spawn block producer
//! 6. bind socket transport, bind HTTP gateway
//! ```

use crate::config::{NodeConfig, Tmsp};
use anyhow::{bail, Context, Result};
use cc_01_forms::SystemClock;
use cc_03_host::{HostService, SocketServer};
use cc_04_gateway::GatewayService;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How long shutdown waits for each task.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub struct NodeRuntime {
    config: NodeConfig,
    host: Arc<HostService>,
    gateway: Arc<GatewayService>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
    socket_addr: Option<SocketAddr>,
    http_addr: Option<SocketAddr>,
}

impl NodeRuntime {
    pub fn new(mut config: NodeConfig) -> Result<Self> {
        config.resolve_paths();
        config.validate().context("invalid node configuration")?;
        if config.transport.tmsp == Tmsp::Grpc {
            bail!("grpc transport is not supported; use --tmsp socket");
        }

        let host = Arc::new(HostService::open(config.host.clone()).context("failed to open host")?);
        let gateway = Arc::new(
            GatewayService::new(config.gateway.clone(), host.clone(), Arc::new(SystemClock))
                .context("failed to create gateway")?,
        );
        host.add_listener(gateway.commit_listener());

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            config,
            host,
            gateway,
            shutdown_tx,
            shutdown_rx,
            tasks: Vec::new(),
            socket_addr: None,
            http_addr: None,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn host(&self) -> Arc<HostService> {
        Arc::clone(&self.host)
    }

    pub fn gateway(&self) -> Arc<GatewayService> {
        Arc::clone(&self.gateway)
    }

    /// Bound consensus transport address, once started.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.socket_addr
    }

    /// Bound HTTP address, once started.
    pub fn http_addr(&self) -> Option<SocketAddr> {
        self.http_addr
    }

    pub async fn start(&mut self) -> Result<()> {
        info!("===========================================");
        info!("  Civic-Chain Node Starting");
        info!("===========================================");
        info!(chain_id = %self.config.host.chain_id, "Chain");

        if let Some(worker) = self.gateway.spawn_commit_worker(self.shutdown_rx.clone()) {
            self.tasks.push(("commit-worker", worker));
        }

        let replayed = self.host.replay().context("failed to replay history")?;
        info!(txs = replayed, height = self.host.height(), "History replayed");

        if self.config.host.produce_blocks {
            let producer = Arc::clone(&self.host).run_block_producer(self.shutdown_rx.clone());
            self.tasks.push(("block-producer", tokio::spawn(producer)));
        } else {
            info!("Block production disabled; waiting for an external consensus engine");
        }

        let socket = SocketServer::bind(&self.config.transport.addr, Arc::clone(&self.host))
            .await
            .context("failed to bind consensus transport")?;
        self.socket_addr = Some(socket.local_addr().context("socket transport address")?);
        self.tasks
            .push(("socket-transport", tokio::spawn(socket.run(self.shutdown_rx.clone()))));

        let listener = self.gateway.bind().await.context("failed to bind gateway")?;
        self.http_addr = Some(listener.local_addr().context("gateway address")?);
        let gateway = Arc::clone(&self.gateway);
        let shutdown = self.shutdown_rx.clone();
        self.tasks.push((
            "gateway",
            tokio::spawn(async move {
                if let Err(e) = gateway.serve(listener, shutdown).await {
                    error!(error = %e, "Gateway failed");
                }
            }),
        ));

        info!(
            transport = ?self.socket_addr,
            http = ?self.http_addr,
            "Node running"
        );
        Ok(())
    }

    /// Signal every task and wait for them to finish.
    pub async fn shutdown(self) {
        info!("Shutting down node...");
        let _ = self.shutdown_tx.send(true);
        for (name, task) in self.tasks {
            match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(task = name, error = %e, "Task panicked"),
                Err(_) => warn!(task = name, "Task did not stop in time"),
            }
        }
        info!("Node stopped");
    }
}
