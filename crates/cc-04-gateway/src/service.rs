//! Gateway service - main entry point.
//!
//! Owns the dispatcher, the feed publisher and the commit worker, and runs
//! the HTTP server until shutdown.

use crate::dispatcher::ActionDispatcher;
use crate::domain::{GatewayConfig, GatewayError};
use crate::feed::{commit_channel, ChannelCommitListener, CommitWorker, FeedPublisher};
use crate::http::{build_router, GatewayState};
use axum::Router;
use cc_01_forms::Clock;
use cc_03_host::{CommitListener, HostApi};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

pub struct GatewayService {
    config: GatewayConfig,
    state: GatewayState,
    listener: Arc<ChannelCommitListener>,
    worker: Mutex<Option<CommitWorker>>,
}

impl GatewayService {
    pub fn new(
        config: GatewayConfig,
        host: Arc<dyn HostApi>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        let publisher = Arc::new(FeedPublisher::new(
            config.feed.queue_capacity,
            config.feed.backlog,
        ));
        let (listener, worker) = commit_channel(Arc::clone(&publisher));
        let dispatcher = Arc::new(ActionDispatcher::new(
            host,
            config.chain_id.clone(),
            clock,
            config.timeouts.submission,
        ));

        Ok(Self {
            state: GatewayState {
                dispatcher,
                publisher,
            },
            listener: Arc::new(listener),
            worker: Mutex::new(Some(worker)),
            config,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Listener to register with the host before it replays history.
    pub fn commit_listener(&self) -> Arc<dyn CommitListener> {
        self.listener.clone()
    }

    pub fn publisher(&self) -> Arc<FeedPublisher> {
        Arc::clone(&self.state.publisher)
    }

    pub fn dispatcher(&self) -> Arc<ActionDispatcher> {
        Arc::clone(&self.state.dispatcher)
    }

    /// Start the commit worker. Only the first call spawns it.
    pub fn spawn_commit_worker(&self, shutdown: watch::Receiver<bool>) -> Option<JoinHandle<()>> {
        let worker = self.worker.lock().take()?;
        Some(tokio::spawn(worker.run(shutdown)))
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config)
    }

    pub async fn bind(&self) -> Result<TcpListener, GatewayError> {
        let addr = self.config.http_addr();
        TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{addr}: {e}")))
    }

    /// Serve HTTP on `listener` until `shutdown` flips.
    pub async fn serve(
        &self,
        listener: TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), GatewayError> {
        let addr: Option<SocketAddr> = listener.local_addr().ok();
        info!(addr = ?addr, "Starting HTTP server");
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                while !*shutdown.borrow() {
                    if shutdown.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await
            .map_err(|e| GatewayError::Server(e.to_string()))?;
        info!("Gateway stopped");
        Ok(())
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn start(&self, shutdown: watch::Receiver<bool>) -> Result<(), GatewayError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }
}
