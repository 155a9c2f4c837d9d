//! # Commit-to-Feed Flows
//!
//! ```text
//! ActionDispatcher ──broadcast_tx──→ HostService ──produce_block──→ commit
//!                                                                     │
//!                         FeedSubscription ←── FeedPublisher ←── CommitWorker
//! ```
//!
//! Covers the gateway actions through to live-feed delivery, history
//! replay rebuilding the feed, and commits driven over the socket transport.

#[cfg(test)]
mod tests {
    use crate::integration::{signed, CHAIN_ID, FIXED_NOW};
    use cc_01_forms::{FixedClock, Form};
    use cc_02_transactions::{AccountKind, FormRecord, KeyPair, TxType};
    use cc_03_host::{HostConfig, HostService, Request, Response, SocketClient, SocketServer};
    use cc_04_gateway::domain::{Fields, ResolveRequest, SubmitRequest};
    use cc_04_gateway::{FeedEvent, FeedSubscription, GatewayConfig, GatewayService};
    use shared_types::ResultCode;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::watch;
    use tokio::task::JoinHandle;
    use tokio::time::timeout;

    // =========================================================================
    // FIXTURES
    // =========================================================================

    struct Node {
        host: Arc<HostService>,
        gateway: GatewayService,
        stop: watch::Sender<bool>,
        worker: JoinHandle<()>,
    }

    impl Node {
        fn start(history: Option<&Path>) -> Self {
            let host = Arc::new(
                HostService::open(HostConfig {
                    chain_id: CHAIN_ID.into(),
                    history_path: history.map(Path::to_path_buf),
                    ..Default::default()
                })
                .unwrap(),
            );
            let config = GatewayConfig {
                chain_id: CHAIN_ID.into(),
                ..Default::default()
            };
            let clock = Arc::new(FixedClock::parse(FIXED_NOW).unwrap());
            let gateway = GatewayService::new(config, host.clone(), clock).unwrap();
            host.add_listener(gateway.commit_listener());

            let (stop, shutdown) = watch::channel(false);
            let worker = gateway.spawn_commit_worker(shutdown).unwrap();
            Self {
                host,
                gateway,
                stop,
                worker,
            }
        }

        async fn stop(self) {
            self.stop.send(true).unwrap();
            timeout(Duration::from_secs(2), self.worker)
                .await
                .unwrap()
                .unwrap();
        }
    }

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    async fn next(subscription: &FeedSubscription) -> Arc<FeedEvent> {
        timeout(Duration::from_secs(2), subscription.recv())
            .await
            .expect("feed event")
            .expect("open subscription")
    }

    /// Poll until the feed backlog holds `len` events.
    async fn wait_for_backlog(gateway: &GatewayService, len: usize) -> Vec<Arc<FeedEvent>> {
        let publisher = gateway.publisher();
        timeout(Duration::from_secs(2), async {
            loop {
                let backlog = publisher.backlog();
                if backlog.len() >= len {
                    return backlog;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("backlog filled")
    }

    /// Create an admin and a citizen, submit a pothole form and resolve it.
    /// Returns the form id.
    async fn submit_and_resolve(node: &Node) -> String {
        let dispatcher = node.gateway.dispatcher();
        let admin = dispatcher.create_account(AccountKind::Admin).await.unwrap();
        let citizen = dispatcher.create_account(AccountKind::Citizen).await.unwrap();
        node.host.produce_block().unwrap();

        let request = SubmitRequest::parse(&fields(&[
            ("secret_key", citizen.secret_key.as_str()),
            ("issue", "pothole"),
            ("location", "Main St"),
            ("pothole location", "intersection"),
        ]))
        .unwrap();
        let form_id = dispatcher.submit_form(request).await.unwrap().form_id.unwrap();
        node.host.produce_block().unwrap();

        let request = ResolveRequest::parse(&fields(&[
            ("secret_key", admin.secret_key.as_str()),
            ("form_id", form_id.as_str()),
        ]))
        .unwrap();
        dispatcher.resolve_form(request).await.unwrap();
        node.host.produce_block().unwrap();
        form_id
    }

    // =========================================================================
    // GATEWAY -> HOST -> FEED
    // =========================================================================

    #[tokio::test]
    async fn test_submit_and_resolve_reach_subscriber() {
        let node = Node::start(None);
        let subscription = node.gateway.publisher().subscribe();

        let form_id = submit_and_resolve(&node).await;

        let submitted = next(&subscription).await;
        assert!(matches!(*submitted, FeedEvent::Submitted { .. }));
        assert_eq!(submitted.form_id(), form_id);
        assert_eq!(submitted.height(), 2);

        let resolved = next(&subscription).await;
        let FeedEvent::Resolved { summary, .. } = &*resolved else {
            panic!("expected resolved event, got {resolved:?}");
        };
        assert_eq!(resolved.form_id(), form_id);
        assert!(resolved.height() > submitted.height());
        assert!(summary.contains("resolved at"));
        assert_eq!(subscription.dropped(), 0);

        node.stop().await;
    }

    #[tokio::test]
    async fn test_subscribers_see_commit_order() {
        let node = Node::start(None);
        let early = node.gateway.publisher().subscribe();
        let dispatcher = node.gateway.dispatcher();
        let citizen = dispatcher.create_account(AccountKind::Citizen).await.unwrap();
        node.host.produce_block().unwrap();

        let mut expected = Vec::new();
        for (issue, location) in [
            ("street light out", "Elm St"),
            ("graffiti removal", "Oak Ave"),
            ("abandoned vehicle", "Pine Rd"),
        ] {
            let request = SubmitRequest::parse(&fields(&[
                ("secret_key", citizen.secret_key.as_str()),
                ("issue", issue),
                ("location", location),
                ("anonymous", "on"),
            ]))
            .unwrap();
            expected.push(dispatcher.submit_form(request).await.unwrap().form_id.unwrap());
            node.host.produce_block().unwrap();
        }

        let mut seen = Vec::new();
        for _ in 0..expected.len() {
            seen.push(next(&early).await.form_id().to_string());
        }
        assert_eq!(seen, expected);

        let backlog = wait_for_backlog(&node.gateway, expected.len()).await;
        let late = node.gateway.publisher().subscribe();
        for event in &backlog {
            assert_eq!(next(&late).await.form_id(), event.form_id());
        }

        node.stop().await;
    }

    #[tokio::test]
    async fn test_rejected_submission_publishes_nothing() {
        let node = Node::start(None);
        let subscription = node.gateway.publisher().subscribe();
        let stranger = KeyPair::from_seed([42; 32]).secret_hex();
        let request = SubmitRequest::parse(&fields(&[
            ("secret_key", stranger.as_str()),
            ("issue", "rodent baiting"),
            ("location", "Alley 9"),
        ]))
        .unwrap();
        let err = node.gateway.dispatcher().submit_form(request).await.unwrap_err();
        assert_eq!(err.code(), Some(ResultCode::UnknownAddress));
        assert!(node.host.produce_block().unwrap().is_none());

        assert!(timeout(Duration::from_millis(100), subscription.recv()).await.is_err());
        node.stop().await;
    }

    // =========================================================================
    // REPLAY
    // =========================================================================

    #[tokio::test]
    async fn test_replay_rebuilds_feed() {
        let dir = tempfile::tempdir().unwrap();
        let history = dir.path().join("history.log");

        let first = Node::start(Some(history.as_path()));
        let form_id = submit_and_resolve(&first).await;
        let height = first.host.height();
        wait_for_backlog(&first.gateway, 2).await;
        first.stop().await;

        let second = Node::start(Some(history.as_path()));
        assert_eq!(second.host.height(), 0);
        assert_eq!(second.host.replay().unwrap(), height);
        assert_eq!(second.host.height(), height);

        let backlog = wait_for_backlog(&second.gateway, 2).await;
        assert!(matches!(*backlog[0], FeedEvent::Submitted { .. }));
        assert!(matches!(*backlog[1], FeedEvent::Resolved { .. }));
        assert!(backlog.iter().all(|event| event.form_id() == form_id));

        let view = second
            .gateway
            .dispatcher()
            .find_form(&form_id.parse().unwrap())
            .await
            .unwrap();
        assert_eq!(view.status, "resolved");

        second.stop().await;
    }

    // =========================================================================
    // SOCKET TRANSPORT
    // =========================================================================

    #[tokio::test]
    async fn test_socket_commits_reach_feed() {
        let node = Node::start(None);
        let subscription = node.gateway.publisher().subscribe();
        let server = SocketServer::bind("tcp://127.0.0.1:0", node.host.clone())
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        let (stop, shutdown) = watch::channel(false);
        let transport = tokio::spawn(server.run(shutdown));
        let mut client = SocketClient::connect(addr).await.unwrap();

        let citizen = KeyPair::from_seed([11; 32]);
        let clock = FixedClock::parse(FIXED_NOW).unwrap();
        let form = Form::make_anonymous("pothole", "Bridge St", "", &clock).unwrap();
        let txs = [
            signed(TxType::CreateAccount, 1, AccountKind::Citizen.encode(), &citizen),
            signed(TxType::Submit, 2, FormRecord::from_form(&form).encode(), &citizen),
        ];

        for tx in &txs {
            let checked = client.request(&Request::CheckTx(tx.encode())).await.unwrap();
            let delivered = client.request(&Request::DeliverTx(tx.encode())).await.unwrap();
            let Response::DeliverTx(frame) = delivered else {
                panic!("unexpected response {delivered:?}");
            };
            assert_eq!(frame.code, 0, "{}", frame.log);
            let Response::Commit(frame) = client.request(&Request::Commit).await.unwrap() else {
                panic!("unexpected commit response");
            };
            assert_eq!(frame.data.len(), 32);
            assert!(matches!(checked, Response::CheckTx(ref f) if f.code == 0));
        }

        let event = next(&subscription).await;
        assert_eq!(event.form_id(), form.id().to_hex());
        assert_eq!(event.height(), 2);

        let Response::Info(info) = client.request(&Request::Info).await.unwrap() else {
            panic!("unexpected info response");
        };
        assert_eq!(info.height, 2);
        assert_eq!(info.forms, 1);

        stop.send(true).unwrap();
        timeout(Duration::from_secs(2), transport).await.unwrap().unwrap();
        node.stop().await;
    }
}
