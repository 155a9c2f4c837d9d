//! # Node Runtime Over Its Sockets
//!
//! Boots a full [`NodeRuntime`](node_runtime::NodeRuntime) on loopback ports
//! and drives it only through HTTP and the WebSocket feed, with the block
//! producer committing in the background.

#[cfg(test)]
mod tests {
    use crate::integration::CHAIN_ID;
    use cc_04_gateway::FeedEvent;
    use node_runtime::{NodeConfig, NodeRuntime};
    use serde_json::Value;
    use shared_types::FormId;
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::time::{sleep, timeout};

    // =========================================================================
    // FIXTURES
    // =========================================================================

    fn local_config() -> NodeConfig {
        let mut config = NodeConfig::default();
        config.set_chain_id(CHAIN_ID.to_string());
        config.transport.addr = "tcp://127.0.0.1:0".into();
        config.set_http_addr("127.0.0.1:0".parse().unwrap());
        config.host.block_interval = Duration::from_millis(20);
        config
    }

    /// One HTTP/1.1 request on a fresh connection.
    async fn http(addr: SocketAddr, method: &str, path: &str, body: &str) -> (u16, Value) {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
             Content-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut reply = String::new();
        stream.read_to_string(&mut reply).await.unwrap();

        let (head, body) = reply.split_once("\r\n\r\n").unwrap();
        let status = head.split(' ').nth(1).unwrap().parse().unwrap();
        (status, serde_json::from_str(body).unwrap_or(Value::Null))
    }

    /// Upgrade a connection to the live feed.
    async fn open_feed(addr: SocketAddr) -> TcpStream {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(
                b"GET /feed HTTP/1.1\r\nHost: localhost\r\nUpgrade: websocket\r\n\
                  Connection: Upgrade\r\nSec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
                  Sec-WebSocket-Version: 13\r\n\r\n",
            )
            .await
            .unwrap();

        let mut head = Vec::new();
        while !head.ends_with(b"\r\n\r\n") {
            head.push(stream.read_u8().await.unwrap());
        }
        let head = String::from_utf8(head).unwrap();
        assert!(head.starts_with("HTTP/1.1 101"), "{head}");
        stream
    }

    /// Next text frame from the server. Server frames are never masked.
    async fn read_text(stream: &mut TcpStream) -> Value {
        loop {
            let first = stream.read_u8().await.unwrap();
            let len = match stream.read_u8().await.unwrap() & 0x7f {
                126 => stream.read_u16().await.unwrap() as usize,
                127 => stream.read_u64().await.unwrap() as usize,
                n => n as usize,
            };
            let mut payload = vec![0u8; len];
            stream.read_exact(&mut payload).await.unwrap();
            if first & 0x0f == 0x1 {
                return serde_json::from_slice(&payload).unwrap();
            }
        }
    }

    // =========================================================================
    // TESTS
    // =========================================================================

    #[tokio::test]
    async fn test_node_serves_actions_and_feed() {
        let mut runtime = NodeRuntime::new(local_config()).unwrap();
        runtime.start().await.unwrap();
        let addr = runtime.http_addr().unwrap();

        let mut feed = open_feed(addr).await;

        let (status, citizen) = http(addr, "POST", "/create_account", "").await;
        assert_eq!(status, 200, "{citizen}");
        let secret = citizen["secret_key"].as_str().unwrap().to_string();

        // The account becomes usable once the producer commits it.
        let body = format!(
            "secret_key={secret}&issue=pothole&location=Main+St&pothole+location=crosswalk"
        );
        let submitted = timeout(Duration::from_secs(5), async {
            loop {
                let (status, reply) = http(addr, "POST", "/submit_form", &body).await;
                if status == 200 {
                    return reply;
                }
                assert_eq!(reply["name"], "UnknownAddress", "{reply}");
                sleep(Duration::from_millis(25)).await;
            }
        })
        .await
        .unwrap();
        let form_id = submitted["form_id"].as_str().unwrap().to_string();

        let event = timeout(Duration::from_secs(5), read_text(&mut feed))
            .await
            .unwrap();
        assert_eq!(event["type"], "submitted");
        assert_eq!(event["form_id"], form_id.as_str());

        let (status, found) = http(addr, "GET", &format!("/find_form?form_id={form_id}"), "").await;
        assert_eq!(status, 200);
        assert_eq!(found["description"], "pothole location {crosswalk}");
        assert_eq!(found["submitter"], citizen["public_key"]);

        let (status, info) = http(addr, "GET", "/info", "").await;
        assert_eq!(status, 200);
        assert_eq!(info["chain_id"], CHAIN_ID);
        assert_eq!(info["forms"], 1);

        drop(feed);
        timeout(Duration::from_secs(10), runtime.shutdown())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_feed_close_frame_ends_connection() {
        let mut runtime = NodeRuntime::new(local_config()).unwrap();
        runtime.start().await.unwrap();
        let publisher = runtime.gateway().publisher();
        let mut feed = open_feed(runtime.http_addr().unwrap()).await;

        // Masked close frame with an empty payload.
        feed.write_all(&[0x88, 0x80, 1, 2, 3, 4]).await.unwrap();
        let mut rest = Vec::new();
        timeout(Duration::from_secs(2), feed.read_to_end(&mut rest))
            .await
            .unwrap()
            .unwrap();

        publisher.publish(FeedEvent::submitted(&FormId([7; 16]), 1, String::new()));
        assert_eq!(publisher.subscriber_count(), 0);

        timeout(Duration::from_secs(10), runtime.shutdown())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_node_restart_replays_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = local_config();
        config.data_dir = Some(dir.path().to_path_buf());

        let mut runtime = NodeRuntime::new(config.clone()).unwrap();
        runtime.start().await.unwrap();
        let addr = runtime.http_addr().unwrap();
        let (status, _) = http(addr, "POST", "/create_admin", "").await;
        assert_eq!(status, 200);
        let host = runtime.host();
        timeout(Duration::from_secs(5), async {
            while host.height() == 0 {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
        let height = host.height();
        drop(host);
        timeout(Duration::from_secs(10), runtime.shutdown())
            .await
            .unwrap();

        let mut restarted = NodeRuntime::new(config).unwrap();
        restarted.start().await.unwrap();
        assert!(restarted.host().height() >= height);
        let (_, info) = http(restarted.http_addr().unwrap(), "GET", "/info", "").await;
        assert_eq!(info["accounts"], 1);
        timeout(Duration::from_secs(10), restarted.shutdown())
            .await
            .unwrap();
    }
}
