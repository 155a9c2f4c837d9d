//! WebSocket live feed.
//!
//! A connection receives the backlog and then every new event as a JSON
//! text frame. Client messages are ignored; a close frame, a read error or
//! a failed send ends the connection and drops the subscription.

use super::router::GatewayState;
use crate::feed::FeedPublisher;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, error, info};

pub async fn feed(State(state): State<GatewayState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| serve_feed(socket, state.publisher))
}

pub async fn serve_feed(socket: WebSocket, publisher: Arc<FeedPublisher>) {
    let subscription = publisher.subscribe();
    info!(subscriber = %subscription.id(), "Feed connection opened");
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            event = subscription.recv() => {
                let Some(event) = event else { break };
                let text = match serde_json::to_string(event.as_ref()) {
                    Ok(text) => text,
                    Err(e) => {
                        error!(error = %e, "Failed to encode feed event");
                        continue;
                    }
                };
                if let Err(e) = sender.send(Message::Text(text)).await {
                    debug!(error = %e, "Feed send failed");
                    break;
                }
            }
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!(error = %e, "Feed read failed");
                    break;
                }
                Some(Ok(_)) => {}
            }
        }
    }

    if let Err(e) = sender.close().await {
        debug!(error = %e, "Feed close failed");
    }
    info!(
        subscriber = %subscription.id(),
        dropped = subscription.dropped(),
        "Feed connection closed"
    );
}
