//! Route table.
//!
//! | Route | Method | Action |
//! |-------|--------|--------|
//! | `/create_account` | POST | new citizen key pair + CreateAccount |
//! | `/create_admin` | POST | new admin key pair + CreateAccount |
//! | `/remove_account` | POST | RemoveAccount of the signer |
//! | `/remove_admin` | POST | RemoveAccount of `address`, admin-signed |
//! | `/submit_form` | POST | Submit |
//! | `/resolve_form` | POST | Resolve |
//! | `/find_form` | GET | stored form by `form_id` |
//! | `/search_forms` | GET | stored forms by `issue` and `status` |
//! | `/feed` | GET | WebSocket live feed |
//! | `/info` | GET | host height, app hash, counts |
//! | `/health` | GET | liveness |

use super::{handlers, ws};
use crate::dispatcher::ActionDispatcher;
use crate::domain::GatewayConfig;
use crate::feed::FeedPublisher;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct GatewayState {
    pub dispatcher: Arc<ActionDispatcher>,
    pub publisher: Arc<FeedPublisher>,
}

pub fn build_router(state: GatewayState, config: &GatewayConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.http.max_body_bytes));

    Router::new()
        .route("/create_account", post(handlers::create_account))
        .route("/create_admin", post(handlers::create_admin))
        .route("/remove_account", post(handlers::remove_account))
        .route("/remove_admin", post(handlers::remove_admin))
        .route("/submit_form", post(handlers::submit_form))
        .route("/resolve_form", post(handlers::resolve_form))
        .route("/find_form", get(handlers::find_form))
        .route("/search_forms", get(handlers::search_forms))
        .route("/feed", get(ws::feed))
        .route("/info", get(handlers::info))
        .route("/health", get(handlers::health_check))
        .layer(middleware)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use cc_01_forms::FixedClock;
    use cc_03_host::{HostConfig, HostService};
    use serde_json::Value;
    use tower::ServiceExt;

    fn setup(config: GatewayConfig) -> (Arc<HostService>, Router) {
        let host = Arc::new(HostService::open(HostConfig::default()).unwrap());
        let clock = Arc::new(FixedClock::parse("2024-01-01T12:00:30+00:00").unwrap());
        let state = GatewayState {
            dispatcher: Arc::new(ActionDispatcher::new(
                host.clone(),
                config.chain_id.clone(),
                clock,
                config.timeouts.submission,
            )),
            publisher: Arc::new(FeedPublisher::new(8, 8)),
        };
        (host, build_router(state, &config))
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn field<'a>(value: &'a Value, name: &str) -> &'a str {
        value[name].as_str().unwrap()
    }

    #[tokio::test]
    async fn test_form_lifecycle_over_http() {
        let (host, app) = setup(GatewayConfig::default());

        let (status, admin) = call(&app, post_form("/create_admin", "")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, citizen) = call(&app, post_form("/create_account", "")).await;
        assert_eq!(status, StatusCode::OK);
        host.produce_block().unwrap();

        let body = format!(
            "secret_key={}&issue=pothole&location=Main+St&pothole+location=curb+lane",
            field(&citizen, "secret_key")
        );
        let (status, submitted) = call(&app, post_form("/submit_form", &body)).await;
        assert_eq!(status, StatusCode::OK, "{submitted}");
        let form_id = field(&submitted, "form_id").to_string();
        host.produce_block().unwrap();

        let (status, found) = call(&app, get(&format!("/find_form?form_id={form_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(field(&found, "description"), "pothole location {curb lane}");
        assert_eq!(field(&found, "submitter"), field(&citizen, "public_key"));
        assert!(field(&found, "summary").contains("submitter"));

        let (_, listed) = call(&app, get("/search_forms?issue=pothole&status=unresolved")).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let body = format!("secret_key={}&form_id={form_id}", field(&citizen, "secret_key"));
        let (status, denied) = call(&app, post_form("/resolve_form", &body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(field(&denied, "name"), "Unauthorized");

        let body = format!("secret_key={}&form_id={form_id}", field(&admin, "secret_key"));
        let (status, _) = call(&app, post_form("/resolve_form", &body)).await;
        assert_eq!(status, StatusCode::OK);
        host.produce_block().unwrap();

        let (_, listed) = call(&app, get("/search_forms?status=resolved")).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, again) = call(&app, post_form("/resolve_form", &body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(again["code"], 102);
    }

    #[tokio::test]
    async fn test_parse_errors_are_bad_requests() {
        let (_host, app) = setup(GatewayConfig::default());

        let (status, body) = call(&app, post_form("/submit_form", "issue=pothole")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(field(&body, "error"), "missing field: secret_key");

        let (status, _) = call(&app, get("/find_form?form_id=nothex")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&app, get("/search_forms?status=pending")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing = "00".repeat(16);
        let (status, _) = call(&app, get(&format!("/find_form?form_id={missing}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_account_rejected_with_host_log() {
        let (_host, app) = setup(GatewayConfig::default());
        let secret = cc_02_transactions::KeyPair::from_seed([6; 32]).secret_hex();
        let body = format!("secret_key={secret}");
        let (status, body) = call(&app, post_form("/remove_account", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(field(&body, "name"), "UnknownAddress");
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let mut config = GatewayConfig::default();
        config.http.max_body_bytes = 16;
        let (_host, app) = setup(config);
        let body = format!("description={}", "x".repeat(64));
        let (status, _) = call(&app, post_form("/submit_form", &body)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_health_and_info() {
        let (_host, app) = setup(GatewayConfig::default());
        let (status, health) = call(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(field(&health, "status"), "healthy");
        assert_eq!(health["height"], 0);

        let (status, info) = call(&app, get("/info")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(field(&info, "chain_id"), "civic-chain");
    }
}
