//! Request handlers. Each one parses its fields, hands the action to the
//! dispatcher and maps the outcome to a JSON reply.

use super::router::GatewayState;
use crate::domain::actions::{parse_find, parse_search};
use crate::domain::{
    AccountCreated, ActionError, Fields, FormView, RemoveRequest, ResolveRequest, SubmitRequest,
    TxAccepted,
};
use axum::extract::{Form, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use cc_02_transactions::AccountKind;
use cc_03_host::HostInfo;
use serde_json::json;
use tracing::warn;

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "Action failed");
        }
        (status, Json(self.body())).into_response()
    }
}

pub async fn create_account(
    State(state): State<GatewayState>,
) -> Result<Json<AccountCreated>, ActionError> {
    state
        .dispatcher
        .create_account(AccountKind::Citizen)
        .await
        .map(Json)
}

pub async fn create_admin(
    State(state): State<GatewayState>,
) -> Result<Json<AccountCreated>, ActionError> {
    state
        .dispatcher
        .create_account(AccountKind::Admin)
        .await
        .map(Json)
}

pub async fn remove_account(
    State(state): State<GatewayState>,
    Form(fields): Form<Fields>,
) -> Result<Json<TxAccepted>, ActionError> {
    let request = RemoveRequest::own(&fields)?;
    state.dispatcher.remove_account(request).await.map(Json)
}

pub async fn remove_admin(
    State(state): State<GatewayState>,
    Form(fields): Form<Fields>,
) -> Result<Json<TxAccepted>, ActionError> {
    let request = RemoveRequest::other(&fields)?;
    state.dispatcher.remove_account(request).await.map(Json)
}

pub async fn submit_form(
    State(state): State<GatewayState>,
    Form(fields): Form<Fields>,
) -> Result<Json<TxAccepted>, ActionError> {
    let request = SubmitRequest::parse(&fields)?;
    state.dispatcher.submit_form(request).await.map(Json)
}

pub async fn resolve_form(
    State(state): State<GatewayState>,
    Form(fields): Form<Fields>,
) -> Result<Json<TxAccepted>, ActionError> {
    let request = ResolveRequest::parse(&fields)?;
    state.dispatcher.resolve_form(request).await.map(Json)
}

pub async fn find_form(
    State(state): State<GatewayState>,
    Query(fields): Query<Fields>,
) -> Result<Json<FormView>, ActionError> {
    let id = parse_find(&fields)?;
    state.dispatcher.find_form(&id).await.map(Json)
}

pub async fn search_forms(
    State(state): State<GatewayState>,
    Query(fields): Query<Fields>,
) -> Result<Json<Vec<FormView>>, ActionError> {
    let query = parse_search(&fields)?;
    Ok(Json(state.dispatcher.search_forms(&query).await))
}

pub async fn info(State(state): State<GatewayState>) -> Json<HostInfo> {
    Json(state.dispatcher.info().await)
}

/// Health check endpoint
pub async fn health_check(State(state): State<GatewayState>) -> impl IntoResponse {
    let info = state.dispatcher.info().await;
    Json(json!({
        "status": "healthy",
        "service": "cc-04-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "chain_id": info.chain_id,
        "height": info.height,
        "subscribers": state.publisher.subscriber_count(),
    }))
}
