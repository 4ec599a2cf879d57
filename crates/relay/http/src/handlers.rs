//! Relay endpoint handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use relay_auth::TokenProvider;
use relay_core::MulticastSummary;
use relay_push::{PushService, Pusher};
use relay_storage::TokenStore;
use serde::Serialize;
use serde_json::Value;

use crate::ApiError;
use crate::request::{MulticastRequest, RegisterRequest, SendRequest};

/// Shared handler state.
pub struct AppState<A, P, S> {
    pub push: Arc<PushService<A, P>>,
    pub store: S,
}

impl<A, P, S> AppState<A, P, S> {
    pub fn new(push: PushService<A, P>, store: S) -> Self {
        Self {
            push: Arc::new(push),
            store,
        }
    }
}

impl<A, P, S: Clone> Clone for AppState<A, P, S> {
    fn clone(&self) -> Self {
        Self {
            push: Arc::clone(&self.push),
            store: self.store.clone(),
        }
    }
}

/// Register response.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
}

/// Single-send response.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub response: Value,
}

/// Multicast response. Returned with 200 even when every target failed.
#[derive(Debug, Serialize)]
pub struct MulticastResponse {
    pub success: bool,
    #[serde(flatten)]
    pub summary: MulticastSummary,
}

/// Record a device token.
pub async fn register<A, P, S>(
    State(state): State<AppState<A, P, S>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError>
where
    S: TokenStore,
{
    let Json(request) = payload?;
    let token = request.validate()?;

    state.store.register(&token).map_err(ApiError::Store)?;
    tracing::info!(token = %token, "registered token");

    Ok(Json(RegisterResponse {
        message: "Token registered successfully",
    }))
}

/// Send a notification to one device.
pub async fn send_notification<A, P, S>(
    State(state): State<AppState<A, P, S>>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> Result<Json<SendResponse>, ApiError>
where
    A: TokenProvider,
    P: Pusher,
{
    let Json(request) = payload?;
    let (token, notification) = request.validate()?;

    let response = state
        .push
        .send(&token, &notification)
        .await
        .map_err(ApiError::Send)?;

    Ok(Json(SendResponse {
        success: true,
        response,
    }))
}

/// Send a notification to many devices, one upstream call per device.
pub async fn send_multicast<A, P, S>(
    State(state): State<AppState<A, P, S>>,
    payload: Result<Json<MulticastRequest>, JsonRejection>,
) -> Result<Json<MulticastResponse>, ApiError>
where
    A: TokenProvider,
    P: Pusher,
{
    let Json(request) = payload?;
    let (tokens, notification) = request.validate()?;

    let summary = state
        .push
        .send_multicast(&tokens, &notification)
        .await
        .map_err(ApiError::Multicast)?;

    Ok(Json(MulticastResponse {
        success: true,
        summary,
    }))
}
