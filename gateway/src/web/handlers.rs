//! Webhook endpoint handlers.
//!
//! The Chatwoot handler runs a linear pipeline where every stage
//! short-circuits into a terminal response:
//!
//! 1. Verify the HMAC signature over the raw body
//! 2. Parse the body as JSON
//! 3. Keep only incoming customer messages
//! 4. Derive a stable event identity and claim it in the dedupe store
//!
//! Expected rejections (bad signature, bad JSON, filtered or duplicate
//! events) are acknowledged with HTTP 200 and an explanatory body so
//! the sender never retries them.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::event::{is_incoming, resolve_identity};
use crate::store::DedupeStore;
use crate::web::signature::verify_webhook_signature;
use crate::Config;

/// Header carrying the Chatwoot HMAC signature.
const SIGNATURE_HEADER: &str = "x-chatwoot-signature";

/// Prefix for dedupe keys in the shared store.
const DEDUPE_KEY_PREFIX: &str = "cw:";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dedupe: Arc<dyn DedupeStore>,
}

impl AppState {
    pub fn new(config: Config, dedupe: Arc<dyn DedupeStore>) -> Self {
        Self {
            config: Arc::new(config),
            dedupe,
        }
    }
}

/// Build the gateway router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/webhooks/chatwoot", post(chatwoot_webhook))
        .with_state(state)
}

// =============================================================================
// Health Check
// =============================================================================

/// Service status response.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse { status: "ok" })
}

/// Service identity endpoint.
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "chatwoot-gateway running",
    })
}

// =============================================================================
// Chatwoot Webhook
// =============================================================================

/// Webhook acknowledgement body.
///
/// Exactly one of the terminal pipeline outcomes, with absent fields
/// omitted from the serialized JSON.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl WebhookResponse {
    fn rejected(error: &'static str) -> Self {
        Self {
            ok: false,
            error: Some(error),
            skipped: None,
            processed: None,
            event_id: None,
        }
    }

    fn skipped(reason: &'static str, event_id: Option<String>) -> Self {
        Self {
            ok: true,
            error: None,
            skipped: Some(reason),
            processed: None,
            event_id,
        }
    }

    fn processed(event_id: String) -> Self {
        Self {
            ok: true,
            error: None,
            skipped: None,
            processed: Some(true),
            event_id: Some(event_id),
        }
    }
}

/// Chatwoot webhook endpoint.
///
/// Expected outcomes are always answered with HTTP 200; only dedupe
/// store unavailability surfaces as a server error.
pub async fn chatwoot_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    info!(
        body_length = body.len(),
        has_signature = signature.is_some(),
        "chatwoot_webhook_received"
    );

    if !verify_webhook_signature(state.config.webhook_secret.as_deref(), &body, signature) {
        warn!("chatwoot_signature_rejected");
        return (
            StatusCode::OK,
            Json(WebhookResponse::rejected("invalid_signature")),
        );
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "chatwoot_payload_not_json");
            return (
                StatusCode::OK,
                Json(WebhookResponse::rejected("invalid_json")),
            );
        }
    };

    // Anti-loop filter: only incoming customer messages get processed
    if !is_incoming(&payload) {
        info!("chatwoot_event_not_incoming");
        return (
            StatusCode::OK,
            Json(WebhookResponse::skipped("not_incoming", None)),
        );
    }

    let event_id = resolve_identity(&payload);
    let dedupe_key = format!("{}{}", DEDUPE_KEY_PREFIX, event_id);

    match state
        .dedupe
        .claim_once(&dedupe_key, state.config.dedupe_ttl_seconds)
        .await
    {
        Ok(true) => {
            // Extension point: fetch conversation context and reply
            // through the Chatwoot API.
            info!(event_id = %event_id, "chatwoot_event_processed");
            (StatusCode::OK, Json(WebhookResponse::processed(event_id)))
        }
        Ok(false) => {
            info!(event_id = %event_id, "chatwoot_event_duplicate");
            (
                StatusCode::OK,
                Json(WebhookResponse::skipped("duplicate", Some(event_id))),
            )
        }
        Err(e) => {
            error!(error = %e, event_id = %event_id, "dedupe_store_unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WebhookResponse::rejected("store_unavailable")),
            )
        }
    }
}
