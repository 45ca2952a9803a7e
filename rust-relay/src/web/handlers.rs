//! HTTP endpoint handlers.
//!
//! The webhook handler is designed to be fast - it only:
//! 1. Verifies the body signature
//! 2. Parses the payload and resolves Trello credentials
//! 3. Hands the card to the dispatcher and returns immediately
//!
//! The Trello call runs in a detached task the handler never awaits. It may
//! start, or even finish, before the response is written.

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::dispatch::{CardJob, Dispatcher};
use crate::error::WebhookError;
use crate::payload::{MessagePayload, SettingsMap, WEBHOOK_SECRET};
use crate::web::manifest::{request_base_url, IntegrationManifest};
use crate::web::signature::{verify_signature, SIGNATURE_HEADER};
use crate::Config;

/// Header carrying the JSON-encoded settings array.
pub const SETTINGS_HEADER: &str = "X-Telex-Settings";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Telex Webhook
// =============================================================================

/// Webhook acceptance response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
}

/// Telex webhook endpoint.
///
/// The body is taken as raw bytes so the signature is checked against exactly
/// what Telex signed, before any JSON decoding. A body that cannot be read
/// (for example one over the configured size limit) is rejected through the
/// same JSON error path as every other pre-dispatch failure. Once a card is
/// dispatched the caller gets `processing` and hears nothing further.
pub async fn telex_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<WebhookResponse>, WebhookError> {
    let body = body.map_err(|rejection| {
        let err = WebhookError::UnreadableBody(rejection.body_text());
        warn!(
            status_code = err.status_code().as_u16(),
            rejection_status = rejection.status().as_u16(),
            error = %err,
            "telex_webhook_rejected"
        );
        err
    })?;

    info!(
        body_length = body.len(),
        has_settings = headers.contains_key(SETTINGS_HEADER),
        has_signature = headers.contains_key(SIGNATURE_HEADER),
        "telex_webhook_received"
    );

    let job = accept_webhook(&headers, &body).map_err(|e| {
        warn!(
            status_code = e.status_code().as_u16(),
            error = %e,
            "telex_webhook_rejected"
        );
        e
    })?;

    let channel_id = job.channel_id.clone();
    state.dispatcher.dispatch(job);

    info!(channel_id = %channel_id, "telex_webhook_accepted");

    Ok(Json(WebhookResponse {
        status: "processing",
    }))
}

/// Run every pre-dispatch step of the webhook in order:
/// settings, secret, signature, payload, credentials.
fn accept_webhook(headers: &HeaderMap, body: &[u8]) -> Result<CardJob, WebhookError> {
    let settings = SettingsMap::from_header(headers.get(SETTINGS_HEADER))?;
    let secret = settings.require(WEBHOOK_SECRET)?;

    // Raw header bytes: a present but non-ASCII value is a mismatch, not a missing header.
    let signature = headers.get(SIGNATURE_HEADER).map(|v| v.as_bytes());
    verify_signature(body, signature, secret)?;

    let payload: MessagePayload = serde_json::from_slice(body)?;
    CardJob::from_payload(payload)
}

// =============================================================================
// Integration Manifest
// =============================================================================

/// Telex integration manifest endpoint.
pub async fn integration_json(headers: HeaderMap) -> Json<IntegrationManifest> {
    let base_url = request_base_url(&headers);
    Json(IntegrationManifest::for_base_url(&base_url))
}

// =============================================================================
// Logo
// =============================================================================

/// Serve the configured logo image.
pub async fn logo(State(state): State<AppState>) -> Response {
    let path = Path::new(&state.config.logo_path);

    match tokio::fs::read(path).await {
        Ok(content) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type_for(path))],
            content,
        )
            .into_response(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "logo_read_failed");
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}

/// Content type from the file extension.
fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
