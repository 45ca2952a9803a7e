//! Web server module for the Telex integration.
//!
//! This module provides a thin, fast web server that:
//! - Receives Telex webhooks and verifies their HMAC signature
//! - Hands accepted messages to the card dispatcher
//! - Serves the integration manifest and logo Telex displays
//!
//! Card creation happens in detached tasks the webhook handler never awaits.

pub mod handlers;
pub mod manifest;
pub mod signature;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use handlers::{
    health, integration_json, logo, telex_webhook, AppState, HealthResponse, WebhookResponse,
    SETTINGS_HEADER,
};
pub use manifest::{request_base_url, IntegrationManifest};
pub use signature::{compute_signature, verify_signature, SignatureError, SIGNATURE_HEADER};

/// Build the application router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);
    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    Router::new()
        .route("/health", get(health))
        .route("/logo", get(logo))
        .route("/integration.json", get(integration_json))
        .route("/webhook", post(telex_webhook).layer(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origin allow-list.
///
/// Credentials are allowed, which rules out wildcard methods and headers, so
/// both are mirrored from the preflight request instead.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "cors_origin_invalid");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
