//! Rejection taxonomy for the webhook endpoint.
//!
//! Authentication failures map to 401, everything else that stops a webhook
//! before dispatch maps to 400. Failures of the card call itself never reach
//! this type; see [`crate::dispatch::DispatchError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Reasons a webhook is rejected before its card is dispatched.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No `X-Telex-Signature` header on the request
    #[error("Missing signature")]
    MissingSignature,

    /// Signature header present but does not match the body digest
    #[error("Invalid signature")]
    InvalidSignature,

    /// No `X-Telex-Settings` header on the request
    #[error("missing X-Telex-Settings header")]
    MissingSettingsHeader,

    /// Settings header is not valid UTF-8 or not a JSON array of settings
    #[error("malformed X-Telex-Settings header: {0}")]
    MalformedSettings(String),

    /// A required setting label is absent
    #[error("missing required setting: {0}")]
    MissingSetting(String),

    /// Request body could not be read (too large, aborted, ...)
    #[error("unreadable request body: {0}")]
    UnreadableBody(String),

    /// Request body does not match the message payload schema
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

impl WebhookError {
    /// HTTP status for this rejection.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => {
                StatusCode::UNAUTHORIZED
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error body for rejected webhooks.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    pub detail: String,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            // Signature rejections carry only the detail field.
            status: (status == StatusCode::BAD_REQUEST).then_some("error"),
            detail: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
