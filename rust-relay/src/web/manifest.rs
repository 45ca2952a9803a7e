//! Telex integration manifest served at `/integration.json`.
//!
//! Every URL in the manifest is derived from the base URL the request was
//! made against, so the same binary can sit behind any host name.

use axum::http::{header, HeaderMap};
use serde::Serialize;

use crate::payload::{Setting, BOARD_ID, LIST_ID, TRELLO_API_KEY, TRELLO_TOKEN, WEBHOOK_SECRET};

const MANIFEST_DATE: &str = "2025-02-20";

#[derive(Debug, Serialize)]
pub struct IntegrationManifest {
    pub data: IntegrationData,
}

#[derive(Debug, Serialize)]
pub struct IntegrationData {
    pub date: ManifestDates,
    pub descriptions: Descriptions,
    pub is_active: bool,
    pub integration_type: &'static str,
    pub key_features: Vec<&'static str>,
    pub integration_category: &'static str,
    pub author: &'static str,
    pub website: String,
    pub settings: Vec<Setting>,
    pub target_url: String,
    pub webhook_events: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ManifestDates {
    pub created_at: &'static str,
    pub updated_at: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Descriptions {
    pub app_name: &'static str,
    pub app_description: &'static str,
    pub app_logo: String,
    pub app_url: String,
    pub background_color: &'static str,
}

impl IntegrationManifest {
    /// Build the manifest for a relay reachable at `base_url` (no trailing slash).
    pub fn for_base_url(base_url: &str) -> Self {
        let settings = [TRELLO_API_KEY, TRELLO_TOKEN, BOARD_ID, LIST_ID, WEBHOOK_SECRET]
            .into_iter()
            .map(|label| Setting::text(label, ""))
            .collect();

        Self {
            data: IntegrationData {
                date: ManifestDates {
                    created_at: MANIFEST_DATE,
                    updated_at: MANIFEST_DATE,
                },
                descriptions: Descriptions {
                    app_name: "Trello Card Creator",
                    app_description: "Create Trello cards from Telex messages",
                    app_logo: format!("{}/logo", base_url),
                    app_url: base_url.to_string(),
                    background_color: "#fff",
                },
                is_active: false,
                integration_type: "output",
                key_features: vec![
                    "- Automatically creates Trello cards",
                    "- Supports multiple boards",
                ],
                integration_category: "Product Management",
                author: "Nadduli Daniel",
                website: base_url.to_string(),
                settings,
                target_url: format!("{}/webhook", base_url),
                webhook_events: vec!["message.created"],
            },
        }
    }
}

/// Reconstruct the public base URL of a request from its headers.
///
/// Scheme comes from `X-Forwarded-Proto` when a proxy set it, otherwise
/// `http`. Host comes from the `Host` header.
pub fn request_base_url(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("X-Forwarded-Proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    format!("{}://{}", scheme, host)
        .trim_end_matches('/')
        .to_string()
}
