//! Label-keyed view over a settings list.

use std::collections::HashMap;

use axum::http::HeaderValue;

use super::types::Setting;
use crate::error::WebhookError;

/// Settings indexed by label.
///
/// Built once from the ordered list Telex sends. When a label repeats, the
/// first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct SettingsMap {
    values: HashMap<String, String>,
}

impl SettingsMap {
    /// Index a list of settings by label.
    pub fn from_settings(settings: &[Setting]) -> Self {
        let mut values = HashMap::with_capacity(settings.len());
        for setting in settings {
            values
                .entry(setting.label.clone())
                .or_insert_with(|| setting.default.clone());
        }
        Self { values }
    }

    /// Parse the raw `X-Telex-Settings` header value.
    pub fn from_header(header: Option<&HeaderValue>) -> Result<Self, WebhookError> {
        let raw = header.ok_or(WebhookError::MissingSettingsHeader)?;
        let raw = raw
            .to_str()
            .map_err(|e| WebhookError::MalformedSettings(e.to_string()))?;

        let settings: Vec<Setting> = serde_json::from_str(raw)
            .map_err(|e| WebhookError::MalformedSettings(e.to_string()))?;

        Ok(Self::from_settings(&settings))
    }

    /// Value for `label`, or a validation failure if it is absent.
    pub fn require(&self, label: &str) -> Result<&str, WebhookError> {
        self.get(label)
            .ok_or_else(|| WebhookError::MissingSetting(label.to_string()))
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.values.get(label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
