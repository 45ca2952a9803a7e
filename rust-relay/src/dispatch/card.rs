//! Card construction from a Telex message.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::WebhookError;
use crate::payload::{MessagePayload, SettingsMap, LIST_ID, TRELLO_API_KEY, TRELLO_TOKEN};

/// Card title used when the message has no `text`.
pub const DEFAULT_CARD_NAME: &str = "New Task from Telex";

/// Author shown when the message has no `author`.
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// JSON body of the Trello create-card call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardDraft {
    pub name: String,
    pub desc: String,
}

impl CardDraft {
    /// Build the card title and description for a message.
    pub fn from_message(channel_id: &str, message: &Map<String, Value>) -> Self {
        let name = message_field(message, "text").unwrap_or_else(|| DEFAULT_CARD_NAME.to_string());
        let author = message_field(message, "author").unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
        let timestamp = message_field(message, "timestamp").unwrap_or_default();

        Self {
            name,
            desc: format!(
                "From Telex channel {}\nAuthor: {}\nTimestamp: {}",
                channel_id, author, timestamp
            ),
        }
    }
}

/// Render a message field as text. Strings are used verbatim, other values as
/// compact JSON, and `null` counts as absent.
fn message_field(message: &Map<String, Value>, key: &str) -> Option<String> {
    match message.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Credentials and target list for the card call.
#[derive(Clone, PartialEq, Eq)]
pub struct TrelloCredentials {
    pub api_key: String,
    pub token: String,
    pub list_id: String,
}

impl TrelloCredentials {
    /// Pull the three required labels out of a settings map.
    pub fn from_settings(settings: &SettingsMap) -> Result<Self, WebhookError> {
        Ok(Self {
            api_key: settings.require(TRELLO_API_KEY)?.to_string(),
            token: settings.require(TRELLO_TOKEN)?.to_string(),
            list_id: settings.require(LIST_ID)?.to_string(),
        })
    }
}

// Keeps key and token out of logs and panic messages.
impl std::fmt::Debug for TrelloCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrelloCredentials")
            .field("api_key", &"<redacted>")
            .field("token", &"<redacted>")
            .field("list_id", &self.list_id)
            .finish()
    }
}

/// One card to create. Owns everything the dispatch task needs.
#[derive(Debug, Clone)]
pub struct CardJob {
    pub channel_id: String,
    pub credentials: TrelloCredentials,
    pub card: CardDraft,
}

impl CardJob {
    /// Resolve credentials from the payload's own settings and draft the card.
    ///
    /// Fails with a validation error when a Trello label is missing, so the
    /// webhook is rejected instead of dispatching a call that cannot succeed.
    pub fn from_payload(payload: MessagePayload) -> Result<Self, WebhookError> {
        let settings = SettingsMap::from_settings(&payload.settings);
        let credentials = TrelloCredentials::from_settings(&settings)?;
        let card = CardDraft::from_message(&payload.channel_id, &payload.message);

        Ok(Self {
            channel_id: payload.channel_id,
            credentials,
            card,
        })
    }
}
