//! Wire types sent by Telex.
//!
//! - `X-Telex-Settings` header: JSON array of [`Setting`]
//! - `POST /webhook` body: [`MessagePayload`]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Label of the HMAC key used to sign webhook bodies.
pub const WEBHOOK_SECRET: &str = "Webhook Secret";

/// Label of the Trello API key.
pub const TRELLO_API_KEY: &str = "Trello API Key";

/// Label of the Trello user token.
pub const TRELLO_TOKEN: &str = "Trello Token";

/// Label of the Trello board id (advertised in the manifest, unused by dispatch).
pub const BOARD_ID: &str = "Board ID";

/// Label of the Trello list that receives new cards.
pub const LIST_ID: &str = "List ID";

/// A named configuration item supplied by Telex.
///
/// The configured value travels in `default`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
    pub default: String,
}

impl Setting {
    /// A required text setting with the given value.
    pub fn text(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            kind: "text".to_string(),
            required: true,
            default: value.to_string(),
        }
    }
}

/// Inbound webhook body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
    /// Telex channel the message was posted in
    pub channel_id: String,
    /// Callback URL offered by Telex (never called; dispatch has no feedback path)
    pub return_url: String,
    /// Integration settings as configured on the channel
    pub settings: Vec<Setting>,
    /// Free-form message object (`text`, `author`, `timestamp`, ...)
    pub message: Map<String, Value>,
}
