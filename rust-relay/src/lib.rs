//! Trello Relay - Telex to Trello webhook relay.
//!
//! Receives Telex message webhooks, verifies their HMAC-SHA256 signature and
//! turns each accepted message into a Trello card.
//!
//! ## Architecture
//!
//! ```text
//! Telex → POST /webhook → signature gate → Dispatcher → (detached) Trello API
//!                        ↘ 200 {"status": "processing"}
//! ```
//!
//! Card creation is best effort: a single attempt in a detached task the
//! webhook handler never awaits, with failures logged and dropped.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod payload;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::{CardDraft, CardJob, Dispatcher, TaskSpawner, TokioSpawner, TrelloClient};
pub use error::WebhookError;
pub use payload::{MessagePayload, Setting, SettingsMap};
pub use web::{router, AppState};
