//! Data contracts shared by the signature gate and the dispatch task.
//!
//! This module provides:
//! - Wire types for the settings header and the webhook body
//! - A label-keyed settings lookup that fails loudly on missing labels

pub mod settings;
pub mod types;

pub use settings::SettingsMap;
pub use types::{
    MessagePayload, Setting, BOARD_ID, LIST_ID, TRELLO_API_KEY, TRELLO_TOKEN, WEBHOOK_SECRET,
};
