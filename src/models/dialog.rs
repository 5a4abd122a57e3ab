use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::{ChatModel, Role};

/// A conversation thread. Messages belong to exactly one dialog and are
/// removed with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dialog {
    pub id: i64,
    pub created_at: NaiveDateTime,
}

/// One persisted turn of a dialog. `model` is set on generated replies,
/// and `reply_to` links a reply to the message it answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub dialog_id: i64,
    pub role: Role,
    pub content: String,
    pub model: Option<ChatModel>,
    pub reply_to: Option<i64>,
    pub created_at: NaiveDateTime,
}

/// Fields for a message about to be inserted; the id and timestamp are
/// assigned by the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub dialog_id: i64,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub model: Option<ChatModel>,
    #[serde(default)]
    pub reply_to: Option<i64>,
}
