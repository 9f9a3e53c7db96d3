//! Conversation messages.

use serde::{Deserialize, Serialize};

use crate::block::Block;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn is_user(self) -> bool {
        matches!(self, Role::User)
    }
}

/// One entry in the conversation log.
///
/// `id` is the server-issued identifier, present only for assistant
/// messages once persisted. `blocks` is derived from `raw_text` exactly
/// once, when the message enters the log, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Option<String>,
    pub role: Role,
    pub raw_text: String,
    pub blocks: Vec<Block>,
}

impl Message {
    pub fn user(raw_text: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            id: None,
            role: Role::User,
            raw_text: raw_text.into(),
            blocks,
        }
    }

    pub fn assistant(id: impl Into<String>, raw_text: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            id: Some(id.into()),
            role: Role::Assistant,
            raw_text: raw_text.into(),
            blocks,
        }
    }
}

/// Feedback the server already holds for a message, as reported by the
/// history endpoint. Its presence bypasses the feedback state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFeedback {
    pub rating: u8,
    pub comment: String,
}
