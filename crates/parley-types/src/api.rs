//! Wire types for the chat server's four endpoints.
//!
//! Field names follow the server's JSON exactly. Every response carries a
//! `success` flag; a `false` flag with an optional `error` string is an
//! application-level failure even when the transport succeeded.

use serde::{Deserialize, Serialize};

/// `POST /api/chat`
#[derive(Debug, Clone, Serialize)]
pub struct SendRequest {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendResponse {
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /api/history?session_id=..`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    #[serde(default)]
    pub messages: Vec<HistoryMessage>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryMessage {
    pub id: String,
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub feedback: Option<WireFeedback>,
}

/// Feedback payload as it appears inside a history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFeedback {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

/// `POST /api/reset`
#[derive(Debug, Clone, Serialize)]
pub struct ResetRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /api/feedback`
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRequest {
    pub message_id: String,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
