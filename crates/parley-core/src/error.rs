//! API error taxonomy.
//!
//! Two network-facing categories: transport failures (no usable response)
//! and application failures (a response arrived but reported an error or
//! was missing a required field). Local validation, such as submitting
//! feedback with no rating, never reaches this module; the UI handles it
//! as a non-error cue.

use std::fmt;

/// Error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Network/transport failure, no response body.
    Transport,
    /// Response received, but `success` was false or an expected field
    /// was missing.
    Api,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::Api => write!(f, "api"),
        }
    }
}

/// Structured error from a chat endpoint call.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display.
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Transport, message)
    }

    /// Creates an application-level error, falling back to a default
    /// message when the server sent none.
    pub fn api(error: Option<String>) -> Self {
        let message = error
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or_else(|| "The server reported an error.".to_string());
        Self::new(ApiErrorKind::Api, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for chat endpoint calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
