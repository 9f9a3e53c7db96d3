//! Core logic for parley: message formatting and the chat API client.
//!
//! Everything here is UI-agnostic. The formatter is a pure function over
//! text; the client owns the HTTP surface for the four chat endpoints.

pub mod client;
pub mod config;
pub mod error;
pub mod format;

pub use client::{ChatApi, SendReply};
pub use config::Config;
pub use error::{ApiError, ApiErrorKind, ApiResult};
