//! Shared data model for parley.
//!
//! This crate is a dependency leaf: the block model produced by the
//! formatter, the message/conversation types, and the serde wire types for
//! the chat server's four endpoints. No I/O, no UI.

mod api;
mod block;
mod message;

pub use api::{
    FeedbackRequest, FeedbackResponse, HistoryMessage, HistoryResponse, ResetRequest,
    ResetResponse, SendRequest, SendResponse, WireFeedback,
};
pub use block::{Block, Emphasis, InlineRun};
pub use message::{Message, Role, ServerFeedback};
