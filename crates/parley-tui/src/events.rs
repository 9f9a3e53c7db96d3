//! UI event types.
//!
//! Events are the only way state changes: terminal input, timer ticks, and
//! the results of async endpoint calls posted back through the runtime's
//! inbox channel.

use parley_core::{ApiError, SendReply};
use parley_types::HistoryMessage;

/// Events consumed by the reducer.
#[derive(Debug)]
pub enum UiEvent {
    /// Periodic timer: spinner animation, notice expiry, nudge decay.
    Tick,
    /// Raw terminal input.
    Terminal(crossterm::event::Event),
    /// A chat send finished. `generation` is the reset epoch the request
    /// was issued under; stale results are dropped.
    SendFinished {
        generation: u64,
        result: Result<SendReply, ApiError>,
    },
    /// The initial history load finished.
    HistoryFinished {
        generation: u64,
        result: Result<Vec<HistoryMessage>, ApiError>,
    },
    /// A reset request finished.
    ResetFinished { result: Result<(), ApiError> },
    /// A feedback submission finished for the given message.
    FeedbackFinished {
        message_id: String,
        result: Result<(), ApiError>,
    },
}
