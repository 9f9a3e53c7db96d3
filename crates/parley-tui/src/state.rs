//! Application state composition.
//!
//! ```text
//! AppState
//! ├── log: Vec<MessageCell>     (the conversation, append-only until reset)
//! ├── input: InputState         (compose box)
//! ├── focus: Focus              (composing vs feedback widget)
//! ├── notice: Option<Notice>    (auto-expiring error banner)
//! ├── pending_sends: usize      (typing indicator while > 0)
//! └── generation: u64           (reset epoch for in-flight requests)
//! ```
//!
//! The log is mutated only by the reducer, always on the single event-loop
//! thread.

use std::time::{Duration, Instant};

use parley_types::{Message, ServerFeedback};

use crate::feedback::FeedbackState;

/// How long an error notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// One conversation entry plus its feedback affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCell {
    pub message: Message,
    pub feedback: Option<FeedbackSlot>,
}

/// The feedback affordance attached to an assistant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackSlot {
    /// Live state machine collecting a rating.
    Interactive(FeedbackState),
    /// The server already holds feedback for this message; static display,
    /// no machine is ever created.
    AlreadyRated(ServerFeedback),
}

impl MessageCell {
    pub fn user(message: Message) -> Self {
        Self {
            message,
            feedback: None,
        }
    }

    /// Wraps an assistant message, attaching the appropriate feedback slot.
    /// Messages without a server id cannot collect feedback.
    pub fn assistant(message: Message, existing: Option<ServerFeedback>) -> Self {
        let feedback = match (&message.id, existing) {
            (Some(_), Some(server)) => Some(FeedbackSlot::AlreadyRated(server)),
            (Some(id), None) => Some(FeedbackSlot::Interactive(FeedbackState::new(id.clone()))),
            (None, _) => None,
        };
        Self { message, feedback }
    }

    pub fn interactive_feedback_mut(&mut self) -> Option<&mut FeedbackState> {
        match &mut self.feedback {
            Some(FeedbackSlot::Interactive(state)) => Some(state),
            _ => None,
        }
    }
}

/// Compose box state.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub text: String,
}

impl InputState {
    pub fn push_char(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn pop_char(&mut self) {
        self.text.pop();
    }

    /// Takes the trimmed text, clearing the box; None when blank.
    pub fn take(&mut self) -> Option<String> {
        let text = std::mem::take(&mut self.text);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Where key input is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Typing into the compose box.
    #[default]
    Composing,
    /// Interacting with the feedback widget of the cell at this log index.
    Feedback(usize),
}

/// A dismissible, auto-expiring error banner.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub raised_at: Instant,
}

impl Notice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            raised_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.raised_at.elapsed() >= NOTICE_TTL
    }
}

/// Combined application state.
#[derive(Debug, Default)]
pub struct AppState {
    pub log: Vec<MessageCell>,
    pub input: InputState,
    pub focus: Focus,
    pub notice: Option<Notice>,
    /// Chat sends still in flight. More than one is possible: the compose
    /// box never blocks, so the typing indicator stays up until the last
    /// outstanding reply or error lands.
    pub pending_sends: usize,
    /// Bumped on every successful reset; results tagged with an older
    /// generation are stale and dropped.
    pub generation: u64,
    pub spinner_frame: u8,
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the typing indicator should be shown.
    pub fn awaiting_reply(&self) -> bool {
        self.pending_sends > 0
    }

    /// Index of the newest assistant cell still accepting feedback input.
    pub fn newest_pending_feedback(&self) -> Option<usize> {
        self.log.iter().rposition(|cell| {
            matches!(
                &cell.feedback,
                Some(FeedbackSlot::Interactive(state)) if !state.is_settled()
            )
        })
    }

    pub fn raise_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::new(text));
    }

    /// Clears the conversation back to empty. The welcome line lives in
    /// the renderer, not in the log.
    pub fn clear_log(&mut self) {
        self.log.clear();
        self.focus = Focus::Composing;
    }

}
