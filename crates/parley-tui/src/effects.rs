//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O only; the reducer itself never touches the network.
//! Each async effect reports back as a [`crate::events::UiEvent`].

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,
    /// Send one user message to the chat endpoint.
    SendChat { generation: u64, text: String },
    /// Load the session's history.
    LoadHistory { generation: u64 },
    /// Ask the server to reset the session.
    ResetSession,
    /// Submit feedback for one assistant message. At most one of these is
    /// ever in flight per message; the feedback machine's `Submitting`
    /// phase is the lock.
    SubmitFeedback {
        message_id: String,
        rating: u8,
        comment: String,
    },
}
