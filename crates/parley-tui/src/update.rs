//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects. Nothing in this module performs I/O,
//! which keeps every conversation scenario unit-testable.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use parley_core::format;
use parley_types::{Message, Role, ServerFeedback};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::feedback::SubmitAction;
use crate::state::{AppState, Focus, MessageCell, Notice};

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            if app.notice.as_ref().is_some_and(Notice::is_expired) {
                app.notice = None;
            }
            for cell in &mut app.log {
                if let Some(feedback) = cell.interactive_feedback_mut() {
                    feedback.tick_nudge();
                }
            }
            vec![]
        }
        UiEvent::Terminal(Event::Key(key)) => handle_key(app, key),
        UiEvent::Terminal(_) => vec![],
        UiEvent::SendFinished { generation, result } => {
            if generation != app.generation {
                // The log this reply targeted no longer exists.
                return vec![];
            }
            // Each send settles its own slot on success and failure alike;
            // the typing indicator falls only with the last one.
            app.pending_sends = app.pending_sends.saturating_sub(1);
            match result {
                Ok(reply) => {
                    let blocks = format::render(&reply.text, false);
                    let message = Message {
                        id: reply.message_id,
                        role: Role::Assistant,
                        raw_text: reply.text,
                        blocks,
                    };
                    app.log.push(MessageCell::assistant(message, None));
                }
                Err(error) => app.raise_notice(error.message),
            }
            vec![]
        }
        UiEvent::HistoryFinished { generation, result } => {
            if generation != app.generation {
                return vec![];
            }
            match result {
                Ok(messages) => {
                    let mut cells = Vec::with_capacity(messages.len());
                    for msg in messages {
                        if msg.role == "user" {
                            let blocks = format::render(&msg.content, true);
                            cells.push(MessageCell::user(Message::user(msg.content, blocks)));
                        } else {
                            let blocks = format::render(&msg.content, false);
                            let message = Message::assistant(msg.id, msg.content, blocks);
                            let existing = msg.feedback.map(|f| ServerFeedback {
                                rating: f.rating,
                                comment: f.comment,
                            });
                            cells.push(MessageCell::assistant(message, existing));
                        }
                    }
                    // History predates anything sent while the load was in
                    // flight, so it goes in front of the log, not behind it.
                    if let Focus::Feedback(index) = &mut app.focus {
                        *index += cells.len();
                    }
                    app.log.splice(0..0, cells);
                }
                // A history failure must never block starting fresh.
                Err(error) => warn!(error = %error, "failed to load chat history"),
            }
            vec![]
        }
        UiEvent::ResetFinished { result } => {
            match result {
                Ok(()) => {
                    app.clear_log();
                    app.pending_sends = 0;
                    app.generation += 1;
                }
                Err(error) => app.raise_notice(error.message),
            }
            vec![]
        }
        UiEvent::FeedbackFinished { message_id, result } => {
            let result = result.map_err(|e| e.message);
            for cell in &mut app.log {
                if let Some(feedback) = cell.interactive_feedback_mut()
                    && feedback.message_id == message_id
                {
                    feedback.resolve(result);
                    break;
                }
            }
            vec![]
        }
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.kind != KeyEventKind::Press {
        return vec![];
    }

    // Global bindings first.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return vec![UiEffect::Quit],
            KeyCode::Char('r') => return vec![UiEffect::ResetSession],
            _ => {}
        }
    }

    match app.focus {
        Focus::Composing => handle_compose_key(app, key),
        Focus::Feedback(index) => handle_feedback_key(app, key, index),
    }
}

fn handle_compose_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Esc => {
            if let Some(index) = app.newest_pending_feedback() {
                app.focus = Focus::Feedback(index);
            }
            vec![]
        }
        KeyCode::Enter => {
            let Some(text) = app.input.take() else {
                return vec![];
            };
            let blocks = format::render(&text, true);
            app.log
                .push(MessageCell::user(Message::user(text.clone(), blocks)));
            app.pending_sends += 1;
            vec![UiEffect::SendChat {
                generation: app.generation,
                text,
            }]
        }
        KeyCode::Backspace => {
            app.input.pop_char();
            vec![]
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.push_char(c);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_feedback_key(app: &mut AppState, key: KeyEvent, index: usize) -> Vec<UiEffect> {
    if key.code == KeyCode::Esc {
        app.focus = Focus::Composing;
        return vec![];
    }

    let Some(feedback) = app
        .log
        .get_mut(index)
        .and_then(MessageCell::interactive_feedback_mut)
    else {
        app.focus = Focus::Composing;
        return vec![];
    };

    match key.code {
        // Initial star selection.
        KeyCode::Char(c @ '1'..='5') if feedback.rating == 0 => {
            feedback.select_star(c as u8 - b'0');
            vec![]
        }
        // Rating adjustment once the comment box is open.
        KeyCode::Up | KeyCode::Right if feedback.accepts_comment() => {
            let rating = (feedback.rating + 1).min(5);
            feedback.select_star(rating);
            vec![]
        }
        KeyCode::Down | KeyCode::Left if feedback.accepts_comment() => {
            let rating = feedback.rating.saturating_sub(1).max(1);
            feedback.select_star(rating);
            vec![]
        }
        KeyCode::Enter => match feedback.submit() {
            SubmitAction::Send {
                message_id,
                rating,
                comment,
            } => vec![UiEffect::SubmitFeedback {
                message_id,
                rating,
                comment,
            }],
            SubmitAction::Nudge | SubmitAction::Ignore => vec![],
        },
        KeyCode::Backspace => {
            feedback.pop_comment_char();
            vec![]
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            feedback.push_comment_char(c);
            vec![]
        }
        _ => vec![],
    }
}
