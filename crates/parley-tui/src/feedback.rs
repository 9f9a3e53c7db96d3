//! Per-message feedback state machine.
//!
//! One instance exists for each assistant message that has a server id and
//! no pre-existing feedback. The machine is pure: transitions mutate the
//! state and report what the caller should do (at most a single network
//! submission per message at a time).
//!
//! ```text
//! Prompting --star(r)--> RatingSelected --submit--> Submitting --ok--> Submitted
//!                              ^   ^ star(r) in place      |
//!                              |   '---- submit ----.      '--err--> Failed
//!                              '---------------------'<--- star/submit ---'
//! ```

/// Lifecycle phase of the feedback widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Stars unfilled, comment box hidden.
    Prompting,
    /// A rating is chosen; comment box shown.
    RatingSelected,
    /// Network call in flight; no further input accepted.
    Submitting,
    /// Terminal: thank-you confirmation.
    Submitted,
    /// Submission failed; behaves as `RatingSelected` plus an error line.
    Failed(String),
}

/// What a submit attempt asks the caller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAction {
    /// Issue the network call with this payload.
    Send {
        message_id: String,
        rating: u8,
        comment: String,
    },
    /// No rating selected: flash the stars, change nothing.
    Nudge,
    /// Input ignored in the current phase.
    Ignore,
}

/// Feedback state for one assistant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackState {
    pub message_id: String,
    /// 0 = unset, otherwise 1..=5.
    pub rating: u8,
    pub comment: String,
    pub phase: Phase,
    /// Remaining ticks of the attention cue after a ratingless submit.
    pub nudge_ticks: u8,
}

/// Tick count the star nudge stays visible.
const NUDGE_TICKS: u8 = 10;

impl FeedbackState {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            rating: 0,
            comment: String::new(),
            phase: Phase::Prompting,
            nudge_ticks: 0,
        }
    }

    /// A star was selected. Enters `RatingSelected` from `Prompting`;
    /// in `RatingSelected`/`Failed` the rating is updated in place without
    /// restarting the machine. Ignored once a submission is in flight or
    /// accepted.
    pub fn select_star(&mut self, rating: u8) {
        debug_assert!((1..=5).contains(&rating));
        match self.phase {
            Phase::Prompting => {
                self.rating = rating;
                self.phase = Phase::RatingSelected;
            }
            Phase::RatingSelected | Phase::Failed(_) => {
                self.rating = rating;
            }
            Phase::Submitting | Phase::Submitted => {}
        }
    }

    /// Whether the comment box is visible and editable.
    pub fn accepts_comment(&self) -> bool {
        matches!(self.phase, Phase::RatingSelected | Phase::Failed(_))
    }

    pub fn push_comment_char(&mut self, c: char) {
        if self.accepts_comment() {
            self.comment.push(c);
        }
    }

    pub fn pop_comment_char(&mut self) {
        if self.accepts_comment() {
            self.comment.pop();
        }
    }

    /// The submit button. With no rating there is no network call and no
    /// state change, only the transient star nudge. `Submitting` itself is
    /// the lock that prevents a second concurrent request.
    pub fn submit(&mut self) -> SubmitAction {
        match self.phase {
            Phase::Prompting => {
                self.nudge_ticks = NUDGE_TICKS;
                SubmitAction::Nudge
            }
            Phase::RatingSelected | Phase::Failed(_) => {
                self.phase = Phase::Submitting;
                SubmitAction::Send {
                    message_id: self.message_id.clone(),
                    rating: self.rating,
                    comment: self.comment.clone(),
                }
            }
            Phase::Submitting | Phase::Submitted => SubmitAction::Ignore,
        }
    }

    /// The network call finished.
    pub fn resolve(&mut self, result: Result<(), String>) {
        if self.phase != Phase::Submitting {
            return;
        }
        self.phase = match result {
            Ok(()) => Phase::Submitted,
            Err(error) => Phase::Failed(error),
        };
    }

    /// Advances the attention cue; returns true while it is visible.
    pub fn tick_nudge(&mut self) -> bool {
        if self.nudge_ticks > 0 {
            self.nudge_ticks -= 1;
        }
        self.nudge_ticks > 0
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Submitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_without_rating_never_sends() {
        let mut fb = FeedbackState::new("m1");
        assert_eq!(fb.submit(), SubmitAction::Nudge);
        assert_eq!(fb.phase, Phase::Prompting);
        assert!(fb.nudge_ticks > 0);
    }

    #[test]
    fn test_rating_can_be_changed_before_submit() {
        let mut fb = FeedbackState::new("m1");
        fb.select_star(3);
        assert_eq!(fb.phase, Phase::RatingSelected);
        fb.select_star(5);
        assert_eq!(fb.phase, Phase::RatingSelected);

        // Exactly one submission, carrying the latest rating.
        let action = fb.submit();
        assert_eq!(
            action,
            SubmitAction::Send {
                message_id: "m1".to_string(),
                rating: 5,
                comment: String::new(),
            }
        );
        assert_eq!(fb.submit(), SubmitAction::Ignore);
    }

    #[test]
    fn test_success_is_terminal() {
        let mut fb = FeedbackState::new("m1");
        fb.select_star(4);
        fb.submit();
        fb.resolve(Ok(()));
        assert_eq!(fb.phase, Phase::Submitted);

        fb.select_star(1);
        assert_eq!(fb.rating, 4);
        assert_eq!(fb.submit(), SubmitAction::Ignore);
    }

    #[test]
    fn test_failure_allows_resubmission() {
        let mut fb = FeedbackState::new("m1");
        fb.select_star(2);
        fb.push_comment_char('x');
        fb.submit();
        fb.resolve(Err("timeout".to_string()));
        assert_eq!(fb.phase, Phase::Failed("timeout".to_string()));

        // Failed behaves as RatingSelected: rating and comment stay editable.
        fb.select_star(3);
        fb.push_comment_char('y');
        let action = fb.submit();
        assert_eq!(
            action,
            SubmitAction::Send {
                message_id: "m1".to_string(),
                rating: 3,
                comment: "xy".to_string(),
            }
        );
    }

    #[test]
    fn test_comment_locked_while_submitting() {
        let mut fb = FeedbackState::new("m1");
        fb.select_star(5);
        fb.push_comment_char('a');
        fb.submit();
        fb.push_comment_char('b');
        fb.pop_comment_char();
        assert_eq!(fb.comment, "a");
    }

    #[test]
    fn test_stale_resolve_is_ignored() {
        let mut fb = FeedbackState::new("m1");
        fb.select_star(1);
        fb.resolve(Ok(()));
        assert_eq!(fb.phase, Phase::RatingSelected);
    }

    #[test]
    fn test_nudge_decays() {
        let mut fb = FeedbackState::new("m1");
        fb.submit();
        while fb.tick_nudge() {}
        assert_eq!(fb.nudge_ticks, 0);
    }
}
