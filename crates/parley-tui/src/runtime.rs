//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! This is the "Elm runtime" boundary. The reducer stays pure and produces
//! effects; this module executes them via `tokio::spawn` and feeds the
//! results back through an inbox channel:
//! - spawned handlers send `UiEvent`s to `inbox_tx`,
//! - the loop drains `inbox_rx` each frame,
//! - nothing but the reducer ever touches `AppState`.

use std::future::Future;
use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use parley_core::ChatApi;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick cadence while something is animating (typing dots, nudge, notice).
const ACTIVE_TICK: Duration = Duration::from_millis(100);

/// Tick cadence when nothing is happening, to save CPU.
const IDLE_TICK: Duration = Duration::from_millis(250);

/// Full-screen chat runtime.
///
/// Owns the terminal and state. Terminal state is restored on normal exit
/// and on panic (via the hook installed in `new`).
pub struct Runtime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    api: Arc<ChatApi>,
    /// Handlers send events here.
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    /// The loop drains this each frame.
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    last_tick: Instant,
}

impl Runtime {
    /// Creates the runtime, entering the alternate screen.
    pub fn new(api: ChatApi) -> Result<Self> {
        // Panic hook goes in BEFORE entering the alternate screen.
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal,
            state: AppState::new(),
            api: Arc::new(api),
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until the user quits.
    pub fn run(&mut self) -> Result<()> {
        self.execute_effect(UiEffect::LoadHistory {
            generation: self.state.generation,
        });

        let result = self.event_loop();

        let restored = terminal::restore_terminal();
        result.and(restored)
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            let events = self.collect_events()?;

            for event in events {
                // Only Tick triggers a render, which caps the frame rate
                // at the tick cadence.
                if matches!(&event, UiEvent::Tick) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                for effect in effects {
                    self.execute_effect(effect);
                }
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    /// Collects events from the inbox and the terminal, emitting a Tick
    /// when the cadence interval has elapsed.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let tick_interval = if self.needs_fast_tick() {
            ACTIVE_TICK
        } else {
            IDLE_TICK
        };

        // Block until the next tick is due, unless results are already
        // waiting, then poll without delay.
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    fn needs_fast_tick(&self) -> bool {
        self.state.awaiting_reply()
            || self.state.notice.is_some()
            || self.state.log.iter().any(|cell| {
                matches!(
                    &cell.feedback,
                    Some(crate::state::FeedbackSlot::Interactive(fb)) if fb.nudge_ticks > 0
                )
            })
    }

    /// Spawns an async effect handler; its resulting event lands in the
    /// inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce(Arc<ChatApi>) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            let _ = tx.send(f(api).await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::SendChat { generation, text } => {
                self.spawn_effect(move |api| async move {
                    let result = api.send_message(&text).await;
                    UiEvent::SendFinished { generation, result }
                });
            }
            UiEffect::LoadHistory { generation } => {
                self.spawn_effect(move |api| async move {
                    let result = api.fetch_history().await;
                    UiEvent::HistoryFinished { generation, result }
                });
            }
            UiEffect::ResetSession => {
                self.spawn_effect(move |api| async move {
                    let result = api.reset_session().await;
                    UiEvent::ResetFinished { result }
                });
            }
            UiEffect::SubmitFeedback {
                message_id,
                rating,
                comment,
            } => {
                self.spawn_effect(move |api| async move {
                    let result = api.submit_feedback(&message_id, rating, &comment).await;
                    UiEvent::FeedbackFinished { message_id, result }
                });
            }
        }
    }
}
