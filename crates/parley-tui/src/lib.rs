//! Full-screen TUI for the parley chat client.
//!
//! The architecture is a small Elm loop:
//! - [`state::AppState`] holds all UI state,
//! - [`update::update`] is the pure reducer (state + event -> effects),
//! - [`runtime::Runtime`] owns the terminal, executes effects via
//!   `tokio::spawn`, and feeds results back as events through an inbox
//!   channel.
//!
//! Rendering never mutates state; all mutation happens inside the reducer.

pub mod effects;
pub mod events;
pub mod feedback;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
use parley_core::{ChatApi, Config};
pub use runtime::Runtime;

/// Runs the interactive chat session until the user quits.
pub async fn run_chat(config: &Config, session_id: &str) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!("Chat mode requires a terminal.");
    }

    let api = ChatApi::new(config, session_id)?;
    let mut runtime = Runtime::new(api)?;
    runtime.run()
}
