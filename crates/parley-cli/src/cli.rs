//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use parley_core::config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parley")]
#[command(version)]
#[command(about = "Terminal chat client with message feedback")]
struct Cli {
    /// Base URL of the chat server (overrides config)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Session identifier; a random one is generated when omitted
    #[arg(long, value_name = "ID")]
    session: Option<String>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // The alternate screen owns stdout/stderr, so logs go to a file.
    // The guard must outlive the event loop.
    let _log_guard = init_logging()?;

    let mut config = config::Config::load().context("load config")?;
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }

    let session_id = cli
        .session
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { parley_tui::run_chat(&config, &session_id).await })
}

fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = config::parley_home().join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(log_dir, "parley.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}
