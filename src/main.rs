//! userdeck binary entry point.
//!
//! Parses configuration, initializes logging and the fetch runtime, puts
//! the terminal into raw mode, runs the TUI event loop, and restores the
//! terminal state on exit.
//!
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::time::Duration;
use tracing::info;

mod api;
mod app;
mod cli;
mod error;
mod search;
mod store;
mod sync;
mod ui;

use crate::error::Result;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Send logs to a file when configured; the terminal belongs to the TUI.
fn init_logging(cli: &cli::Cli) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.validate()?;
    init_logging(&cli)?;
    info!(api_url = %cli.api_url, "starting userdeck");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let client = api::ApiClient::new(&cli.api_url).map_err(|e| format!("{e:#}"))?;
    let (tx, rx) = sync::fetch_channel();
    let syncer = sync::Syncer::new(runtime.handle().clone(), client, tx);
    let app = app::AppState::new(Duration::from_millis(cli.debounce_ms));

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(
        &mut terminal,
        app,
        syncer,
        rx,
        Duration::from_millis(cli.tick_ms),
    );

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    Ok(())
}
