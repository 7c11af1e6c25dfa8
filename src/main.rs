//! userdir-manager binary entry point.
//!
//! Parses the command line, initializes logging and the terminal in raw
//! mode, runs the TUI event loop, and restores the terminal state on exit.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

mod api;
mod app;
mod error;
mod ui;
mod view;

/// Browse and manage users in a remote directory service.
#[derive(Debug, Parser)]
#[command(name = "userdir-manager", version, about)]
struct Cli {
    /// Base URL of the directory API.
    #[arg(long, env = "USERDIR_API_URL", default_value = "https://jsonplaceholder.typicode.com")]
    api_url: String,

    /// Number of records requested per page.
    #[arg(long, env = "USERDIR_PAGE_SIZE", default_value_t = 6)]
    page_size: usize,

    /// Append logs to this file (the terminal itself belongs to the UI).
    #[arg(long, env = "USERDIR_LOG_FILE")]
    log_file: Option<String>,
}

/// Send tracing output to the given file, filtered by RUST_LOG. Without a
/// file, logging stays off.
fn init_tracing(log_file: Option<&str>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let settings = app::Settings {
        base_url: cli.api_url,
        page_size: cli.page_size.max(1),
    };

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, settings);

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
