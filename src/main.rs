//! Distributor Form - terminal form for distributor applications
//!
//! Collects contact details plus current, permanent and distribution
//! centre addresses, keeps "same as" sections in sync and submits the
//! validated application through a pluggable transmitter.

mod app;
mod config;
mod notify;
mod state;
mod transmit;
mod ui;

use anyhow::{Context, Result};
use app::App;
use config::AppConfig;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use state::ReferenceTable;
use std::fs;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::{
    fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};
use transmit::SimulatedTransmitter;

/// Log to the data directory when possible so the terminal UI stays clean
fn log_writer() -> BoxMakeWriter {
    let file = AppConfig::log_path().and_then(|path| {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });
    match file {
        Some(file) => BoxMakeWriter::new(Mutex::new(file)),
        None => BoxMakeWriter::new(io::stderr),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(log_writer()),
        )
        .init();

    let table = ReferenceTable::builtin().context("failed to load state/district table")?;
    let table = Arc::new(table);
    let transmitter = Arc::new(SimulatedTransmitter::from_config(&config));
    tracing::info!(
        states = table.state_count(),
        delay_ms = transmitter.delay().as_millis() as u64,
        "starting distributor form"
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let mut app = App::new(&config, table, transmitter);
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        tracing::error!("exiting after error: {err:?}");
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Pick up a finished transmission before drawing
        app.poll_submission();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit() {
            if app.submission.is_submitting() {
                tracing::warn!("quitting with a submission still in flight");
            }
            tracing::info!(attempts = app.submission.attempts(), "closing distributor form");
            return Ok(());
        }

        // Let the background transmission make progress
        tokio::task::yield_now().await;
    }
}
