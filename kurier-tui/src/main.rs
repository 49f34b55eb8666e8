//! Terminal UI for kurier that lets a courier pick, order, and deliver stops and hand
//! the route off to a maps app.

mod app;
mod cli;
mod input;
mod logging;
mod map;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use kurier_core::{
    error::CourierError,
    ports::LocationPort,
    service::{ResolvedPosition, StopListController},
};
use kurier_provider_location::{PermissionGate, location_port};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::app::{App, Prompt, StatusKind};
use crate::cli::Cli;
use crate::input::Action;
use crate::map::TerminalMap;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        logging::init_logging(path, cli.verbosity.tracing_level_filter())?;
    }

    // HTTP + location setup
    let client = Client::builder()
        .user_agent("kurier/0.1")
        .timeout(cli.lookup_timeout())
        .build()?;
    let gate = location_port(client, cli.location_source(), cli.grant_location);
    let location: Arc<dyn LocationPort> = Arc::<PermissionGate>::clone(&gate);

    // App state
    let mut controller = StopListController::new(TerminalMap::new(), location, cli.camera());
    let outcome = controller.load_asset_file(&cli.stops);
    let mut app = App::new(controller, gate, !cli.no_open);
    app.report_load(&outcome);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    let (positions_tx, mut positions_rx) = mpsc::unbounded_channel();

    loop {
        // Position answers arrive from spawned lookups
        drain_positions(&mut app, &mut positions_rx);

        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::Navigate => start_navigation(&mut app, &positions_tx),
            }
        }
    }

    Ok(())
}

fn start_navigation(app: &mut App, positions_tx: &UnboundedSender<ResolvedPosition>) {
    let Some(lookup) = app.controller.request_navigation() else {
        app.notify(StatusKind::Error, "Check at least one stop to navigate");
        return;
    };

    app.notify(StatusKind::Busy, "Locating…");
    let tx = positions_tx.clone();
    tokio::spawn(async move {
        let resolved = lookup.resolve().await;
        if tx.send(resolved).is_err() {
            debug!("UI closed before the position lookup finished");
        }
    });
}

fn drain_positions(app: &mut App, positions_rx: &mut UnboundedReceiver<ResolvedPosition>) {
    while let Ok(resolved) = positions_rx.try_recv() {
        match app.controller.complete_navigation(resolved) {
            Ok(Some(request)) => app.hand_off(&request),
            Ok(None) => app.notify(StatusKind::Error, "Check at least one stop to navigate"),
            // Superseded by a newer request or a list change; already logged.
            Err(CourierError::StaleLookup) => {}
            Err(err) if err.is_permission_denied() => {
                app.prompt = Some(Prompt::LocationPermission);
            }
            Err(err) => app.report(&err),
        }
    }
}
