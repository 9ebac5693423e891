use clap::Parser;
use crossterm::terminal;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod config;
mod input;
mod player;
mod render;
mod terminal_setup;
mod world;

use config::{Cli, Settings};
use input::state::SharedState;
use input::thread::{spawn_input_thread, TerminalKeys};
use render::frame::run_app_loop;
use render::AppState;
use terminal_setup::{cleanup_terminal, install_panic_hook, prepare_terminal};
use world::Map;

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Stdout carries the frame, so logs only go to a file when asked for.
fn init_logging(path: Option<&Path>) -> AppResult<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .map_err(|err| format!("cannot open log file {}: {err}", path.display()))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> AppResult<()> {
    install_panic_hook();
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let map = Arc::new(Map::default_level()?);
    let settings = Settings::from_cli(&cli, &map, terminal::size().ok())?;
    tracing::info!(
        width = settings.screen.0,
        height = settings.screen.1,
        fov = settings.projection.fov,
        depth = settings.projection.depth,
        x = settings.spawn.x,
        y = settings.spawn.y,
        "starting renderer"
    );

    let shared = Arc::new(SharedState::new(settings.spawn, settings.show_hud));
    let mut stdout = BufWriter::with_capacity(64 * 1024, io::stdout());
    prepare_terminal(&mut stdout)?;

    // The input thread is left detached: it ends itself on quit or on a read
    // error, and otherwise dies with the process.
    let signals = match spawn_input_thread(
        TerminalKeys,
        Arc::clone(&shared),
        Arc::clone(&map),
        settings.speeds,
    ) {
        Ok((signals, _handle)) => signals,
        Err(err) => {
            let _ = cleanup_terminal(&mut stdout);
            return Err(err.into());
        }
    };

    let mut app_state = AppState::new(
        map,
        shared,
        settings.projection,
        settings.screen,
        settings.frame_target,
    );
    let run_result = run_app_loop(&mut app_state, &signals, &mut stdout);
    let cleanup_result = cleanup_terminal(&mut stdout);

    if let Err(err) = &run_result {
        tracing::error!(%err, "render loop aborted");
    }
    run_result?;
    cleanup_result
}
