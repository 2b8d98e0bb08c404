use std::io::{self, stdout, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use crossbeam_channel::{Receiver, TryRecvError};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use taskdeck::app::LogicThread;
use taskdeck::config::Config;
use taskdeck::render::RenderState;
use taskdeck::session::SessionStore;
use taskdeck::{tlog, ui, Result};

const FRAME_DURATION: Duration = Duration::from_micros(16_666); // 60fps

/// Taskdeck - terminal kanban client for a shared task board
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    TASKDECK_DEBUG=1     Enable debug logging (alternative to --debug)\n    TASKDECK_DIR=<path>  Override the state directory (default ~/.taskdeck)")]
pub struct Cli {
    /// Enable debug logging (writes to ~/.taskdeck/taskdeck.log)
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Backend base URL (overrides the configured value)
    #[arg(long)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Discard the stored session token
    Logout,

    /// Show the configured backend and session state
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    taskdeck::log::init_with_debug(cli.debug);

    match cli.command {
        Some(Command::Logout) => {
            return run_logout();
        }
        Some(Command::Status) => {
            return run_status(cli.base_url);
        }
        None => {
            // No subcommand: launch the TUI
        }
    }

    if cli.debug {
        tlog!("Taskdeck starting (debug mode enabled)");
    } else {
        tlog!("Taskdeck starting");
    }

    let mut config = Config::load()?;
    if cli.base_url.is_some() {
        config.base_url = cli.base_url;
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    let (state_tx, state_rx) = crossbeam_channel::bounded::<RenderState>(1);

    let shutdown_clone = shutdown.clone();
    let logic_handle = thread::spawn(move || LogicThread::run(config, state_tx, shutdown_clone));

    let mut terminal = setup_terminal()?;
    let result = render_loop(&mut terminal, state_rx, &shutdown);

    shutdown.store(true, Ordering::SeqCst);
    let _ = logic_handle.join();
    restore_terminal(&mut terminal)?;
    result
}

fn run_logout() -> Result<()> {
    let session = SessionStore::load()?;
    if session.is_authenticated() {
        session.clear();
        println!("Logged out.");
    } else {
        println!("No stored session.");
    }
    Ok(())
}

fn run_status(base_url_override: Option<String>) -> Result<()> {
    let mut config = Config::load()?;
    if base_url_override.is_some() {
        config.base_url = base_url_override;
    }
    let session = SessionStore::load()?;

    println!("Backend:  {}", config.effective_base_url());
    println!(
        "Session:  {}",
        if session.is_authenticated() {
            "token stored"
        } else {
            "not logged in"
        }
    );
    Ok(())
}

/// Render loop: consumes RenderState snapshots and draws at most once
/// per frame, and only when the version moved.
fn render_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state_rx: Receiver<RenderState>,
    shutdown: &AtomicBool,
) -> Result<()> {
    let mut state = RenderState::default();
    let mut last_version: u64 = 0;
    let mut last_frame = Instant::now();
    let mut dirty = true;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match state_rx.try_recv() {
            Ok(s) => {
                dirty = dirty || s.version != last_version;
                state = s;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        if last_frame.elapsed() < FRAME_DURATION {
            thread::sleep(Duration::from_micros(500));
            continue;
        }
        last_frame = Instant::now();

        if dirty {
            terminal.draw(|f| ui::draw(f, &state))?;
            last_version = state.version;
            dirty = false;
        }
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(disable_raw_mode()?)
}
