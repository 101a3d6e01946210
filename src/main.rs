//! BLOCKFALL - terminal front end
//!
//! Draws the boards, maps keys to move events and drives the fall timer.

mod input;
mod ui;

use blockfall::{EventOutcome, GameController, MoveEvent, PlayerId, Settings};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use input::{Command, KeyMap};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;
use ui::Notification;

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Interval between survival points
const SURVIVAL_INTERVAL: Duration = Duration::from_secs(1);

/// Get the blockfall temp directory, creating it if needed
fn blockfall_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();

    // Setup tracing to log file
    let log_dir = blockfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blockfall=debug")),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let mut settings = Settings::load();

    let mut controller = GameController::with_size(
        settings.board.rows,
        settings.board.cols,
        settings.gameplay.difficulty,
    );
    controller.set_versus(settings.gameplay.versus);
    let keys = KeyMap::from_settings(&settings.keys);

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut controller, &keys);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    // Remember the last mode played
    settings.gameplay.difficulty = controller.difficulty();
    settings.gameplay.versus = controller.is_versus();
    if let Err(e) = settings.save() {
        tracing::warn!("Could not save settings: {}", e);
        eprintln!("Warning: Could not save settings: {}", e);
    }

    if result.is_ok() {
        println!("\nThanks for playing BLOCKFALL!");
        println!("Mode: {}", controller.difficulty().name());
        for player in controller.players() {
            if let Some(board) = controller.board(player) {
                println!("{:?} final score: {}", player, board.score().points());
            }
        }
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut GameController,
    keys: &KeyMap,
) -> io::Result<()> {
    let mut last_fall = Instant::now();
    let mut last_survival = Instant::now();
    let mut notification: Option<Notification> = None;

    loop {
        terminal.draw(|frame| ui::render_game(frame, controller, notification.as_ref()))?;

        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match keys.command_for(key, controller.is_versus()) {
                    Some(Command::Move(player, kind)) => {
                        let outcome = controller.handle_event(player, MoveEvent::user(kind));
                        if let Some(EventOutcome::Down(data)) = outcome {
                            if let Some(note) = clear_notification(player, data.clear.as_ref(), controller) {
                                notification = Some(note);
                            }
                        }
                    }
                    Some(Command::TogglePause) => controller.toggle_pause(),
                    Some(Command::NewGame) => {
                        controller.new_game();
                        notification = None;
                        last_fall = Instant::now();
                        last_survival = Instant::now();
                    }
                    Some(Command::ToggleVersus) => {
                        let versus = !controller.is_versus();
                        controller.set_versus(versus);
                        controller.new_game();
                        notification = None;
                    }
                    Some(Command::ToggleDifficulty) => {
                        controller.set_difficulty(controller.difficulty().toggled());
                    }
                    Some(Command::Quit) => return Ok(()),
                    None => {}
                }
            }
        }

        if controller.is_paused() || controller.is_over() {
            last_fall = Instant::now();
            last_survival = Instant::now();
            continue;
        }

        if last_fall.elapsed() >= controller.difficulty().fall_interval() {
            last_fall = Instant::now();
            for (player, data) in controller.tick() {
                if let Some(note) = clear_notification(player, data.clear.as_ref(), controller) {
                    notification = Some(note);
                }
            }
        }

        if last_survival.elapsed() >= SURVIVAL_INTERVAL {
            last_survival = Instant::now();
            controller.award_survival_point();
        }
    }
}

/// "+points" text for a lock that removed rows
fn clear_notification(
    player: PlayerId,
    clear: Option<&blockfall::ClearResult>,
    controller: &GameController,
) -> Option<Notification> {
    let clear = clear.filter(|c| c.lines_removed() > 0)?;
    let points = clear.score_bonus() * controller.difficulty().score_multiplier();
    Some(Notification::new(player, format!("+{}", points)))
}
