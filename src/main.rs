//! exercast - find the best hours for outdoor exercise
//!
//! A terminal UI application that fetches the hourly forecast for a location,
//! scores every hour for outdoor exercise, and ranks the best upcoming ones.

mod app;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::process;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use app::{App, AppState};
use exercast::advice::{Label, Language};
use exercast::cache::CacheManager;
use exercast::cli::{Cli, StartupConfig};

/// Log file written in the cache directory while the TUI owns the screen
const LOG_FILE: &str = "exercast.log";

/// How often the analysis is recomputed against the wall clock
const REANALYZE_INTERVAL: Duration = Duration::from_secs(60);

/// Sets up a panic hook that restores the terminal before printing the panic message.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("exercast=info"))
}

/// Initializes tracing. Plain mode logs to stderr; the TUI logs to a file so
/// output never lands on the alternate screen.
fn init_logging(config: &StartupConfig) {
    if config.plain {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(io::stderr)
            .try_init();
        return;
    }

    let Some(cache) = CacheManager::new() else {
        return;
    };
    if cache.ensure_dir().is_err() {
        return;
    }

    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(cache.dir().join(LOG_FILE))
    {
        Ok(file) => file,
        Err(_) => return,
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    match &app.state {
        AppState::Loading => {
            render_loading(frame, app.language);
        }
        AppState::Forecast => {
            ui::render_forecast(frame, app);
        }
        AppState::Failed(message) => {
            ui::render_error(frame, message, app.language);
        }
    }

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Renders a loading message while data is being fetched
fn render_loading(frame: &mut ratatui::Frame, language: Language) {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Color, Style},
        widgets::Paragraph,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(frame.area());

    let loading_text = Paragraph::new(language.label(Label::Loading))
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Fetches once and prints the text report
async fn run_plain(config: StartupConfig) {
    let mut app = App::new(config);
    app.load().await;

    match &app.state {
        AppState::Failed(message) => {
            eprintln!("Error: {}", message);
            process::exit(1);
        }
        _ => println!("{}", app.report()),
    }
}

async fn run_tui(config: StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    setup_panic_hook();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    terminal.draw(|f| render_ui(f, &app))?;
    app.load().await;
    let mut last_analysis = Instant::now();

    loop {
        terminal.draw(|f| render_ui(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }

        if app.refresh_requested {
            app.state = AppState::Loading;
            terminal.draw(|f| render_ui(f, &app))?;
            app.load().await;
            last_analysis = Instant::now();
        } else if last_analysis.elapsed() >= REANALYZE_INTERVAL {
            app.reanalyze(Utc::now());
            last_analysis = Instant::now();
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Validate arguments before touching the terminal or the network
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    init_logging(&config);
    tracing::debug!(?config, "Starting exercast");

    if config.plain {
        run_plain(config).await;
        return Ok(());
    }

    run_tui(config).await
}
