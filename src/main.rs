mod app;
mod cli;
mod config;
mod datasources;
mod error;
mod logic;
mod models;
mod ui;

use anyhow::Context;
use app::{App, InputMode, ViewState};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use datasources::WeatherApiClient;
use logic::{FetchCommand, FetchEvent, FetchService};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;
use ui::screens::{DashboardScreen, ErrorScreen, LoadingScreen};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let tui = cli.command.is_none();
    init_logging(cli.verbose, log_target(cli.log_file.as_ref(), tui))?;

    let mut config = match Config::load(cli.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!(
                "Set WEATHER_API_KEY or copy config/config.yaml.example to config/config.yaml"
            );
            std::process::exit(1);
        }
    };
    if let Some(unit) = cli.unit {
        config.dashboard.unit = unit;
    }

    if cli.command == Some(Commands::Check) {
        return run_check(&config).await;
    }

    let client =
        WeatherApiClient::new(config.weatherapi.clone()).context("Failed to build HTTP client")?;
    let debounce = Duration::from_millis(config.dashboard.suggestion_debounce_ms);
    let (fetcher, mut events) = FetchService::new(client, debounce);

    let mut app = App::new(&config, cli.city.as_deref());
    fetcher.spawn_forecast(app.initial_request());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &fetcher, &mut events);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Where tracing output goes.
#[derive(Debug, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    File(PathBuf),
    Discard,
}

/// The TUI owns the terminal, so it never logs to stderr.
fn log_target(log_file: Option<&PathBuf>, tui: bool) -> LogTarget {
    match log_file {
        Some(path) => LogTarget::File(path.clone()),
        None if !tui => LogTarget::Stderr,
        None => dirs::data_local_dir()
            .map(|dir| LogTarget::File(dir.join("weatherdash").join("weatherdash.log")))
            .unwrap_or(LogTarget::Discard),
    }
}

fn init_logging(verbose: u8, target: LogTarget) -> anyhow::Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match target {
        LogTarget::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory {}", parent.display())
                })?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        LogTarget::Stderr => builder.with_writer(io::stderr).init(),
        LogTarget::Discard => builder.with_writer(io::sink).init(),
    }

    Ok(())
}

async fn run_check(config: &Config) -> anyhow::Result<()> {
    println!("Configuration OK");
    println!("  base_url: {}", config.weatherapi.base_url);
    println!("  default city: {}", config.dashboard.default_city);

    let client = WeatherApiClient::new(config.weatherapi.clone())?;
    match client.test_connection(&config.dashboard.default_city).await {
        Ok(true) => println!("WeatherAPI: OK"),
        Ok(false) => {
            println!("WeatherAPI: request rejected - check the API key");
            std::process::exit(1);
        }
        Err(e) => {
            println!("WeatherAPI: OFFLINE ({})", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    fetcher: &FetchService,
    events: &mut UnboundedReceiver<FetchEvent>,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        // Short poll so fetch results show up promptly
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(command) = handle_key(app, key) {
                        fetcher.dispatch(command);
                    }
                    // Debounced searches the key made obsolete never go out
                    fetcher.supersede_suggestions(app.suggestion_generation());
                }
            }
        }

        while let Ok(event) = events.try_recv() {
            app.handle_fetch_event(event);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    match &app.view {
        ViewState::Loading => {
            frame.render_widget(LoadingScreen::new(&app.selected_city), area);
        }
        ViewState::Error(message) => {
            frame.render_widget(ErrorScreen::new(message, app.default_city()), area);
        }
        ViewState::Data(snapshot) => {
            let screen = DashboardScreen::new(snapshot, app.unit)
                .hourly_limit(app.hourly_limit)
                .with_search(&app.search_input, app.input_mode == InputMode::Search)
                .with_suggestions(&app.suggestions, app.highlighted)
                .with_status(app.status_message.as_deref());
            frame.render_widget(screen, area);
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Option<FetchCommand> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return None;
    }

    match app.input_mode {
        InputMode::Search => handle_search_input(app, key.code),
        InputMode::Normal => handle_normal_input(app, key.code),
    }
}

fn handle_normal_input(app: &mut App, code: KeyCode) -> Option<FetchCommand> {
    match code {
        KeyCode::Char('q') => {
            app.quit();
            None
        }
        KeyCode::Char('/') | KeyCode::Char('s') if app.view.snapshot().is_some() => {
            app.enter_search_mode();
            None
        }
        KeyCode::Char('u') => {
            app.toggle_unit();
            None
        }
        KeyCode::Char('r') | KeyCode::Enter => match app.view {
            ViewState::Error(_) => Some(FetchCommand::Forecast(app.retry())),
            ViewState::Data(_) => app.refresh().map(FetchCommand::Forecast),
            ViewState::Loading => None,
        },
        _ => None,
    }
}

fn handle_search_input(app: &mut App, code: KeyCode) -> Option<FetchCommand> {
    match code {
        KeyCode::Esc => {
            app.leave_search_mode();
            None
        }
        KeyCode::Enter => app.confirm_search().map(FetchCommand::Forecast),
        KeyCode::Up => {
            app.highlight_prev();
            None
        }
        KeyCode::Down => {
            app.highlight_next();
            None
        }
        KeyCode::Backspace => app.pop_search_char().map(FetchCommand::Suggestions),
        KeyCode::Char(c) => app.push_search_char(c).map(FetchCommand::Suggestions),
        _ => None,
    }
}
