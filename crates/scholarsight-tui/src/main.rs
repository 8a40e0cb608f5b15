use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use scholarsight_core::{Config, GeminiClient, Overrides, PaperAssistant, PaperFile};

mod action;
mod app;
mod backend;
mod input;
mod model;
mod theme;
mod tui_event;
mod view;

use app::{App, Effect};

/// ScholarSight TUI: upload a research paper and get a structured breakdown.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// PDF to select on startup
    pdf: Option<PathBuf>,

    /// Gemini API key (overrides GEMINI_API_KEY / API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Model used for paper analysis
    #[arg(long)]
    explain_model: Option<String>,

    /// Model used to simplify selected text
    #[arg(long)]
    rephrase_model: Option<String>,

    /// Path to a config file (default: <config dir>/scholarsight/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write logs (default: <cache dir>/scholarsight/tui.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Resolve config from CLI flags > env vars > config file > defaults
    let overrides = Overrides {
        api_key: args.api_key,
        explain_model: args.explain_model,
        rephrase_model: args.rephrase_model,
        endpoint: None,
    };
    let config = Config::load(overrides, args.config.as_deref())?;

    let log_path = args.log_file.or_else(default_log_path);
    init_logging(log_path.as_deref())?;
    tracing::info!(
        explain_model = %config.explain_model,
        rephrase_model = %config.rephrase_model,
        "starting"
    );

    let client = GeminiClient::new(&config)?;
    let assistant = Arc::new(PaperAssistant::new(client, &config));

    let mut app = App::new();
    if let Some(path) = &args.pdf {
        let file = PaperFile::from_path(path)
            .with_context(|| format!("PDF file not found: {}", path.display()))?;
        app.session.set_file(file)?;
    }

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let size = terminal.size()?;
    app.update(action::Action::Resize(size.width, size.height));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        let mode = app.input_mode();
        let effect = tokio::select! {
            // Backend events (non-blocking drain)
            Some(backend_event) = rx.recv() => {
                app.handle_backend_event(backend_event);
                while let Ok(evt) = rx.try_recv() {
                    app.handle_backend_event(evt);
                }
                None
            }
            // Terminal input events
            maybe_action = async {
                if event::poll(tick_rate).unwrap_or(false) {
                    event::read().ok().map(|evt| input::map_event(&evt, mode))
                } else {
                    None
                }
            } => maybe_action.and_then(|action| app.update(action)),
        };

        match effect {
            Some(Effect::Analyze(ticket)) => {
                backend::spawn_analysis(Arc::clone(&assistant), ticket, tx.clone());
            }
            Some(Effect::Rephrase(ticket)) => {
                backend::spawn_rephrase(Arc::clone(&assistant), ticket, tx.clone());
            }
            None => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    Ok(())
}

fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("scholarsight").join("tui.log"))
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,scholarsight_core=info,scholarsight_tui=info"));

    let Some(path) = path else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::sink)
            .init();
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
