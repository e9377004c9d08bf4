mod app;
mod ui;

use anyhow::{Context, Result};
use companion_core::{CompanionConfig, ScriptedCapture, SpeechCapture, UnavailableCapture};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_millis(50);

fn init_logging() -> Result<()> {
    let path = std::env::var("COMPANION_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("companion.log"));
    let file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config() -> Result<CompanionConfig> {
    match std::env::var("COMPANION_CONFIG") {
        Ok(path) => CompanionConfig::load(&path).with_context(|| format!("failed to load {path}")),
        Err(_) => Ok(CompanionConfig::default()),
    }
}

/// A terminal has no microphone; a demo transcript stands in for one.
fn speech_capture() -> Box<dyn SpeechCapture> {
    match std::env::var("COMPANION_DEMO_TRANSCRIPT") {
        Ok(transcript) if !transcript.trim().is_empty() => {
            Box::new(ScriptedCapture::from_transcript(&transcript))
        }
        _ => Box::new(UnavailableCapture),
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut app::App) -> Result<()> {
    app.start();

    while !app.should_quit {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Timer deliveries and capture callbacks
        let _ = tokio::time::timeout(FRAME, app.driver.next_delivery()).await;
        app.sync();

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
        app.sync();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    let config = load_config()?;
    tracing::info!(?config, "starting companion");

    let mut app = app::App::new(&config, speech_capture());
    if let Ok(dir) = std::env::var("COMPANION_EXPORT_DIR") {
        app.export_dir = PathBuf::from(dir);
    }
    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut app).await;
    restore_terminal(&mut terminal)?;

    if let Err(err) = &result {
        tracing::error!(%err, "companion exited with error");
    }
    result
}
