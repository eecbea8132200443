use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use std::fs::OpenOptions;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinError;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod actions;
mod app;
mod config;
mod project;
mod ui;

use actions::Action;
use app::App;
use config::Config;
use project::{Discoverer, ProjectDescriptor};
use ui::Ui;

fn main() -> Result<()> {
    init_logging();
    run_detached(run())?
}

/// Drive `future` on a fresh runtime, then drop the runtime without waiting
/// for blocking tasks that are still running, such as a discovery walk.
fn run_detached<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new()?;
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    Ok(output)
}

async fn run() -> Result<()> {
    let config = Config::load();
    let discoverer = Discoverer::new(config.discovery);

    // Create event channel
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();

    // Initialize terminal
    let mut terminal = ratatui::init();

    if let Ok((width, height)) = crossterm::terminal::size() {
        let _ = tx.send(Action::Resize(width, height));
    }

    // Spawn input handler
    let input_tx = tx.clone();
    tokio::spawn(async move {
        loop {
            if event::poll(Duration::from_millis(100)).unwrap_or(false) {
                let action = match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        Action::KeyPress(key)
                    }
                    Ok(Event::Resize(width, height)) => Action::Resize(width, height),
                    _ => continue,
                };
                if input_tx.send(action).is_err() {
                    break;
                }
            }
        }
    });

    // Initial scan
    spawn_discovery(&discoverer, tx.clone());

    let ui = Ui::default();
    let mut app = App::new();

    // Main event loop
    let result = loop {
        if let Err(e) = terminal.draw(|f| ui.render(&app, f)) {
            break Err(e.into());
        }

        let Some(action) = rx.recv().await else {
            break Ok(());
        };

        if let Err(e) = app.handle_action(action) {
            break Err(e);
        }
        if app.is_quitting() {
            break Ok(());
        }

        // Process any pending actions from the app
        for pending_action in app.take_pending_actions() {
            match pending_action {
                Action::RefreshProjects => {
                    info!("refreshing project list");
                    spawn_discovery(&discoverer, tx.clone());
                }
                Action::ProjectSelected(project) => {
                    info!(name = %project.name, path = %project.path.display(), "project selected");
                    let _ = tx.send(Action::Notify(format!("Selected {}", project.name)));
                }
                Action::CopyPath(path) => {
                    let text = path.display().to_string();
                    let message = match copy_to_clipboard(&text) {
                        Ok(()) => format!("Copied {}", text),
                        Err(e) => {
                            warn!("clipboard copy failed: {}", e);
                            format!("Failed to copy: {}", e)
                        }
                    };
                    let _ = tx.send(Action::Notify(message));
                }
                _ => {}
            }
        }
    };

    // Restore terminal
    ratatui::restore();
    result
}

/// Run discovery off the event loop and report back through `tx`
fn spawn_discovery(discoverer: &Discoverer, tx: UnboundedSender<Action>) {
    let discoverer = discoverer.clone();
    tokio::spawn(async move {
        info!("project discovery started");
        let result = discoverer.discover_in_background().await;
        let _ = tx.send(discovery_outcome(result));
    });
}

/// A finished scan loads the list; a crashed or cancelled one is fatal
fn discovery_outcome(result: Result<Vec<ProjectDescriptor>, JoinError>) -> Action {
    match result {
        Ok(projects) => Action::ProjectsLoaded(projects),
        Err(e) => {
            error!("discovery task failed: {}", e);
            Action::Fatal(format!("Project discovery failed: {}", e))
        }
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

/// Log to `<cache dir>/devflow/devflow.log`; the terminal belongs to the UI
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false);

    let log_file = dirs::cache_dir()
        .map(|dir| dir.join("devflow"))
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .and_then(|dir| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("devflow.log"))
                .ok()
        });

    match log_file {
        Some(file) => builder.with_writer(Mutex::new(file)).init(),
        None => builder.with_writer(std::io::sink).init(),
    }
}
