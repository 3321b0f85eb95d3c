// sitefx - headless simulator for scroll-triggered page animations
//
// Loads a page (a TOML manifest or the built-in demo), scrolls a virtual
// viewport through it on a script, and reports what the page's one-shot
// animations do: counters ramping, skill rings filling, cards revealing.
//
// Architecture:
// - dom:       element tree with geometry and inline styles
// - observer:  intersection records for observed elements
// - animator:  binds elements to one-shot animations, runs them as timer tasks
// - session:   owns page + timers, plays the scroll script on tokio time
// - storage:   writes events to JSON Lines files for later analysis
// - Event flow: session -> printer task -> storage task over mpsc channels

mod animator;
mod cli;
mod config;
mod demo;
mod dom;
mod events;
mod logging;
mod observer;
mod scheduler;
mod session;
mod startup;
mod storage;

use anyhow::Result;
use chrono::Utc;
use cli::PageSource;
use config::Config;
use dom::PageManifest;
use events::{PageEvent, TrackedEvent};
use session::PageSession;
use storage::Storage;
use tokio::sync::{mpsc, oneshot};

/// Generate a unique session ID for log file naming
/// Format: YYYYMMDD-HHMMSS-XXXX (timestamp + 4 random hex chars)
fn generate_session_id() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
    let random = RandomState::new().build_hasher().finish();
    let short_hash = format!("{:04x}", random & 0xFFFF);

    format!("{}-{}", timestamp, short_hash)
}

/// Print events as they happen and pass them on to storage.
///
/// Per-tick text writes and raw intersection records only go to the log file;
/// the console gets the lifecycle.
async fn print_events(
    mut event_rx: mpsc::Receiver<PageEvent>,
    storage_tx: Option<mpsc::Sender<TrackedEvent>>,
    session_id: String,
) {
    while let Some(event) = event_rx.recv().await {
        match &event {
            PageEvent::TextChanged { .. } | PageEvent::Intersection { .. } => {
                tracing::trace!("{}", event.describe());
            }
            _ => println!("  [{:>6}ms] {}", event.at_ms(), event.describe()),
        }

        if let Some(tx) = &storage_tx {
            // Storage gone means its task failed; it already logged why
            let _ = tx.send(TrackedEvent::new(event, session_id.as_str())).await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Config commands are handled and exit here
    let Some(request) = cli::handle_cli() else {
        return Ok(());
    };

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let mut config = Config::from_env();

    // The guard must be kept alive for the duration of the program to ensure logs flush
    let _file_guard = logging::init(&config.logging);

    // --speed beats env and file
    if let Some(speed) = request.speed {
        if let Some(speed) = config::playback_speed(speed) {
            config.playback_speed = speed;
        } else {
            tracing::warn!(
                "Ignoring invalid --speed {}; using {}",
                speed,
                config.playback_speed
            );
        }
    }

    let manifest = match &request.page {
        PageSource::Demo => demo::demo_manifest()?,
        PageSource::Manifest(path) => PageManifest::load(path)?,
    };
    let title = match (&request.page, manifest.title.is_empty()) {
        (PageSource::Manifest(path), true) => path.display().to_string(),
        _ => manifest.title.clone(),
    };
    let viewport_height = manifest.viewport_height.unwrap_or(config.viewport_height);
    let script = manifest.scroll_script();
    let document = manifest.build_document();

    let session_id = generate_session_id();
    tracing::debug!("Session ID: {}", session_id);

    let storage_enabled = config.features.json_logging && request.storage;
    let info = startup::PlaybackInfo {
        title: &title,
        elements: document.len(),
        scroll_steps: script.len(),
        speed: config.playback_speed,
        storage: request.storage,
    };
    startup::print_startup(&config, &info);
    startup::log_startup(&config, &info);

    let mut session: PageSession = PageSession::new(document, viewport_height, &config)?;

    // Bounded channels: if a consumer falls behind, playback waits for it
    let (event_tx, event_rx) = mpsc::channel(1000);

    // Spawn the storage task (if enabled)
    let (storage_tx, storage_handle, log_path) = if storage_enabled {
        let (tx, rx) = mpsc::channel(1000);
        match Storage::new(&config.log_dir, &session_id, rx) {
            Ok(storage) => {
                let log_path = storage.log_path().to_path_buf();
                (Some(tx), Some(tokio::spawn(storage.run())), Some(log_path))
            }
            Err(e) => {
                tracing::error!("Event log disabled: {:?}", e);
                (None, None, None)
            }
        }
    } else {
        (None, None, None)
    };

    let printer = tokio::spawn(print_events(event_rx, storage_tx, session_id.clone()));

    // Ctrl+C stops playback between steps
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    let stats = session::run_script(
        &mut session,
        &script,
        event_tx,
        shutdown_rx,
        config.playback_speed,
    )
    .await;

    // The session dropped its sender: the printer drains, then storage does
    let _ = printer.await;
    if let Some(handle) = storage_handle {
        match handle.await {
            Ok(Ok(written)) => tracing::debug!("{} event(s) written", written),
            Ok(Err(e)) => tracing::error!("Storage error: {:?}", e),
            Err(e) => tracing::error!("Storage task failed: {}", e),
        }
    }

    println!();
    println!("  {}", stats.summary());
    if let Some(path) = log_path {
        println!("  Event log: {}", path.display());
    }
    println!();

    tracing::info!("Shutdown complete");
    Ok(())
}
