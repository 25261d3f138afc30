//! Application entry point — hold-to-type.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns defaults on first run).
//! 3. Create the tokio runtime (multi-thread, 2 workers).
//! 4. Build the whisper-cli transcriber and Ollama proofreader from config.
//! 5. Run the startup health check (mic, whisper resources, Ollama).
//! 6. Start cpal capture + the audio feed thread into the shared session.
//! 7. Spawn the global key hook and the hold classifier.
//! 8. Run the pipeline coordinator on the main task — blocks forever.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use hold_to_type::{
    audio::{new_shared_session, spawn_feed_thread, CaptureHandle, MicCapture},
    config::{AppConfig, AppPaths},
    health,
    hotkey::{parse_key, run_classifier, KeyHook},
    llm::OllamaProofreader,
    paste::ClipboardPaster,
    pipeline::{PipelineCoordinator, StatusEvent},
    stt::{Transcriber, WhisperCli},
};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("hold-to-type starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("failed to load settings ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (2 workers — subprocess I/O and the HTTP client)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    rt.block_on(run(config))
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let paths = AppPaths::new();

    // 4. Collaborators behind the pipeline's trait seams
    let transcriber: Arc<dyn Transcriber> = Arc::new(WhisperCli::new(
        config.stt.binary_path(&paths),
        config.stt.model_path(&paths),
        config.stt.language.clone(),
    ));
    let proofreader = Arc::new(OllamaProofreader::from_config(&config.llm));
    let paster = Arc::new(ClipboardPaster::new());

    // 5. Health check — log-only, the app still launches with legs down
    health::run_health_check(transcriber.as_ref(), &proofreader).await;

    // 6. Capture → feed thread → shared session buffer
    let session = new_shared_session(config.audio.sample_rate);
    let _capture = start_capture(&session, config.audio.sample_rate);

    // 7. Key hook + hold classifier
    let trigger = parse_key(&config.hotkey.trigger_key).unwrap_or_else(|| {
        log::warn!(
            "unknown trigger key {:?}; falling back to AltGr",
            config.hotkey.trigger_key
        );
        rdev::Key::AltGr
    });
    log::info!(
        "listening for {:?} (hold {} ms to record)",
        trigger,
        config.hotkey.grace_ms
    );

    let (key_tx, key_rx) = mpsc::channel(256);
    let (edge_tx, edge_rx) = mpsc::channel(16);
    let _hook = KeyHook::start(key_tx);
    tokio::spawn(run_classifier(
        trigger,
        Duration::from_millis(config.hotkey.grace_ms),
        key_rx,
        edge_tx,
    ));

    // Status consumer: one log line per stage transition.
    let (status_tx, mut status_rx) = mpsc::channel::<StatusEvent>(32);
    tokio::spawn(async move {
        while let Some(ev) = status_rx.recv().await {
            match &ev.message {
                Some(msg) => log::info!("[{}] {msg}", ev.stage),
                None => log::info!("[{}]", ev.stage),
            }
        }
    });

    // 8. The coordinator runs until the edge channel closes, i.e. forever.
    let coordinator = PipelineCoordinator::new(
        session,
        transcriber,
        proofreader,
        paster,
        status_tx,
        &config,
    );
    coordinator.run(edge_rx).await;
    Ok(())
}

/// Open the default microphone and wire it into the session buffer.
///
/// Returns `None` (after a warning) when no device is available, so the app
/// still starts on a machine without a mic; the pipeline reports the missing
/// audio per-cycle.
fn start_capture(
    session: &hold_to_type::audio::SharedSession,
    sample_rate: u32,
) -> Option<CaptureHandle> {
    let capture = match MicCapture::new() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("microphone unavailable: {e}");
            return None;
        }
    };

    let (block_tx, block_rx) = std::sync::mpsc::channel();
    if let Err(e) = spawn_feed_thread(block_rx, session.clone(), sample_rate) {
        log::warn!("could not start audio feed thread: {e}");
        return None;
    }

    match capture.start(block_tx) {
        Ok(handle) => {
            log::info!(
                "capture started ({} Hz, {} ch, resampled to {} Hz mono)",
                capture.sample_rate(),
                capture.channels(),
                sample_rate
            );
            Some(handle)
        }
        Err(e) => {
            log::warn!("could not start audio stream: {e}");
            None
        }
    }
}
