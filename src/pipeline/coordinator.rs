//! Pipeline coordinator — drives record → transcribe → proofread → paste.
//!
//! [`PipelineCoordinator`] owns the stage machine and responds to
//! [`HoldEdge`]s received over a `tokio::sync::mpsc` channel.
//!
//! # Pipeline flow
//!
//! ```text
//! HoldEdge::Start
//!   └─▶ open audio session, stage = Recording
//!
//! HoldEdge::End
//!   └─▶ close session
//!         ├─ shorter than min_recording_ms → discard, stage = Idle
//!         └─ encode WAV to a temp file
//!               ├─▶ whisper-cli subprocess        [Transcribing]
//!               ├─▶ Ollama proofread + gate       [Cleaning]
//!               ├─▶ spawn_blocking(paste)         [Pasting]
//!               └─▶ stage = Done (auto-hides to Idle)
//! any fault ──▶ stage = Error (auto-hides to Idle, slower)
//! ```
//!
//! The temp WAV lives in a [`tempfile::NamedTempFile`] scoped to one cycle:
//! every exit path, success or fault, drops it and deletes the file.
//! Blocking work (WAV encode, clipboard I/O) runs on
//! `tokio::task::spawn_blocking` so the async runtime never stalls.

use std::sync::Arc;
use std::time::Duration;

use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::audio::{f32_to_i16, write_wav, SessionAudio, SharedSession};
use crate::config::{AppConfig, AudioConfig, TimingConfig};
use crate::hotkey::HoldEdge;
use crate::llm::Proofreader;
use crate::paste::Paster;
use crate::stt::{SttError, Transcriber};

use super::stage::{PipelineStage, StatusEvent};

// ---------------------------------------------------------------------------
// PipelineFault
// ---------------------------------------------------------------------------

/// Everything that can end a dictation cycle in the `Error` stage.
///
/// Variants carry a human-readable description; the status channel shows it
/// verbatim, so messages are written for the person at the keyboard.
#[derive(Debug, Error)]
pub enum PipelineFault {
    /// The session closed with no audio in it (mic unplugged, capture
    /// thread dead, permission revoked).
    #[error("no audio captured: {0}")]
    Input(String),

    /// whisper-cli binary or model missing on disk.
    #[error("{0}")]
    ResourceMissing(String),

    /// The engine ran fine but produced an empty transcript.
    #[error("no speech detected")]
    NoSpeech,

    /// whisper-cli failed to spawn or exited non-zero.
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// Ollama unreachable, timed out, or the quality gate rejected the
    /// response.
    #[error("proofreading failed: {0}")]
    Proofread(String),

    /// Clipboard or keystroke simulation failed.
    #[error("paste failed: {0}")]
    Paste(String),

    /// Runtime trouble (task join, temp file I/O).
    #[error("internal error: {0}")]
    Internal(String),
}

fn fault_from_stt(e: SttError) -> PipelineFault {
    match e {
        SttError::BinaryMissing(_) | SttError::ModelMissing(_) => {
            PipelineFault::ResourceMissing(e.to_string())
        }
        other => PipelineFault::Transcription(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// PipelineCoordinator
// ---------------------------------------------------------------------------

/// Owns the stage machine and the collaborators behind trait objects.
pub struct PipelineCoordinator {
    stage: PipelineStage,
    session: SharedSession,
    transcriber: Arc<dyn Transcriber>,
    proofreader: Arc<dyn Proofreader>,
    paster: Arc<dyn Paster>,
    status_tx: mpsc::Sender<StatusEvent>,
    audio: AudioConfig,
    timing: TimingConfig,
}

impl PipelineCoordinator {
    pub fn new(
        session: SharedSession,
        transcriber: Arc<dyn Transcriber>,
        proofreader: Arc<dyn Proofreader>,
        paster: Arc<dyn Paster>,
        status_tx: mpsc::Sender<StatusEvent>,
        config: &AppConfig,
    ) -> Self {
        Self {
            stage: PipelineStage::Idle,
            session,
            transcriber,
            proofreader,
            paster,
            status_tx,
            audio: config.audio.clone(),
            timing: config.timing.clone(),
        }
    }

    /// Main loop: consume hold edges until the channel closes.
    ///
    /// A single timer drives the `Done`/`Error` auto-hide; it is armed when
    /// a cycle ends and disarmed when a new hold starts, so a fresh
    /// recording is never cut short by the previous cycle's hide.
    pub async fn run(mut self, mut edges: mpsc::Receiver<HoldEdge>) {
        let mut hide_at = Instant::now();
        let mut hide_armed = false;

        loop {
            tokio::select! {
                edge = edges.recv() => match edge {
                    Some(HoldEdge::Start) => {
                        if self.on_hold_start().await {
                            hide_armed = false;
                        }
                    }
                    Some(HoldEdge::End) => {
                        if let Some(linger) = self.on_hold_end().await {
                            hide_at = Instant::now() + linger;
                            hide_armed = true;
                        }
                    }
                    None => break,
                },
                _ = time::sleep_until(hide_at), if hide_armed => {
                    hide_armed = false;
                    self.set_stage(PipelineStage::Idle).await;
                }
            }
        }
        log::debug!("pipeline: hold-edge channel closed, coordinator exiting");
    }

    /// Begin a recording.  Returns `true` when a session actually opened;
    /// starts while a cycle is still in flight are ignored.
    async fn on_hold_start(&mut self) -> bool {
        if self.stage.is_busy() {
            log::warn!("pipeline: hold start ignored while {}", self.stage);
            return false;
        }
        if let Ok(mut session) = self.session.lock() {
            session.start();
        }
        self.set_stage(PipelineStage::Recording).await;
        true
    }

    /// Close the recording and run the rest of the pipeline.
    ///
    /// Returns how long the terminal stage should linger before auto-hiding,
    /// or `None` when nothing needs hiding (ignored edge, short discard).
    async fn on_hold_end(&mut self) -> Option<Duration> {
        if self.stage != PipelineStage::Recording {
            log::debug!("pipeline: hold end ignored while {}", self.stage);
            return None;
        }

        let audio = self.session.lock().ok().and_then(|mut s| s.finish());
        let audio = match audio {
            Some(a) if !a.samples.is_empty() => a,
            _ => {
                let fault = PipelineFault::Input("no frames reached the session".into());
                return Some(self.fail(fault).await);
            }
        };

        if audio.samples.len() < self.audio.min_samples() {
            log::info!(
                "pipeline: recording too short ({:.0} ms), discarded",
                audio.duration_secs * 1_000.0
            );
            self.set_stage(PipelineStage::Idle).await;
            return None;
        }

        match self.process(audio).await {
            Ok(()) => {
                self.set_stage(PipelineStage::Done).await;
                Some(Duration::from_millis(self.timing.done_hide_ms))
            }
            Err(fault) => Some(self.fail(fault).await),
        }
    }

    /// Transcribe, proofread and paste one closed session.
    async fn process(&mut self, audio: SessionAudio) -> Result<(), PipelineFault> {
        // Catch a binary/model deleted mid-session before spawning anything.
        self.transcriber.check_resources().map_err(fault_from_stt)?;

        // Holds the WAV for exactly this cycle; dropped (and deleted) on
        // every path out of this function.
        let wav = self.encode_to_temp(audio).await?;

        self.set_stage(PipelineStage::Transcribing).await;
        let raw = self
            .transcriber
            .transcribe(wav.path())
            .await
            .map_err(fault_from_stt)?;
        if raw.is_empty() {
            return Err(PipelineFault::NoSpeech);
        }
        log::debug!("pipeline: transcript of {} chars", raw.chars().count());

        self.set_stage(PipelineStage::Cleaning).await;
        let cleaned = self
            .proofreader
            .proofread(&raw)
            .await
            .map_err(|e| PipelineFault::Proofread(e.to_string()))?;

        self.set_stage(PipelineStage::Pasting).await;
        let paster = Arc::clone(&self.paster);
        let text = cleaned.clone();
        tokio::task::spawn_blocking(move || paster.paste(&text))
            .await
            .map_err(|e| PipelineFault::Internal(e.to_string()))?
            .map_err(|e| PipelineFault::Paste(e.to_string()))?;

        log::info!("pipeline: pasted {} chars", cleaned.chars().count());
        Ok(())
    }

    /// Encode the session to 16-bit mono WAV in a self-deleting temp file.
    async fn encode_to_temp(&self, audio: SessionAudio) -> Result<NamedTempFile, PipelineFault> {
        let sample_rate = self.audio.sample_rate;
        tokio::task::spawn_blocking(move || {
            let pcm = f32_to_i16(&audio.samples);
            let file = tempfile::Builder::new()
                .prefix("hold-to-type-")
                .suffix(".wav")
                .tempfile()
                .map_err(|e| PipelineFault::Internal(format!("temp wav: {e}")))?;
            write_wav(file.path(), &pcm, sample_rate)
                .map_err(|e| PipelineFault::Internal(format!("temp wav: {e}")))?;
            Ok(file)
        })
        .await
        .map_err(|e| PipelineFault::Internal(e.to_string()))?
    }

    async fn fail(&mut self, fault: PipelineFault) -> Duration {
        log::error!("pipeline: {fault}");
        self.stage = PipelineStage::Error;
        let _ = self
            .status_tx
            .send(StatusEvent::error(fault.to_string()))
            .await;
        Duration::from_millis(self.timing.error_hide_ms)
    }

    async fn set_stage(&mut self, stage: PipelineStage) {
        log::debug!("pipeline: {} -> {}", self.stage, stage);
        self.stage = stage;
        let _ = self.status_tx.send(StatusEvent::stage(stage)).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
