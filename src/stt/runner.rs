//! whisper-cli subprocess runner.
//!
//! Invokes the external engine with a fixed flag set over an encoded WAV
//! file, collects stdout/stderr separately, and post-processes the output:
//! strip the `[BLANK_AUDIO]` sentinel, trim whitespace.  A non-zero exit is
//! a hard fault carrying a truncated stderr excerpt; an *empty* transcript
//! is returned as-is — the coordinator treats that as "no speech", not as an
//! engine failure.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Whisper prints this marker when it hears nothing usable.
const BLANK_AUDIO_SENTINEL: &str = "[BLANK_AUDIO]";

/// Maximum stderr excerpt carried in an error message.
const STDERR_EXCERPT_LEN: usize = 200;

/// Style-guiding prompt handed to whisper via `--prompt`.
const STYLE_PROMPT: &str =
    "Use proper punctuation, capitalization, and sentence structure. \
     Format numbered lists clearly.";

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// Errors from the transcription subprocess.
#[derive(Debug, Error)]
pub enum SttError {
    /// The engine binary is not present at the configured path.
    #[error("whisper binary not found: {0}")]
    BinaryMissing(PathBuf),

    /// The model file is not present at the configured path.
    #[error("speech model not found: {0}")]
    ModelMissing(PathBuf),

    /// The subprocess could not be spawned at all.
    #[error("failed to start whisper: {0}")]
    Spawn(#[from] std::io::Error),

    /// The subprocess exited non-zero.
    #[error("whisper exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Async transcription over an on-disk WAV file.
///
/// Behind `Arc<dyn Transcriber>` so the coordinator can be tested with a
/// stub engine.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio at `wav_path`.
    ///
    /// An `Ok("")` means the engine ran fine but heard no speech.
    async fn transcribe(&self, wav_path: &Path) -> Result<String, SttError>;

    /// Verify the engine's on-disk resources exist.
    ///
    /// Run at startup and again right before each transcription attempt, so
    /// a binary or model deleted mid-session fails cleanly instead of with a
    /// confusing spawn error.
    fn check_resources(&self) -> Result<(), SttError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// WhisperCli
// ---------------------------------------------------------------------------

/// The production [`Transcriber`]: spawns whisper-cli per request.
pub struct WhisperCli {
    binary: PathBuf,
    model: PathBuf,
    language: String,
}

impl WhisperCli {
    pub fn new(binary: PathBuf, model: PathBuf, language: String) -> Self {
        Self {
            binary,
            model,
            language,
        }
    }

    /// Fixed argument set: no timestamps, forced language, suppressed
    /// diagnostics, style prompt.
    fn build_args(&self, wav_path: &Path) -> Vec<std::ffi::OsString> {
        vec![
            "-m".into(),
            self.model.as_os_str().to_owned(),
            "-f".into(),
            wav_path.as_os_str().to_owned(),
            "-nt".into(),
            "-l".into(),
            self.language.clone().into(),
            "-np".into(),
            "--prompt".into(),
            STYLE_PROMPT.into(),
        ]
    }
}

#[async_trait]
impl Transcriber for WhisperCli {
    async fn transcribe(&self, wav_path: &Path) -> Result<String, SttError> {
        self.check_resources()?;

        let args = self.build_args(wav_path);
        log::debug!("stt: {} {:?}", self.binary.display(), args);

        let output = Command::new(&self.binary)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output.status.code().unwrap_or(-1);
            log::error!("stt: whisper exited with code {code}");
            return Err(SttError::NonZeroExit {
                code,
                stderr: truncate(&stderr, STDERR_EXCERPT_LEN),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let text = postprocess(&stdout);
        log::debug!("stt: {} chars: {:?}", text.len(), truncate(&text, 80));
        Ok(text)
    }

    fn check_resources(&self) -> Result<(), SttError> {
        if !self.binary.exists() {
            return Err(SttError::BinaryMissing(self.binary.clone()));
        }
        if !self.model.exists() {
            return Err(SttError::ModelMissing(self.model.clone()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Output post-processing
// ---------------------------------------------------------------------------

/// Strip the no-speech sentinel and trim.  Empty output means silence.
fn postprocess(stdout: &str) -> String {
    stdout
        .trim()
        .replace(BLANK_AUDIO_SENTINEL, "")
        .trim()
        .to_string()
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
