//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they round-trip through `settings.toml` and can be shared across
//! threads.  Defaults carry the tuned timing and gate constants; the file
//! only needs the fields the user actually changed (`serde(default)`).

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::llm::QualityGate;

use super::AppPaths;

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

/// Trigger key and hold-detection timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Key name parsed by [`crate::hotkey::parse_key`] (e.g. `"AltGr"`,
    /// `"F9"`, `"CapsLock"`).
    pub trigger_key: String,
    /// Continuous-down time before a press counts as a hold, in ms.
    pub grace_ms: u64,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            trigger_key: "AltGr".into(),
            grace_ms: 150,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Capture and session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Session sample rate in Hz; capture is resampled to this.
    pub sample_rate: u32,
    /// Recordings shorter than this are discarded without transcription.
    pub min_recording_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            min_recording_ms: 400,
        }
    }
}

impl AudioConfig {
    /// Minimum sample count implied by `min_recording_ms`.
    pub fn min_samples(&self) -> usize {
        (self.sample_rate as u64 * self.min_recording_ms / 1_000) as usize
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// whisper-cli subprocess settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// Path to the whisper-cli binary.  `None` uses the default under the
    /// app data directory.
    pub binary: Option<std::path::PathBuf>,
    /// Path to the GGML model file.  `None` uses the default.
    pub model: Option<std::path::PathBuf>,
    /// Forced transcription language (ISO-639-1).
    pub language: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            binary: None,
            model: None,
            language: "en".into(),
        }
    }
}

impl SttConfig {
    /// Resolve the binary path, falling back to the packaged default.
    pub fn binary_path(&self, paths: &AppPaths) -> std::path::PathBuf {
        self.binary.clone().unwrap_or_else(|| paths.whisper_binary.clone())
    }

    /// Resolve the model path, falling back to the packaged default.
    pub fn model_path(&self, paths: &AppPaths) -> std::path::PathBuf {
        self.model.clone().unwrap_or_else(|| paths.whisper_model.clone())
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Ollama proofreading settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the local Ollama endpoint.
    pub base_url: String,
    /// Operator-supplied model name.  `None` resolves against `/api/tags`.
    pub model: Option<String>,
    /// Timeout for the proofread chat call, in seconds.
    pub chat_timeout_secs: u64,
    /// Timeout for the liveness / model-listing probe, in seconds.
    pub probe_timeout_secs: u64,
    /// Quality-gate thresholds.
    pub gate: QualityGate,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: None,
            chat_timeout_secs: 30,
            probe_timeout_secs: 2,
            gate: QualityGate::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// TimingConfig
// ---------------------------------------------------------------------------

/// Status auto-hide timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long `Done` stays visible before returning to `Idle`, in ms.
    pub done_hide_ms: u64,
    /// How long `Error` stays visible before returning to `Idle`, in ms.
    pub error_hide_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            done_hide_ms: 2_000,
            error_hide_ms: 3_000,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub hotkey: HotkeyConfig,
    pub audio: AudioConfig,
    pub stt: SttConfig,
    pub llm: LlmConfig,
    pub timing: TimingConfig,
}

impl AppConfig {
    /// Load from the platform-appropriate `settings.toml`.
    ///
    /// A missing file is the first-run case and yields the defaults, so
    /// callers never special-case it.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save to the platform-appropriate `settings.toml`.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_carry_the_tuned_constants() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.hotkey.trigger_key, "AltGr");
        assert_eq!(cfg.hotkey.grace_ms, 150);
        assert_eq!(cfg.audio.sample_rate, 16_000);
        assert_eq!(cfg.audio.min_recording_ms, 400);
        assert_eq!(cfg.audio.min_samples(), 6_400);
        assert_eq!(cfg.llm.base_url, "http://localhost:11434");
        assert!(cfg.llm.model.is_none());
        assert_eq!(cfg.llm.chat_timeout_secs, 30);
        assert_eq!(cfg.llm.probe_timeout_secs, 2);
        assert!((cfg.llm.gate.min_length_ratio - 0.2).abs() < f32::EPSILON);
        assert_eq!(cfg.llm.gate.expansion_floor_chars, 200);
        assert_eq!(cfg.timing.done_hide_ms, 2_000);
        assert_eq!(cfg.timing.error_hide_ms, 3_000);
        assert_eq!(cfg.stt.language, "en");
    }

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let mut cfg = AppConfig::default();
        cfg.hotkey.trigger_key = "F9".into();
        cfg.llm.model = Some("gemma3:4b".into());
        cfg.stt.binary = Some("/opt/whisper/whisper-cli".into());
        cfg.audio.min_recording_ms = 600;

        cfg.save_to(&path).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let loaded = AppConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(loaded, AppConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[hotkey]\ntrigger_key = \"CapsLock\"\n").unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.hotkey.trigger_key, "CapsLock");
        assert_eq!(loaded.hotkey.grace_ms, 150);
        assert_eq!(loaded.audio.sample_rate, 16_000);
    }
}
