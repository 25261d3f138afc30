//! Startup health check — verify the three external legs before listening.
//!
//! Dictation depends on a microphone, the whisper-cli binary + model on
//! disk, and a live Ollama endpoint.  Each leg is probed once at startup
//! and the result logged, so a misconfigured machine fails loudly at launch
//! instead of silently on the first key hold.  A failed leg does not abort
//! the app; the pipeline reports the same failure per-cycle.

use cpal::traits::{DeviceTrait, HostTrait};

use crate::llm::OllamaProofreader;
use crate::stt::Transcriber;

// ---------------------------------------------------------------------------
// HealthReport
// ---------------------------------------------------------------------------

/// Outcome of the three startup probes.  `Ok` carries a short description
/// (device or model name), `Err` the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub microphone: Result<String, String>,
    pub stt_resources: Result<(), String>,
    pub ollama: Result<String, String>,
}

impl HealthReport {
    pub fn all_ok(&self) -> bool {
        self.microphone.is_ok() && self.stt_resources.is_ok() && self.ollama.is_ok()
    }
}

// ---------------------------------------------------------------------------
// Probes
// ---------------------------------------------------------------------------

/// Name of the default input device, if the host exposes one.
pub fn check_microphone() -> Result<String, String> {
    let device = cpal::default_host()
        .default_input_device()
        .ok_or_else(|| "no default input device".to_string())?;
    Ok(device
        .name()
        .unwrap_or_else(|_| "unnamed input device".into()))
}

/// whisper-cli binary and model presence on disk.
pub fn check_stt(transcriber: &dyn Transcriber) -> Result<(), String> {
    transcriber.check_resources().map_err(|e| e.to_string())
}

/// Ollama liveness: ask the proofreader to resolve a usable model.
pub async fn check_ollama(proofreader: &OllamaProofreader) -> Result<String, String> {
    proofreader
        .resolve_model()
        .await
        .ok_or_else(|| "no usable model (is Ollama running?)".to_string())
}

/// Run all three probes and log one line per leg.
pub async fn run_health_check(
    transcriber: &dyn Transcriber,
    proofreader: &OllamaProofreader,
) -> HealthReport {
    let report = HealthReport {
        microphone: check_microphone(),
        stt_resources: check_stt(transcriber),
        ollama: check_ollama(proofreader).await,
    };

    match &report.microphone {
        Ok(name) => log::info!("health: microphone ok ({name})"),
        Err(e) => log::warn!("health: microphone unavailable: {e}"),
    }
    match &report.stt_resources {
        Ok(()) => log::info!("health: whisper resources ok"),
        Err(e) => log::warn!("health: whisper resources missing: {e}"),
    }
    match &report.ollama {
        Ok(model) => log::info!("health: ollama ok (model {model})"),
        Err(e) => log::warn!("health: ollama unavailable: {e}"),
    }

    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;
    use crate::stt::SttError;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};

    struct HealthyStt;

    #[async_trait]
    impl Transcriber for HealthyStt {
        async fn transcribe(&self, _wav_path: &Path) -> Result<String, SttError> {
            Ok(String::new())
        }
    }

    struct BrokenStt;

    #[async_trait]
    impl Transcriber for BrokenStt {
        async fn transcribe(&self, _wav_path: &Path) -> Result<String, SttError> {
            Ok(String::new())
        }

        fn check_resources(&self) -> Result<(), SttError> {
            Err(SttError::BinaryMissing(PathBuf::from("/nope/whisper-cli")))
        }
    }

    #[test]
    fn stt_probe_maps_errors_to_strings() {
        assert!(check_stt(&HealthyStt).is_ok());
        let err = check_stt(&BrokenStt).unwrap_err();
        assert!(err.contains("whisper binary not found"));
    }

    #[tokio::test]
    async fn unreachable_ollama_reports_down() {
        let config = LlmConfig {
            base_url: "http://127.0.0.1:1".into(),
            probe_timeout_secs: 1,
            ..LlmConfig::default()
        };
        let proofreader = OllamaProofreader::from_config(&config);
        assert!(check_ollama(&proofreader).await.is_err());
    }

    #[test]
    fn report_all_ok_requires_every_leg() {
        let healthy = HealthReport {
            microphone: Ok("usb mic".into()),
            stt_resources: Ok(()),
            ollama: Ok("gemma3".into()),
        };
        assert!(healthy.all_ok());

        let one_down = HealthReport {
            ollama: Err("connection refused".into()),
            ..healthy
        };
        assert!(!one_down.all_ok());
    }
}
