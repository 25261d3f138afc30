//! Ollama-backed proofreading client.
//!
//! Talks to a local Ollama instance over loopback HTTP: `/api/tags` (short
//! timeout) to discover installed models, `/api/chat` (long timeout) for the
//! proofread itself.  The resolved model name is cached for the process
//! lifetime; only [`OllamaProofreader::invalidate_model_cache`] clears it,
//! and an operator-supplied model name in config bypasses resolution
//! entirely.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::LlmConfig;

use super::cleanup::clean_response;
use super::gate::{QualityGate, RejectReason};
use super::prompt::{wrap_transcript, SYSTEM_PROMPT};

/// Tried first when resolving an installed model.
const PRIMARY_MODEL: &str = "gemma3";
/// Tried in order when the primary is not installed.
const FALLBACK_MODELS: [&str; 3] = ["qwen2.5:3b", "phi4", "llama3.2"];

// ---------------------------------------------------------------------------
// ProofreadError
// ---------------------------------------------------------------------------

/// Errors from the proofreading stage.
#[derive(Debug, Error)]
pub enum ProofreadError {
    /// The service is unreachable, returned a bad status, or has no model
    /// installed.
    #[error("proofreading unavailable: {0}")]
    ServiceUnavailable(String),

    /// The chat request did not complete within the configured timeout.
    #[error("proofread request timed out")]
    Timeout,

    /// The response body was not the expected JSON shape.
    #[error("failed to parse proofread response: {0}")]
    Parse(String),

    /// The quality gate refused the output.
    #[error("{0}")]
    Rejected(#[from] RejectReason),
}

impl From<reqwest::Error> for ProofreadError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProofreadError::Timeout
        } else {
            ProofreadError::ServiceUnavailable(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Proofreader trait
// ---------------------------------------------------------------------------

/// Async proofreading of a raw transcript into pasteable text.
///
/// Implementors must be `Send + Sync` for sharing as `Arc<dyn Proofreader>`.
#[async_trait]
pub trait Proofreader: Send + Sync {
    async fn proofread(&self, raw: &str) -> Result<String, ProofreadError>;
}

// ---------------------------------------------------------------------------
// OllamaProofreader
// ---------------------------------------------------------------------------

/// Production [`Proofreader`] against a local Ollama endpoint.
pub struct OllamaProofreader {
    client: reqwest::Client,
    base_url: String,
    /// Operator-supplied model name; skips resolution when set.
    override_model: Option<String>,
    chat_timeout: Duration,
    probe_timeout: Duration,
    gate: QualityGate,
    /// Memoized resolution result.  Outer `None` = never resolved; inner
    /// `None` = resolved to "nothing installed".  This client is the only
    /// writer.
    cached_model: Mutex<Option<Option<String>>>,
}

impl OllamaProofreader {
    /// Build from application config.
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            override_model: config.model.clone().filter(|m| !m.trim().is_empty()),
            chat_timeout: Duration::from_secs(config.chat_timeout_secs),
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
            gate: config.gate.clone(),
            cached_model: Mutex::new(None),
        }
    }

    /// Drop the memoized model so the next call re-queries `/api/tags`.
    pub fn invalidate_model_cache(&self) {
        if let Ok(mut cached) = self.cached_model.lock() {
            *cached = None;
        }
    }

    /// Resolve which model to use: operator override, then cache, then the
    /// preference list against `/api/tags`, then any installed model.
    pub async fn resolve_model(&self) -> Option<String> {
        if let Some(model) = &self.override_model {
            return Some(model.clone());
        }
        if let Ok(cached) = self.cached_model.lock() {
            if let Some(resolved) = cached.as_ref() {
                return resolved.clone();
            }
        }

        let resolved = self.query_installed_model().await;
        if let Ok(mut cached) = self.cached_model.lock() {
            // Negative results are cached too: a dead service should not be
            // re-probed on every keystroke.
            *cached = Some(resolved.clone());
        }
        resolved
    }

    async fn query_installed_model(&self) -> Option<String> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }

        let json: serde_json::Value = response.json().await.ok()?;
        let installed: Vec<&str> = json["models"]
            .as_array()
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m["name"].as_str())
                    .collect()
            })
            .unwrap_or_default();

        pick_model(&installed).map(str::to_string)
    }

    async fn call_chat(&self, model: &str, raw: &str) -> Result<String, ProofreadError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = serde_json::json!({
            "model": model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user",   "content": wrap_transcript(raw) }
            ],
            "stream": false
        });

        let response = self
            .client
            .post(&url)
            .timeout(self.chat_timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let excerpt: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(200)
                .collect();
            return Err(ProofreadError::ServiceUnavailable(format!(
                "Ollama {status}: {excerpt}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProofreadError::Parse(e.to_string()))?;

        let content = json["message"]["content"]
            .as_str()
            .ok_or_else(|| ProofreadError::Parse("missing message.content".into()))?;

        Ok(clean_response(content))
    }
}

#[async_trait]
impl Proofreader for OllamaProofreader {
    async fn proofread(&self, raw: &str) -> Result<String, ProofreadError> {
        let model = self.resolve_model().await.ok_or_else(|| {
            ProofreadError::ServiceUnavailable(
                "Ollama not running or no model installed".into(),
            )
        })?;

        log::debug!("proofread: using model {model}");
        let cleaned = self.call_chat(&model, raw).await?;
        self.gate.check(raw, &cleaned)?;
        Ok(cleaned)
    }
}

/// Prefix-match the preference order against installed model names, falling
/// back to whatever is installed first.
fn pick_model<'a>(installed: &[&'a str]) -> Option<&'a str> {
    std::iter::once(PRIMARY_MODEL)
        .chain(FALLBACK_MODELS)
        .find_map(|pref| installed.iter().find(|name| name.starts_with(pref)))
        .or_else(|| installed.first())
        .copied()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
