//! LLM proofreading: prompt, response cleanup, quality gate, Ollama client.
//!
//! * [`Proofreader`] — async trait implemented by proofreading backends.
//! * [`OllamaProofreader`] — local Ollama `/api/chat` client with model
//!   resolution and a process-lifetime model cache.
//! * [`clean_response`] — ordered, table-driven response cleanup (pure).
//! * [`QualityGate`] / [`RejectReason`] — the hallucination gate (pure).
//! * [`SYSTEM_PROMPT`] / [`wrap_transcript`] — the fixed instruction set.
//!
//! A gate rejection or unreachable service surfaces as a terminal pipeline
//! error; the raw transcript is never pasted unproofread.

pub mod cleanup;
pub mod gate;
pub mod prompt;
pub mod proofread;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use cleanup::clean_response;
pub use gate::{QualityGate, RejectReason};
pub use prompt::{wrap_transcript, SYSTEM_PROMPT};
pub use proofread::{OllamaProofreader, ProofreadError, Proofreader};
