//! Pipeline coordination for hold-to-type.
//!
//! Wires the hold edges from the keyboard into the full
//! record → transcribe → proofread → paste cycle and publishes one
//! [`StatusEvent`] per stage transition.
//!
//! # Architecture
//!
//! ```text
//! HoldEdge (mpsc, from hotkey::run_classifier)
//!        │
//!        ▼
//! PipelineCoordinator::run()  ← async tokio task
//!        │
//!        ├─ Start → open AudioSessionBuffer, stage = Recording
//!        │
//!        └─ End
//!              ├─ close session (discard if under min_recording_ms)
//!              ├─ encode temp WAV → Transcriber (whisper-cli)   [Transcribing]
//!              ├─ Proofreader (Ollama + quality gate)           [Cleaning]
//!              ├─ spawn_blocking(Paster::paste)                 [Pasting]
//!              └─ Done / Error → auto-hide back to Idle
//!        │
//!        ▼
//! StatusEvent (mpsc) ──▶ status consumer (log line, tray, overlay, …)
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use hold_to_type::audio::new_shared_session;
//! use hold_to_type::config::AppConfig;
//! use hold_to_type::pipeline::PipelineCoordinator;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let session = new_shared_session(config.audio.sample_rate);
//!
//!     # use hold_to_type::llm::Proofreader;
//!     # use hold_to_type::paste::Paster;
//!     # use hold_to_type::stt::Transcriber;
//!     # fn make_stt() -> Arc<dyn Transcriber> { unimplemented!() }
//!     # fn make_llm() -> Arc<dyn Proofreader> { unimplemented!() }
//!     # fn make_paster() -> Arc<dyn Paster> { unimplemented!() }
//!
//!     let (edge_tx, edge_rx) = mpsc::channel(16);
//!     let (status_tx, _status_rx) = mpsc::channel(16);
//!     let coordinator = PipelineCoordinator::new(
//!         session.clone(),
//!         make_stt(),
//!         make_llm(),
//!         make_paster(),
//!         status_tx,
//!         &config,
//!     );
//!
//!     tokio::spawn(coordinator.run(edge_rx));
//!
//!     // edge_tx is fed by hotkey::run_classifier(...)
//! }
//! ```

pub mod coordinator;
pub mod stage;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use coordinator::{PipelineCoordinator, PipelineFault};
pub use stage::{PipelineStage, StatusEvent};
