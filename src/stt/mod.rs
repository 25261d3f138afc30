//! Speech-to-text via the whisper-cli subprocess.
//!
//! The engine is an external binary invoked per recording against an encoded
//! WAV file, not an in-process library: it can crash, hang, or be missing
//! entirely without taking the daemon down.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use hold_to_type::stt::{Transcriber, WhisperCli};
//!
//! # async fn example() {
//! let stt = WhisperCli::new(
//!     PathBuf::from("/opt/whisper/whisper-cli"),
//!     PathBuf::from("/opt/whisper/ggml-base.en.bin"),
//!     "en".into(),
//! );
//! let text = stt.transcribe(Path::new("/tmp/clip.wav")).await.unwrap();
//! println!("{text}");
//! # }
//! ```

pub mod runner;

pub use runner::{SttError, Transcriber, WhisperCli};
