//! hold-to-type — push-to-talk dictation daemon.
//!
//! Hold a trigger key, speak, release; a cleaned-up transcript is pasted at
//! the cursor.  The pipeline is:
//!
//! ```text
//! key hook → hold classifier → coordinator
//!                                 ├─ audio session → WAV encode
//!                                 ├─ whisper-cli subprocess (transcribe)
//!                                 ├─ Ollama /api/chat  (proofread + gate)
//!                                 └─ clipboard paste
//! ```

pub mod audio;
pub mod config;
pub mod health;
pub mod hotkey;
pub mod llm;
pub mod paste;
pub mod pipeline;
pub mod stt;
