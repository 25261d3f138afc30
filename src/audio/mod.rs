//! Audio path — microphone capture → downmix/resample → session buffer → WAV.
//!
//! ```text
//! Microphone → cpal callback → SampleBlock (mpsc) → feed thread
//!            → downmix_to_mono → resample(16 kHz) → AudioSessionBuffer
//!            → finish() → f32_to_i16 → encode_wav → temp file → whisper-cli
//! ```
//!
//! The session buffer drops frames while no recording is open, so capture
//! runs continuously and the coordinator only opens/closes sessions.

pub mod capture;
pub mod resample;
pub mod session;
pub mod wav;

pub use capture::{spawn_feed_thread, CaptureError, CaptureHandle, MicCapture, SampleBlock};
pub use resample::{downmix_to_mono, resample};
pub use session::{new_shared_session, AudioSessionBuffer, SessionAudio, SharedSession};
pub use wav::{encode_wav, f32_to_i16, write_wav, WavError, WavHeader, WAV_HEADER_LEN};
