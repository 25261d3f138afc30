//! Microphone capture via `cpal`.
//!
//! [`MicCapture`] opens the default input device at its native configuration
//! and streams [`SampleBlock`]s over a std mpsc channel from the cpal audio
//! thread.  A dedicated feed thread downmixes and resamples each block to
//! 16 kHz mono and pushes it into the shared session buffer (which drops
//! frames while no recording session is open).

use std::sync::mpsc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use super::resample::{downmix_to_mono, resample};
use super::session::SharedSession;

// ---------------------------------------------------------------------------
// SampleBlock
// ---------------------------------------------------------------------------

/// One buffer of raw audio as delivered by the cpal callback.
#[derive(Debug, Clone)]
pub struct SampleBlock {
    /// Interleaved `f32` samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Native sample rate of the stream in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors while setting up or starting microphone capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

// ---------------------------------------------------------------------------
// CaptureHandle
// ---------------------------------------------------------------------------

/// RAII guard keeping the cpal stream alive; dropping it stops capture.
pub struct CaptureHandle {
    _stream: cpal::Stream,
}

// ---------------------------------------------------------------------------
// MicCapture
// ---------------------------------------------------------------------------

/// Default-input-device capture wrapper.
pub struct MicCapture {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_rate: u32,
    channels: u16,
}

impl MicCapture {
    /// Open the system default input device at its preferred configuration.
    pub fn new() -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;

        let supported = device.default_input_config()?;
        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;
        let config: cpal::StreamConfig = supported.into();

        Ok(Self {
            device,
            config,
            sample_rate,
            channels,
        })
    }

    /// Start streaming [`SampleBlock`]s to `tx`.
    ///
    /// Send errors are ignored so the audio thread never panics when the
    /// receiver goes away during shutdown.
    pub fn start(&self, tx: mpsc::Sender<SampleBlock>) -> Result<CaptureHandle, CaptureError> {
        let sample_rate = self.sample_rate;
        let channels = self.channels;

        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let _ = tx.send(SampleBlock {
                    samples: data.to_vec(),
                    sample_rate,
                    channels,
                });
            },
            |err: cpal::StreamError| {
                log::error!("cpal stream error: {err}");
            },
            None,
        )?;

        stream.play()?;
        Ok(CaptureHandle { _stream: stream })
    }

    /// Native sample rate of the device in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Interleaved channel count of the device.
    pub fn channels(&self) -> u16 {
        self.channels
    }
}

// ---------------------------------------------------------------------------
// Feed thread
// ---------------------------------------------------------------------------

/// Spawn the thread that converts raw capture blocks to 16 kHz mono and
/// feeds the shared session buffer.
///
/// Runs until the capture channel closes.  The session buffer itself decides
/// whether a frame is kept (recording) or dropped (idle).
pub fn spawn_feed_thread(
    rx: mpsc::Receiver<SampleBlock>,
    session: SharedSession,
    target_rate: u32,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("audio-feed".into())
        .spawn(move || {
            while let Ok(block) = rx.recv() {
                let mono = downmix_to_mono(&block.samples, block.channels);
                let frame = resample(&mono, block.sample_rate, target_rate);
                if let Ok(mut session) = session.lock() {
                    session.push_frame(&frame);
                }
            }
            log::debug!("audio-feed: capture channel closed");
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::session::new_shared_session;

    #[test]
    fn sample_block_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<SampleBlock>();
    }

    #[test]
    fn feed_thread_resamples_into_active_session() {
        let session = new_shared_session(16_000);
        session.lock().unwrap().start();

        let (tx, rx) = mpsc::channel();
        let handle = spawn_feed_thread(rx, session.clone(), 16_000).unwrap();

        // 480 stereo frames at 48 kHz → 160 mono samples at 16 kHz.
        tx.send(SampleBlock {
            samples: vec![0.5; 960],
            sample_rate: 48_000,
            channels: 2,
        })
        .unwrap();
        drop(tx);
        handle.join().unwrap();

        assert_eq!(session.lock().unwrap().sample_count(), 160);
    }

    #[test]
    fn feed_thread_drops_frames_while_idle() {
        let session = new_shared_session(16_000);

        let (tx, rx) = mpsc::channel();
        let handle = spawn_feed_thread(rx, session.clone(), 16_000).unwrap();

        tx.send(SampleBlock {
            samples: vec![0.5; 160],
            sample_rate: 16_000,
            channels: 1,
        })
        .unwrap();
        drop(tx);
        handle.join().unwrap();

        assert_eq!(session.lock().unwrap().sample_count(), 0);
    }
}
