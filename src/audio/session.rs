//! Single-session audio accumulation buffer.
//!
//! One [`AudioSessionBuffer`] exists per process, shared between the capture
//! feed (which pushes resampled mono frames) and the pipeline coordinator
//! (which starts and finishes sessions).  Frames arriving while no session is
//! active are dropped, so the capture stream can run continuously without
//! gating on the coordinator.

use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// SessionAudio
// ---------------------------------------------------------------------------

/// The audio collected by one finished recording session.
#[derive(Debug, Clone)]
pub struct SessionAudio {
    /// Concatenated mono samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Duration derived from the sample count and session rate.
    pub duration_secs: f32,
}

// ---------------------------------------------------------------------------
// AudioSessionBuffer
// ---------------------------------------------------------------------------

/// Accumulates streamed audio frames for the duration of one recording
/// session.
///
/// * [`start`](Self::start) opens a session, discarding anything left from a
///   previous one.  Starting while a session is already active is ignored
///   with a warning — the coordinator contract never does this.
/// * [`push_frame`](Self::push_frame) appends while active; no-op otherwise.
/// * [`finish`](Self::finish) closes the session and hands back the
///   concatenated samples with their total duration.
pub struct AudioSessionBuffer {
    frames: Vec<Vec<f32>>,
    sample_rate: u32,
    active: bool,
}

impl AudioSessionBuffer {
    /// Create an inactive buffer for `sample_rate` Hz mono audio.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            frames: Vec::new(),
            sample_rate,
            active: false,
        }
    }

    /// Open a new session, resetting the frame sequence.
    pub fn start(&mut self) {
        if self.active {
            log::warn!("audio session: start while already recording — ignored");
            return;
        }
        self.frames.clear();
        self.active = true;
    }

    /// Append a frame to the active session.  Dropped silently while no
    /// session is active.
    pub fn push_frame(&mut self, samples: &[f32]) {
        if !self.active {
            return;
        }
        self.frames.push(samples.to_vec());
    }

    /// Close the session and return its audio.
    ///
    /// Returns `None` when no session was active.
    pub fn finish(&mut self) -> Option<SessionAudio> {
        if !self.active {
            return None;
        }
        self.active = false;

        let total: usize = self.frames.iter().map(Vec::len).sum();
        let mut samples = Vec::with_capacity(total);
        for frame in self.frames.drain(..) {
            samples.extend_from_slice(&frame);
        }

        let duration_secs = samples.len() as f32 / self.sample_rate as f32;
        Some(SessionAudio {
            samples,
            duration_secs,
        })
    }

    /// `true` while a session is open.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Samples accumulated so far in the open session.
    pub fn sample_count(&self) -> usize {
        self.frames.iter().map(Vec::len).sum()
    }

    /// Session sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Thread-safe handle shared between the capture feed and the coordinator.
pub type SharedSession = Arc<Mutex<AudioSessionBuffer>>;

/// Construct a [`SharedSession`] for `sample_rate` Hz audio.
pub fn new_shared_session(sample_rate: u32) -> SharedSession {
    Arc::new(Mutex::new(AudioSessionBuffer::new(sample_rate)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
