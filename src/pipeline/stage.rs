//! Pipeline stage machine and status events.
//!
//! [`PipelineStage`] names the phase the dictation pipeline is currently in.
//! Every transition is announced as a [`StatusEvent`] on the coordinator's
//! status channel so a front-end (or a plain log consumer) can mirror the
//! pipeline without sharing state with it.
//!
//! ```text
//! Idle ──hold start──▶ Recording
//!      ──hold end────▶ Transcribing ──▶ Cleaning ──▶ Pasting ──▶ Done
//! any busy stage ──fault──▶ Error
//! Done  ──auto-hide (2 s)──▶ Idle
//! Error ──auto-hide (3 s)──▶ Idle
//! ```

// ---------------------------------------------------------------------------
// PipelineStage
// ---------------------------------------------------------------------------

/// Phases of the push-to-talk dictation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineStage {
    /// Waiting for the trigger key to be held.
    #[default]
    Idle,

    /// Trigger key held; microphone frames accumulate in the session buffer.
    Recording,

    /// whisper-cli subprocess is running on the captured WAV.
    Transcribing,

    /// Ollama proofread + quality gate are running on the raw transcript.
    Cleaning,

    /// Clipboard set + paste keystroke in flight.
    Pasting,

    /// Text delivered; auto-hides back to `Idle`.
    Done,

    /// Something failed; auto-hides back to `Idle` (slower than `Done` so
    /// the message can be read).
    Error,
}

impl PipelineStage {
    /// True while a dictation cycle is in flight.  New hold starts are
    /// ignored in busy stages so a second key press cannot corrupt a
    /// session already being processed.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Self::Recording | Self::Transcribing | Self::Cleaning | Self::Pasting
        )
    }

    /// Short human-readable label for logs and status lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Transcribing => "transcribing",
            Self::Cleaning => "cleaning",
            Self::Pasting => "pasting",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// StatusEvent
// ---------------------------------------------------------------------------

/// One pipeline transition, published on the status channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub stage: PipelineStage,
    /// Present for `Error` (what went wrong) and occasionally informative
    /// transitions; `None` for plain stage changes.
    pub message: Option<String>,
}

impl StatusEvent {
    /// Plain transition with no message.
    pub fn stage(stage: PipelineStage) -> Self {
        Self {
            stage,
            message: None,
        }
    }

    /// `Error` transition carrying a description.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Error,
            message: Some(message.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_stages() {
        assert!(!PipelineStage::Idle.is_busy());
        assert!(PipelineStage::Recording.is_busy());
        assert!(PipelineStage::Transcribing.is_busy());
        assert!(PipelineStage::Cleaning.is_busy());
        assert!(PipelineStage::Pasting.is_busy());
        assert!(!PipelineStage::Done.is_busy());
        assert!(!PipelineStage::Error.is_busy());
    }

    #[test]
    fn default_is_idle() {
        assert_eq!(PipelineStage::default(), PipelineStage::Idle);
    }

    #[test]
    fn labels_are_lowercase() {
        for stage in [
            PipelineStage::Idle,
            PipelineStage::Recording,
            PipelineStage::Transcribing,
            PipelineStage::Cleaning,
            PipelineStage::Pasting,
            PipelineStage::Done,
            PipelineStage::Error,
        ] {
            assert_eq!(stage.label(), stage.label().to_lowercase());
            assert_eq!(format!("{stage}"), stage.label());
        }
    }

    #[test]
    fn error_event_carries_message() {
        let ev = StatusEvent::error("mic unplugged");
        assert_eq!(ev.stage, PipelineStage::Error);
        assert_eq!(ev.message.as_deref(), Some("mic unplugged"));

        let plain = StatusEvent::stage(PipelineStage::Recording);
        assert!(plain.message.is_none());
    }
}
