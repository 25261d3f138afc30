//! Hold-detection state machine — raw key edges in, debounced hold edges out.
//!
//! The detector watches a single target key.  A press arms a grace timer;
//! only if the key stays down, with no other key pressed in between, does the
//! timer fire and produce [`HoldEdge::Start`].  Releasing a confirmed hold
//! produces [`HoldEdge::End`].  Taps shorter than the grace period and
//! chorded shortcuts that happen to pass through the target key produce
//! nothing at all.
//!
//! [`HoldDetector`] is a pure, timer-free transition function so every edge
//! case is unit-testable; [`run_classifier`] wraps it in an async task that
//! owns the actual grace timer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use super::HoldEdge;

// ---------------------------------------------------------------------------
// HoldPhase
// ---------------------------------------------------------------------------

/// Phase of the current (potential) hold.
///
/// ```text
/// Released ──target down──▶ Pending ──grace elapsed──▶ Holding
///    ▲                        │  │                        │
///    │◀──target up────────────┘  └─foreign down─▶ Tainted │
///    │◀──target up (Tainted)─────────────────────────┘    │
///    └──target up (emit End)──────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldPhase {
    /// Target key is up; nothing pending.
    Released,
    /// Target key is down, grace timer running, no foreign key seen yet.
    Pending,
    /// Target key is down but a foreign key-down invalidated the hold.
    Tainted,
    /// Grace period elapsed untainted; `Start` has been emitted.
    Holding,
}

// ---------------------------------------------------------------------------
// HoldDetector
// ---------------------------------------------------------------------------

/// Pure hold-detection transition function for one target key.
///
/// Generic over the key code type so tests can use plain integers while the
/// hook thread feeds [`rdev::Key`] values.
///
/// The caller owns the grace timer: whenever [`phase`](Self::phase) is
/// [`HoldPhase::Pending`] a timer for the grace period should be running, and
/// [`on_grace_elapsed`](Self::on_grace_elapsed) called when it fires.  Any
/// transition out of `Pending` implicitly cancels it.
#[derive(Debug)]
pub struct HoldDetector<K> {
    target: K,
    phase: HoldPhase,
}

impl<K: Copy + PartialEq> HoldDetector<K> {
    /// Create a detector watching `target`.
    pub fn new(target: K) -> Self {
        Self {
            target,
            phase: HoldPhase::Released,
        }
    }

    /// Current phase — drives the caller's timer arming.
    pub fn phase(&self) -> HoldPhase {
        self.phase
    }

    /// Change the watched key at runtime.
    ///
    /// Resets the whole machine to [`HoldPhase::Released`] without emitting a
    /// spurious `End`, even mid-hold.
    pub fn set_target(&mut self, target: K) {
        self.target = target;
        self.phase = HoldPhase::Released;
    }

    /// Feed a key-down event.
    pub fn on_key_down(&mut self, key: K) -> Option<HoldEdge> {
        if key == self.target {
            match self.phase {
                // Fresh press — the caller must now arm the grace timer.
                HoldPhase::Released => self.phase = HoldPhase::Pending,
                // OS key-repeat for a key already down: ignore, do not
                // re-arm the timer.
                HoldPhase::Pending | HoldPhase::Tainted | HoldPhase::Holding => {}
            }
        } else if self.phase == HoldPhase::Pending {
            // Foreign key while the grace timer runs — this is a chord, not
            // an intentional hold.
            self.phase = HoldPhase::Tainted;
        }
        None
    }

    /// Feed a key-up event.
    pub fn on_key_up(&mut self, key: K) -> Option<HoldEdge> {
        if key != self.target {
            return None;
        }
        let was_holding = self.phase == HoldPhase::Holding;
        self.phase = HoldPhase::Released;
        was_holding.then_some(HoldEdge::End)
    }

    /// The grace timer fired.  Only meaningful in [`HoldPhase::Pending`];
    /// stale fires in any other phase are ignored.
    pub fn on_grace_elapsed(&mut self) -> Option<HoldEdge> {
        if self.phase == HoldPhase::Pending {
            self.phase = HoldPhase::Holding;
            Some(HoldEdge::Start)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// KeyInput / run_classifier
// ---------------------------------------------------------------------------

/// Inputs to the classifier task.  Key events and control messages share one
/// channel so they are serialized in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput<K> {
    /// A key was pressed.
    Down(K),
    /// A key was released.
    Up(K),
    /// Switch the watched target key.
    SetTarget(K),
}

/// Async driver around [`HoldDetector`]: owns the grace timer and forwards
/// debounced [`HoldEdge`]s to `edges`.
///
/// Runs until the input channel closes.  No edge is ever emitted after the
/// task returns, so dropping the input sender is a clean teardown.
pub async fn run_classifier<K: Copy + PartialEq>(
    target: K,
    grace: Duration,
    mut inputs: mpsc::Receiver<KeyInput<K>>,
    edges: mpsc::Sender<HoldEdge>,
) {
    let mut detector = HoldDetector::new(target);
    let mut deadline = Instant::now();

    loop {
        let pending = detector.phase() == HoldPhase::Pending;

        let edge = tokio::select! {
            input = inputs.recv() => {
                let Some(input) = input else { break };
                let was_pending = pending;
                let edge = match input {
                    KeyInput::Down(k) => detector.on_key_down(k),
                    KeyInput::Up(k) => detector.on_key_up(k),
                    KeyInput::SetTarget(k) => {
                        detector.set_target(k);
                        None
                    }
                };
                // Entering Pending arms the one-shot grace timer; leaving it
                // (taint / release / retarget) cancels via the select guard.
                if !was_pending && detector.phase() == HoldPhase::Pending {
                    deadline = Instant::now() + grace;
                }
                edge
            }
            _ = tokio::time::sleep_until(deadline), if pending => {
                detector.on_grace_elapsed()
            }
        };

        if let Some(edge) = edge {
            log::debug!("hold classifier: {edge:?}");
            if edges.send(edge).await.is_err() {
                break;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: u32 = 3640;
    const OTHER: u32 = 42;

    // ---- Pure detector transitions -----------------------------------------

    #[test]
    fn press_enters_pending_without_emitting() {
        let mut det = HoldDetector::new(TARGET);
        assert_eq!(det.on_key_down(TARGET), None);
        assert_eq!(det.phase(), HoldPhase::Pending);
    }

    #[test]
    fn grace_elapsed_while_pending_emits_start() {
        let mut det = HoldDetector::new(TARGET);
        det.on_key_down(TARGET);
        assert_eq!(det.on_grace_elapsed(), Some(HoldEdge::Start));
        assert_eq!(det.phase(), HoldPhase::Holding);
    }

    #[test]
    fn release_after_start_emits_end() {
        let mut det = HoldDetector::new(TARGET);
        det.on_key_down(TARGET);
        det.on_grace_elapsed();
        assert_eq!(det.on_key_up(TARGET), Some(HoldEdge::End));
        assert_eq!(det.phase(), HoldPhase::Released);
    }

    #[test]
    fn tap_released_before_grace_emits_nothing() {
        let mut det = HoldDetector::new(TARGET);
        det.on_key_down(TARGET);
        assert_eq!(det.on_key_up(TARGET), None);
        assert_eq!(det.phase(), HoldPhase::Released);
        // A stale timer fire after release must be ignored.
        assert_eq!(det.on_grace_elapsed(), None);
    }

    #[test]
    fn foreign_key_down_taints_pending_hold() {
        let mut det = HoldDetector::new(TARGET);
        det.on_key_down(TARGET);
        assert_eq!(det.on_key_down(OTHER), None);
        assert_eq!(det.phase(), HoldPhase::Tainted);
        // Even if the (not yet cancelled) timer fires, no Start.
        assert_eq!(det.on_grace_elapsed(), None);
        // Releasing a tainted hold emits nothing.
        assert_eq!(det.on_key_up(TARGET), None);
    }

    #[test]
    fn foreign_key_after_start_does_not_taint_holding() {
        let mut det = HoldDetector::new(TARGET);
        det.on_key_down(TARGET);
        det.on_grace_elapsed();
        det.on_key_down(OTHER);
        assert_eq!(det.phase(), HoldPhase::Holding);
        assert_eq!(det.on_key_up(TARGET), Some(HoldEdge::End));
    }

    #[test]
    fn key_repeat_is_ignored() {
        let mut det = HoldDetector::new(TARGET);
        det.on_key_down(TARGET);
        // OS auto-repeat delivers more key-downs; phase must not restart.
        assert_eq!(det.on_key_down(TARGET), None);
        assert_eq!(det.phase(), HoldPhase::Pending);
        det.on_grace_elapsed();
        assert_eq!(det.on_key_down(TARGET), None);
        assert_eq!(det.phase(), HoldPhase::Holding);
    }

    #[test]
    fn foreign_key_up_is_ignored() {
        let mut det = HoldDetector::new(TARGET);
        det.on_key_down(TARGET);
        det.on_grace_elapsed();
        assert_eq!(det.on_key_up(OTHER), None);
        assert_eq!(det.phase(), HoldPhase::Holding);
    }

    #[test]
    fn foreign_key_alone_does_nothing() {
        let mut det = HoldDetector::new(TARGET);
        assert_eq!(det.on_key_down(OTHER), None);
        assert_eq!(det.phase(), HoldPhase::Released);
        assert_eq!(det.on_key_up(OTHER), None);
    }

    #[test]
    fn start_fires_at_most_once_per_continuous_hold() {
        let mut det = HoldDetector::new(TARGET);
        det.on_key_down(TARGET);
        assert_eq!(det.on_grace_elapsed(), Some(HoldEdge::Start));
        // A duplicate timer fire must not emit a second Start.
        assert_eq!(det.on_grace_elapsed(), None);
    }

    #[test]
    fn set_target_mid_hold_resets_without_end() {
        let mut det = HoldDetector::new(TARGET);
        det.on_key_down(TARGET);
        det.on_grace_elapsed();
        det.set_target(OTHER);
        assert_eq!(det.phase(), HoldPhase::Released);
        // Old key release must not produce a stale End.
        assert_eq!(det.on_key_up(TARGET), None);
        // The new key works normally.
        det.on_key_down(OTHER);
        assert_eq!(det.on_grace_elapsed(), Some(HoldEdge::Start));
    }

    // ---- Async classifier (timer behaviour) --------------------------------

    const GRACE: Duration = Duration::from_millis(150);

    async fn drive(inputs: Vec<(KeyInput<u32>, Duration)>) -> Vec<HoldEdge> {
        tokio::time::pause();
        let (in_tx, in_rx) = mpsc::channel(16);
        let (edge_tx, mut edge_rx) = mpsc::channel(16);
        let task = tokio::spawn(run_classifier(TARGET, GRACE, in_rx, edge_tx));

        for (input, wait) in inputs {
            in_tx.send(input).await.unwrap();
            tokio::time::sleep(wait).await;
        }
        drop(in_tx);
        task.await.unwrap();

        let mut edges = Vec::new();
        while let Ok(edge) = edge_rx.try_recv() {
            edges.push(edge);
        }
        edges
    }

    #[tokio::test]
    async fn classifier_emits_start_then_end_for_long_hold() {
        let edges = drive(vec![
            (KeyInput::Down(TARGET), Duration::from_millis(500)),
            (KeyInput::Up(TARGET), Duration::from_millis(10)),
        ])
        .await;
        assert_eq!(edges, vec![HoldEdge::Start, HoldEdge::End]);
    }

    #[tokio::test]
    async fn classifier_ignores_short_tap() {
        let edges = drive(vec![
            (KeyInput::Down(TARGET), Duration::from_millis(50)),
            (KeyInput::Up(TARGET), Duration::from_millis(300)),
        ])
        .await;
        assert!(edges.is_empty());
    }

    #[tokio::test]
    async fn classifier_suppresses_chord() {
        let edges = drive(vec![
            (KeyInput::Down(TARGET), Duration::from_millis(50)),
            (KeyInput::Down(OTHER), Duration::from_millis(500)),
            (KeyInput::Up(OTHER), Duration::from_millis(10)),
            (KeyInput::Up(TARGET), Duration::from_millis(10)),
        ])
        .await;
        assert!(edges.is_empty());
    }

    #[tokio::test]
    async fn classifier_retarget_mid_hold_emits_no_end() {
        let edges = drive(vec![
            (KeyInput::Down(TARGET), Duration::from_millis(500)),
            (KeyInput::SetTarget(OTHER), Duration::from_millis(10)),
            (KeyInput::Up(TARGET), Duration::from_millis(10)),
        ])
        .await;
        // The Start from before the retarget is legitimate; the reset must
        // swallow the matching End.
        assert_eq!(edges, vec![HoldEdge::Start]);
    }
}
