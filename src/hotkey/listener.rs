//! Dedicated OS-thread key hook using `rdev::listen`.
//!
//! `rdev::listen` is a blocking call that must live on its own OS thread — it
//! cannot run inside a tokio task.  [`KeyHook::start`] spawns that thread and
//! forwards **every** key edge (not just the trigger key) into the hold
//! classifier, which needs foreign key-downs to detect chorded shortcuts.
//!
//! # Shutdown caveat
//!
//! `rdev::listen` has no graceful shutdown API.  Dropping the [`KeyHook`]
//! sets a stop flag so the callback silently discards further events; the OS
//! thread itself remains blocked in the rdev event loop until the process
//! exits.  It holds no resources that need explicit cleanup.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::mpsc;

use super::hold::KeyInput;

// ---------------------------------------------------------------------------
// KeyHook
// ---------------------------------------------------------------------------

/// Handle to the running global key hook thread.
///
/// Construct with [`KeyHook::start`].  Drop it to stop forwarding events.
pub struct KeyHook {
    /// Shared stop flag — set `true` on [`Drop`].
    stop: Arc<AtomicBool>,
    /// Kept so the thread is not detached prematurely; never joined because
    /// `rdev::listen` never returns.
    _thread: std::thread::JoinHandle<()>,
}

impl KeyHook {
    /// Spawn the hook thread and forward raw key edges on `tx`.
    ///
    /// The sender uses `try_send` so the non-async rdev callback never
    /// blocks: if the channel is full the event is dropped with a warning
    /// rather than stalling the OS event hook.
    ///
    /// # Panics
    ///
    /// Panics if the OS refuses to create the thread (extremely unlikely).
    pub fn start(tx: mpsc::Sender<KeyInput<rdev::Key>>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("key-hook".into())
            .spawn(move || {
                let result = rdev::listen(move |event| {
                    if stop_clone.load(Ordering::Relaxed) {
                        return;
                    }

                    let input = match event.event_type {
                        rdev::EventType::KeyPress(k) => KeyInput::Down(k),
                        rdev::EventType::KeyRelease(k) => KeyInput::Up(k),
                        _ => return,
                    };

                    // Never block the OS hook callback on a full channel.
                    if let Err(e) = tx.try_send(input) {
                        log::warn!("key-hook: dropping event ({e})");
                    }
                });

                if let Err(e) = result {
                    log::error!("key-hook: rdev::listen exited with error: {e:?}");
                }
            })
            .expect("failed to spawn key-hook thread");

        Self {
            stop,
            _thread: thread,
        }
    }
}

impl Drop for KeyHook {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
