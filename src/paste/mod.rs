//! Paste collaborator — clipboard set + simulated paste keystroke.
//!
//! The cleaned text lands at the cursor via the clipboard:
//!
//! 1. **Save** the current clipboard plain-text content.
//! 2. **Set** the proofread text.
//! 3. **Simulate** Ctrl+V (⌘V on macOS) into the focused window.
//! 4. **Restore** the original clipboard content (best-effort).
//!
//! Both `arboard::Clipboard` and `enigo::Enigo` handles are created per call:
//! neither is `Send` on all platforms and both are cheap to construct.  A
//! denied accessibility/automation permission surfaces as
//! [`PasteError::KeySimulation`], distinguishable from clipboard trouble.

use arboard::Clipboard;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use thiserror::Error;

// ---------------------------------------------------------------------------
// PasteError
// ---------------------------------------------------------------------------

/// Errors surfacing from the paste step.
#[derive(Debug, Error)]
pub enum PasteError {
    /// Could not open the system clipboard.
    #[error("cannot access clipboard: {0}")]
    ClipboardAccess(String),

    /// Could not write text into the clipboard.
    #[error("cannot set clipboard text: {0}")]
    ClipboardSet(String),

    /// Could not simulate the paste keystroke (commonly a missing
    /// accessibility permission).
    #[error("cannot simulate paste keystroke: {0}")]
    KeySimulation(String),
}

// ---------------------------------------------------------------------------
// Paster trait
// ---------------------------------------------------------------------------

/// Pluggable paste target so the coordinator can be tested without touching
/// the real clipboard.
///
/// Implementations may block (clipboard and key simulation are synchronous
/// OS calls); the coordinator runs them on the blocking thread pool.
pub trait Paster: Send + Sync {
    fn paste(&self, text: &str) -> Result<(), PasteError>;
}

// ---------------------------------------------------------------------------
// ClipboardPaster
// ---------------------------------------------------------------------------

/// Production [`Paster`] with configurable inter-step delays.
#[derive(Debug, Clone)]
pub struct ClipboardPaster {
    /// Wait after setting the clipboard, before the keystroke, in ms.
    pub flush_delay_ms: u64,
    /// Wait after the keystroke, before restoring the clipboard, in ms.
    pub restore_delay_ms: u64,
}

impl Default for ClipboardPaster {
    fn default() -> Self {
        Self {
            flush_delay_ms: 50,
            restore_delay_ms: 100,
        }
    }
}

impl ClipboardPaster {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Paster for ClipboardPaster {
    fn paste(&self, text: &str) -> Result<(), PasteError> {
        let saved = save_clipboard()?;

        set_clipboard(text)?;
        // Let the clipboard manager flush before the target app reads it.
        std::thread::sleep(std::time::Duration::from_millis(self.flush_delay_ms));

        simulate_paste()?;
        // Let the target app finish pasting before the clipboard changes again.
        std::thread::sleep(std::time::Duration::from_millis(self.restore_delay_ms));

        // Best-effort restore; the paste itself already succeeded.
        if let Some(original) = saved {
            if let Err(e) = set_clipboard(&original) {
                log::warn!("paste: could not restore clipboard: {e}");
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Clipboard helpers
// ---------------------------------------------------------------------------

/// Current clipboard text, or `None` for empty/non-text content.
fn save_clipboard() -> Result<Option<String>, PasteError> {
    let mut clipboard = open_clipboard()?;
    Ok(clipboard.get_text().ok())
}

fn set_clipboard(text: &str) -> Result<(), PasteError> {
    let mut clipboard = open_clipboard()?;
    clipboard
        .set_text(text)
        .map_err(|e| PasteError::ClipboardSet(e.to_string()))
}

fn open_clipboard() -> Result<Clipboard, PasteError> {
    Clipboard::new().map_err(|e| PasteError::ClipboardAccess(e.to_string()))
}

// ---------------------------------------------------------------------------
// Keystroke
// ---------------------------------------------------------------------------

/// Send the OS paste shortcut to the focused window.
fn simulate_paste() -> Result<(), PasteError> {
    let key_err = |e: enigo::InputError| PasteError::KeySimulation(e.to_string());
    let mut enigo =
        Enigo::new(&Settings::default()).map_err(|e| PasteError::KeySimulation(e.to_string()))?;

    #[cfg(target_os = "macos")]
    let modifier = Key::Meta;
    #[cfg(not(target_os = "macos"))]
    let modifier = Key::Control;

    enigo.key(modifier, Direction::Press).map_err(key_err)?;
    enigo.key(Key::Unicode('v'), Direction::Click).map_err(key_err)?;
    enigo.key(modifier, Direction::Release).map_err(key_err)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
