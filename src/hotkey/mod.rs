//! Trigger-key handling: global hook → hold classification.
//!
//! The rdev hook thread ([`listener`]) forwards every raw key edge into the
//! classifier task ([`hold::run_classifier`]), which debounces them into
//! [`HoldEdge`]s for the pipeline coordinator.  A short press or a chorded
//! shortcut passing through the trigger key produces no edge at all.

pub mod hold;
pub mod listener;

pub use hold::{run_classifier, HoldDetector, HoldPhase, KeyInput};
pub use listener::KeyHook;

// ---------------------------------------------------------------------------
// HoldEdge
// ---------------------------------------------------------------------------

/// Debounced hold edges produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldEdge {
    /// The trigger key has been held, untainted, for the full grace period.
    Start,
    /// A confirmed hold ended (the trigger key was released).
    End,
}

// ---------------------------------------------------------------------------
// parse_key
// ---------------------------------------------------------------------------

/// Parse a trigger-key name from config into an [`rdev::Key`].
///
/// Supports the modifier keys people actually use for push-to-talk, F1–F12,
/// a few named keys, and single ASCII letters.  Returns `None` for
/// unrecognised names so callers can fall back to the default.
///
/// # Examples
///
/// ```
/// use hold_to_type::hotkey::parse_key;
///
/// assert_eq!(parse_key("AltGr"), Some(rdev::Key::AltGr));
/// assert_eq!(parse_key("F9"),    Some(rdev::Key::F9));
/// assert_eq!(parse_key("xyz"),   None);
/// ```
pub fn parse_key(key_str: &str) -> Option<rdev::Key> {
    match key_str {
        // Modifiers — the usual push-to-talk choices
        "AltGr" | "RightAlt" => Some(rdev::Key::AltGr),
        "Alt" | "LeftAlt" => Some(rdev::Key::Alt),
        "ControlLeft" | "LeftControl" => Some(rdev::Key::ControlLeft),
        "ControlRight" | "RightControl" => Some(rdev::Key::ControlRight),
        "ShiftLeft" | "LeftShift" => Some(rdev::Key::ShiftLeft),
        "ShiftRight" | "RightShift" => Some(rdev::Key::ShiftRight),
        "MetaLeft" | "LeftMeta" => Some(rdev::Key::MetaLeft),
        "MetaRight" | "RightMeta" => Some(rdev::Key::MetaRight),
        "CapsLock" => Some(rdev::Key::CapsLock),

        // Function keys
        "F1" => Some(rdev::Key::F1),
        "F2" => Some(rdev::Key::F2),
        "F3" => Some(rdev::Key::F3),
        "F4" => Some(rdev::Key::F4),
        "F5" => Some(rdev::Key::F5),
        "F6" => Some(rdev::Key::F6),
        "F7" => Some(rdev::Key::F7),
        "F8" => Some(rdev::Key::F8),
        "F9" => Some(rdev::Key::F9),
        "F10" => Some(rdev::Key::F10),
        "F11" => Some(rdev::Key::F11),
        "F12" => Some(rdev::Key::F12),

        // Named keys
        "Space" => Some(rdev::Key::Space),
        "Escape" | "Esc" => Some(rdev::Key::Escape),
        "Home" => Some(rdev::Key::Home),
        "End" => Some(rdev::Key::End),
        "Insert" => Some(rdev::Key::Insert),
        "Pause" => Some(rdev::Key::Pause),
        "ScrollLock" => Some(rdev::Key::ScrollLock),

        // Single letters (case-insensitive)
        s => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => letter_key(c.to_ascii_lowercase()),
                _ => None,
            }
        }
    }
}

fn letter_key(c: char) -> Option<rdev::Key> {
    use rdev::Key::*;
    Some(match c {
        'a' => KeyA,
        'b' => KeyB,
        'c' => KeyC,
        'd' => KeyD,
        'e' => KeyE,
        'f' => KeyF,
        'g' => KeyG,
        'h' => KeyH,
        'i' => KeyI,
        'j' => KeyJ,
        'k' => KeyK,
        'l' => KeyL,
        'm' => KeyM,
        'n' => KeyN,
        'o' => KeyO,
        'p' => KeyP,
        'q' => KeyQ,
        'r' => KeyR,
        's' => KeyS,
        't' => KeyT,
        'u' => KeyU,
        'v' => KeyV,
        'w' => KeyW,
        'x' => KeyX,
        'y' => KeyY,
        'z' => KeyZ,
        _ => return None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modifier_keys() {
        assert_eq!(parse_key("AltGr"), Some(rdev::Key::AltGr));
        assert_eq!(parse_key("RightAlt"), Some(rdev::Key::AltGr));
        assert_eq!(parse_key("CapsLock"), Some(rdev::Key::CapsLock));
        assert_eq!(parse_key("RightControl"), Some(rdev::Key::ControlRight));
    }

    #[test]
    fn parse_function_keys() {
        assert_eq!(parse_key("F1"), Some(rdev::Key::F1));
        assert_eq!(parse_key("F9"), Some(rdev::Key::F9));
        assert_eq!(parse_key("F12"), Some(rdev::Key::F12));
    }

    #[test]
    fn parse_letters_case_insensitive() {
        assert_eq!(parse_key("a"), Some(rdev::Key::KeyA));
        assert_eq!(parse_key("A"), Some(rdev::Key::KeyA));
        assert_eq!(parse_key("z"), Some(rdev::Key::KeyZ));
    }

    #[test]
    fn parse_unknown_returns_none() {
        assert_eq!(parse_key(""), None);
        assert_eq!(parse_key("xyz"), None);
        assert_eq!(parse_key("Ctrl+V"), None);
        assert_eq!(parse_key("1"), None);
    }
}
