//! Heuristic quality gate for proofread output.
//!
//! Generated text cannot be verified, so the gate trusts only statistical
//! signals: output that shrank too much, grew too much, or shares too few
//! significant words with the input is a hallucination and gets rejected.
//! A rejection is terminal for the pipeline run; there is no retry with
//! different wording.
//!
//! The thresholds are empirically chosen policy, not structure, so they live
//! in config with these defaults rather than as hard-coded literals.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tokens this short carry no signal for the overlap check.
const MIN_TOKEN_LEN: usize = 3;

// ---------------------------------------------------------------------------
// RejectReason
// ---------------------------------------------------------------------------

/// Why the gate refused the model's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// Output shrank below the minimum fraction of the input length.
    #[error("output too short, likely truncated")]
    TooShort,
    /// Output grew past the expansion cap, likely hallucinated content.
    #[error("output too long, likely hallucinated")]
    TooLong,
    /// Output shares too few significant words with the input.
    #[error("output diverges from the spoken text")]
    LowOverlap,
}

// ---------------------------------------------------------------------------
// QualityGate
// ---------------------------------------------------------------------------

/// Accept/reject policy for proofread output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityGate {
    /// Output must be at least this fraction of the input length.
    pub min_length_ratio: f32,
    /// Output must not exceed input length times this factor…
    pub max_expansion_ratio: f32,
    /// …except that short inputs may always grow up to this many characters.
    pub expansion_floor_chars: usize,
    /// Minimum fraction of the input's significant tokens that must also
    /// appear in the output.
    pub min_token_overlap: f32,
}

impl Default for QualityGate {
    fn default() -> Self {
        Self {
            min_length_ratio: 0.2,
            max_expansion_ratio: 2.0,
            expansion_floor_chars: 200,
            min_token_overlap: 0.3,
        }
    }
}

impl QualityGate {
    /// Check `output` against `input`; `Err` carries the first failed rule.
    pub fn check(&self, input: &str, output: &str) -> Result<(), RejectReason> {
        let in_len = input.chars().count();
        let out_len = output.chars().count();

        if (out_len as f32) < in_len as f32 * self.min_length_ratio {
            log::warn!("quality gate: output too short ({out_len} vs {in_len} input chars)");
            return Err(RejectReason::TooShort);
        }

        let max_len = (in_len as f32 * self.max_expansion_ratio)
            .max(self.expansion_floor_chars as f32);
        if out_len as f32 > max_len {
            log::warn!("quality gate: output too long ({out_len} vs {in_len} input chars)");
            return Err(RejectReason::TooLong);
        }

        let input_tokens = significant_tokens(input);
        if !input_tokens.is_empty() {
            let output_tokens = significant_tokens(output);
            let shared = input_tokens.intersection(&output_tokens).count();
            let ratio = shared as f32 / input_tokens.len() as f32;
            if ratio < self.min_token_overlap {
                log::warn!(
                    "quality gate: word overlap too low ({:.0}%, {shared}/{} words)",
                    ratio * 100.0,
                    input_tokens.len()
                );
                return Err(RejectReason::LowOverlap);
            }
        }

        Ok(())
    }
}

/// Lowercase word set with punctuation stripped; tokens shorter than
/// [`MIN_TOKEN_LEN`] are dropped.
fn significant_tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
