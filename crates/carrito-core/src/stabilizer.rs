//! # Scan Stabilizer
//!
//! Turns a noisy, frame-by-frame stream of decoded codes into a single
//! confirmed scan.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Stabilization State Machine                        │
//! │                                                                         │
//! │  frame payload        state (last_payload, run_length)                  │
//! │  ─────────────        ────────────────────────────────                  │
//! │  Some("A")            ("A", 1)                                          │
//! │  Some("A")            ("A", 2)                                          │
//! │  None                 ("A", 2)   ← miss leaves state untouched          │
//! │  Some("A")            ("A", 3)                                          │
//! │  Some("B")            ("B", 1)   ← competing payload restarts the run   │
//! │  Some("B") ×4         ("B", 5)   ── run reaches threshold ──► CONFIRMED │
//! │                                                                         │
//! │  After confirmation the machine is terminal: further observations       │
//! │  are ignored and the confirmed payload is held.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A decoder miss deliberately does not reset the run: a hand-held camera
//! drops single frames on an otherwise steadily-presented code, and those
//! drops must not restart the count.
//!
//! This type is purely computational. It is driven by whoever owns the
//! frame source (see `carrito-scan`) and is unit-tested by feeding literal
//! sequences of `Option<&str>`.

use serde::{Deserialize, Serialize};

use crate::STABLE_FRAME_THRESHOLD;

/// Externally observable stabilizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilizerState {
    /// No candidate payload seen yet.
    Idle,
    /// A candidate payload is accumulating consecutive readings.
    Tracking,
    /// A payload reached the threshold; the machine is terminal.
    Confirmed,
}

/// Confirms a scanned code after sustained repetition.
#[derive(Debug, Clone)]
pub struct ScanStabilizer {
    threshold: u32,
    last_payload: Option<String>,
    run_length: u32,
    confirmed: bool,
}

impl ScanStabilizer {
    /// Creates a stabilizer with the default threshold
    /// ([`STABLE_FRAME_THRESHOLD`]).
    pub fn new() -> Self {
        Self::with_threshold(STABLE_FRAME_THRESHOLD)
    }

    /// Creates a stabilizer that confirms after `threshold` consecutive
    /// identical readings. A threshold of 0 behaves like 1: the first
    /// reading confirms.
    pub fn with_threshold(threshold: u32) -> Self {
        ScanStabilizer {
            threshold: threshold.max(1),
            last_payload: None,
            run_length: 0,
            confirmed: false,
        }
    }

    /// Feeds one frame's decoder output into the machine.
    ///
    /// Returns `Some(payload)` exactly once: on the frame whose reading
    /// first brings the run up to the threshold. Every other call,
    /// including all calls after confirmation, returns `None`.
    pub fn observe(&mut self, payload: Option<&str>) -> Option<String> {
        if self.confirmed {
            return None;
        }

        let Some(payload) = payload else {
            // Miss: tolerate a dropped decode without restarting the run.
            return None;
        };

        if self.last_payload.as_deref() == Some(payload) {
            self.run_length += 1;
        } else {
            self.last_payload = Some(payload.to_string());
            self.run_length = 1;
        }

        if self.run_length >= self.threshold {
            self.confirmed = true;
            return self.last_payload.clone();
        }

        None
    }

    /// The confirmed payload, if the machine is terminal.
    pub fn confirmed(&self) -> Option<&str> {
        if self.confirmed {
            self.last_payload.as_deref()
        } else {
            None
        }
    }

    /// Current state for observers (e.g. a progress indicator).
    pub fn state(&self) -> StabilizerState {
        if self.confirmed {
            StabilizerState::Confirmed
        } else if self.last_payload.is_some() {
            StabilizerState::Tracking
        } else {
            StabilizerState::Idle
        }
    }

    /// Length of the current run of identical readings.
    pub fn run_length(&self) -> u32 {
        self.run_length
    }

    /// Resets to the initial state for a fresh scanning session.
    pub fn reset(&mut self) {
        self.last_payload = None;
        self.run_length = 0;
        self.confirmed = false;
    }
}

impl Default for ScanStabilizer {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Drives a stabilizer over a literal frame sequence; returns the
    /// confirmed payload and the zero-based index of the confirming frame.
    fn drive(threshold: u32, frames: &[Option<&str>]) -> Option<(String, usize)> {
        let mut stab = ScanStabilizer::with_threshold(threshold);
        for (index, frame) in frames.iter().enumerate() {
            if let Some(code) = stab.observe(*frame) {
                return Some((code, index));
            }
        }
        None
    }

    #[test]
    fn confirms_at_exact_threshold_frame() {
        let frames = [Some("A"), Some("A"), Some("A"), Some("A"), Some("A")];
        let (code, index) = drive(5, &frames).unwrap();
        assert_eq!(code, "A");
        assert_eq!(index, 4);
    }

    #[test]
    fn miss_does_not_reset_the_run() {
        let frames = [Some("A"), Some("A"), None, None, Some("A")];
        let (code, index) = drive(3, &frames).unwrap();
        assert_eq!(code, "A");
        assert_eq!(index, 4);
    }

    #[test]
    fn competing_payload_restarts_the_run() {
        let frames = [Some("A"), Some("A"), Some("B"), Some("B"), Some("B")];
        let (code, index) = drive(3, &frames).unwrap();
        assert_eq!(code, "B");
        assert_eq!(index, 4);
    }

    #[test]
    fn never_confirms_below_threshold() {
        let frames = [Some("A"), Some("A"), Some("B"), Some("A"), Some("A")];
        assert_eq!(drive(3, &frames), None);
    }

    #[test]
    fn all_misses_never_confirm() {
        let frames = [None, None, None, None, None, None];
        assert_eq!(drive(2, &frames), None);
    }

    #[test]
    fn terminal_after_confirmation() {
        let mut stab = ScanStabilizer::with_threshold(2);
        assert_eq!(stab.observe(Some("A")), None);
        assert_eq!(stab.observe(Some("A")).as_deref(), Some("A"));

        // Further frames are ignored, even with a different payload.
        assert_eq!(stab.observe(Some("B")), None);
        assert_eq!(stab.confirmed(), Some("A"));
        assert_eq!(stab.state(), StabilizerState::Confirmed);
    }

    #[test]
    fn state_progression() {
        let mut stab = ScanStabilizer::with_threshold(2);
        assert_eq!(stab.state(), StabilizerState::Idle);

        stab.observe(Some("A"));
        assert_eq!(stab.state(), StabilizerState::Tracking);
        assert_eq!(stab.run_length(), 1);

        stab.observe(Some("A"));
        assert_eq!(stab.state(), StabilizerState::Confirmed);
    }

    #[test]
    fn reset_allows_a_new_session() {
        let mut stab = ScanStabilizer::with_threshold(1);
        assert_eq!(stab.observe(Some("A")).as_deref(), Some("A"));

        stab.reset();
        assert_eq!(stab.state(), StabilizerState::Idle);
        assert_eq!(stab.observe(Some("B")).as_deref(), Some("B"));
    }

    #[test]
    fn default_threshold_matches_crate_constant() {
        let frames: Vec<Option<&str>> =
            std::iter::repeat(Some("T")).take(STABLE_FRAME_THRESHOLD as usize).collect();
        let mut stab = ScanStabilizer::new();
        let mut confirmed_at = None;
        for (index, frame) in frames.iter().enumerate() {
            if stab.observe(*frame).is_some() {
                confirmed_at = Some(index);
            }
        }
        assert_eq!(confirmed_at, Some(STABLE_FRAME_THRESHOLD as usize - 1));
    }
}
