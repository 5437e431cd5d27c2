//! Blink detection from sustained bilateral tracking loss
//!
//! The tracker cannot distinguish "eyelid closed" from "pupil not found",
//! so a blink is inferred by timing: once both eyes report invalid
//! samples for `blink_frames` consecutive frames, the eyelids are
//! reported closed. A single shared counter drives both eyelid values;
//! there is no per-eye wink differentiation.

/// Eyelid fully open
pub const EYELID_OPEN: f32 = 1.0;
/// Eyelid fully closed
pub const EYELID_CLOSED: f32 = 0.0;

/// Frame-counting timer converting bilateral loss into an eyelid value
#[derive(Debug, Clone)]
pub struct BlinkDetector {
    /// Consecutive frames with both eyes invalid
    counter: u32,
    /// Frames of bilateral loss required before reporting closed
    threshold: u32,
}

impl BlinkDetector {
    pub fn new(threshold: u32) -> Self {
        Self {
            counter: 0,
            threshold,
        }
    }

    /// Advance one frame and report the eyelid value for both eyes.
    ///
    /// Transitions to closed exactly on the frame the counter first
    /// reaches the threshold, and back to open on the first frame either
    /// eye reports a valid sample.
    pub fn update(&mut self, left_lost: bool, right_lost: bool) -> f32 {
        if left_lost && right_lost {
            self.counter = self.counter.saturating_add(1);
        } else {
            self.counter = 0;
        }

        if self.counter >= self.threshold {
            EYELID_CLOSED
        } else {
            EYELID_OPEN
        }
    }

    /// Clear the loss counter.
    pub fn reset(&mut self) {
        self.counter = 0;
    }
}
