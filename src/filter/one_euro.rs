//! Adaptive low-pass (1-euro) smoothing
//!
//! An exponential low-pass filter whose cutoff follows the estimated
//! input derivative: more cutoff (less smoothing) while the signal moves
//! fast, less cutoff (more smoothing) while it is nearly still. Runs at
//! a fixed configured frame rate rather than wall-clock timestamps since
//! the tracker delivers frames at its own steady cadence.

use std::f32::consts::PI;

/// Single-pole exponential low-pass stage
#[derive(Debug, Clone)]
pub struct LowpassFilter {
    first_time: bool,
    hat_x_prev: f32,
}

impl LowpassFilter {
    pub fn new() -> Self {
        Self {
            first_time: true,
            hat_x_prev: 0.0,
        }
    }

    /// Last filtered value
    pub fn last(&self) -> f32 {
        self.hat_x_prev
    }

    pub fn filter(&mut self, x: f32, alpha: f32) -> f32 {
        let hat_x = if self.first_time {
            self.first_time = false;
            x
        } else {
            alpha * x + (1.0 - alpha) * self.hat_x_prev
        };

        self.hat_x_prev = hat_x;
        hat_x
    }
}

impl Default for LowpassFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Derivative-adaptive low-pass filter over one scalar channel
#[derive(Debug, Clone)]
pub struct OneEuroFilter {
    first_time: bool,
    /// Minimum cutoff frequency (Hz) - lower = smoother at rest
    min_cutoff: f32,
    /// Speed coefficient - higher = less lag during fast motion
    beta: f32,
    /// Frame rate (Hz) the alpha coefficients are derived from
    rate: f32,
    /// Fixed cutoff for the derivative estimate
    d_cutoff: f32,
    x_filt: LowpassFilter,
    dx_filt: LowpassFilter,
}

impl OneEuroFilter {
    pub fn new(min_cutoff: f32, beta: f32, rate: f32) -> Self {
        Self {
            first_time: true,
            min_cutoff,
            beta,
            rate,
            d_cutoff: 1.0,
            x_filt: LowpassFilter::new(),
            dx_filt: LowpassFilter::new(),
        }
    }

    /// Feed one raw sample, producing the smoothed value. The first call
    /// for a channel bypasses filtering and returns the raw input.
    pub fn update(&mut self, x: f32) -> f32 {
        let dx = if self.first_time {
            0.0
        } else {
            (x - self.x_filt.last()) * self.rate
        };
        self.first_time = false;

        let d_alpha = self.alpha(self.d_cutoff);
        let edx = self.dx_filt.filter(dx, d_alpha);

        let cutoff = self.min_cutoff + self.beta * edx.abs();
        let a = self.alpha(cutoff);
        self.x_filt.filter(x, a)
    }

    /// Restore the pre-first-call state.
    pub fn reset(&mut self) {
        self.first_time = true;
        self.x_filt = LowpassFilter::new();
        self.dx_filt = LowpassFilter::new();
    }

    fn alpha(&self, cutoff: f32) -> f32 {
        let tau = 1.0 / (2.0 * PI * cutoff);
        let te = 1.0 / self.rate;
        1.0 / (1.0 + tau / te)
    }
}
