//! Per-frame pipeline orchestration
//!
//! One `FrameConditioner` owns every piece of mutable pipeline state:
//! the four channel filters, the per-eye fallback trackers and the blink
//! timer. Each inbound frame runs the full chain synchronously —
//! resolve tracking loss, smooth per channel, normalize, scale, combine
//! the vertical axis, time the eyelids — and yields the ordered
//! parameter batch for the OSC sink.

use crate::config::{MinMaxRange, OscAddresses, PipelineConfig};
use crate::filter::ChannelFilter;
use crate::pipeline::blink::BlinkDetector;
use crate::pipeline::loss::LossResolver;
use crate::tracking::GazeFrame;
use crate::TRACKING_EPSILON;

/// The signal-conditioning pipeline for one tracker.
#[derive(Debug)]
pub struct FrameConditioner {
    left_x: ChannelFilter,
    right_x: ChannelFilter,
    left_y: ChannelFilter,
    right_y: ChannelFilter,
    resolver: LossResolver,
    blink: BlinkDetector,
    config: PipelineConfig,
    addresses: OscAddresses,
}

impl FrameConditioner {
    /// Build the pipeline from validated configuration.
    pub fn new(config: &PipelineConfig, addresses: &OscAddresses) -> Self {
        Self {
            left_x: ChannelFilter::from_config(config),
            right_x: ChannelFilter::from_config(config),
            left_y: ChannelFilter::from_config(config),
            right_y: ChannelFilter::from_config(config),
            resolver: LossResolver::new(config.buffer_frames),
            blink: BlinkDetector::new(config.blink_frames),
            config: config.clone(),
            addresses: addresses.clone(),
        }
    }

    /// Condition one raw frame into the ordered outgoing parameter batch:
    /// left X, right X, combined vertical, left eyelid, right eyelid.
    pub fn condition(&mut self, frame: &GazeFrame) -> Vec<(&str, f32)> {
        let resolved = self.resolver.resolve(frame);

        let left_x = self.left_x.update(resolved.left[0]);
        let right_x = self.right_x.update(resolved.right[0]);
        let left_y = self.left_y.update(resolved.left[1]);
        let right_y = self.right_y.update(resolved.right[1]);

        let left_x_n = normalize_centered(left_x, &self.config.x_left_range);
        let right_x_n = normalize_centered(right_x, &self.config.x_right_range);
        let left_y_n = normalize_centered(left_y, &self.config.y_left_range);
        let right_y_n = normalize_centered(right_y, &self.config.y_right_range);

        // Intentionally asymmetric: the right eye contributes at half
        // weight, and the screen-space Y axis is inverted for the avatar
        let y_combined = -(left_y_n + right_y_n / 2.0) * self.config.multiplier_y;

        let eyelid = self.blink.update(resolved.left_lost, resolved.right_lost);

        tracing::trace!(
            left_x = left_x_n,
            right_x = right_x_n,
            y = y_combined,
            eyelid,
            "conditioned frame"
        );

        vec![
            (
                self.addresses.eye_x_left.as_str(),
                left_x_n * self.config.multiplier_x,
            ),
            (
                self.addresses.eye_x_right.as_str(),
                right_x_n * self.config.multiplier_x,
            ),
            (self.addresses.eye_y.as_str(), y_combined),
            (self.addresses.eyelid_left.as_str(), eyelid),
            (self.addresses.eyelid_right.as_str(), eyelid),
        ]
    }

    /// Clear all filter, fallback and blink state. Used by the
    /// recalibrate trigger so every gate re-warms from scratch.
    pub fn reset(&mut self) {
        self.left_x.reset();
        self.right_x.reset();
        self.left_y.reset();
        self.right_y.reset();
        self.resolver.reset();
        self.blink.reset();
    }
}

/// Normalize a smoothed value into [-1, 1], treating the deadband zero
/// as "centered". A smoothed value at or below epsilon means the window
/// is still warming or the signal is at rest; either way the avatar eye
/// should sit at center rather than at `normalize(0)` (the left edge of
/// the calibrated range).
fn normalize_centered(value: f32, range: &MinMaxRange) -> f32 {
    if value <= TRACKING_EPSILON {
        0.0
    } else {
        range.normalize(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MinMaxRange, SmoothingMode};

    fn frame(left_x: f32, left_y: f32, right_x: f32, right_y: f32) -> GazeFrame {
        GazeFrame {
            left_x,
            left_y,
            right_x,
            right_y,
            active: true,
        }
    }

    fn value(batch: &[(&str, f32)], addr: &str) -> f32 {
        batch
            .iter()
            .find(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .unwrap()
    }

    #[test]
    fn test_batch_order_and_addresses() {
        let config = PipelineConfig::default();
        let addresses = OscAddresses::default();
        let mut conditioner = FrameConditioner::new(&config, &addresses);

        let batch = conditioner.condition(&frame(0.5, 0.5, 0.5, 0.5));
        let addrs: Vec<&str> = batch.iter().map(|(a, _)| *a).collect();
        assert_eq!(
            addrs,
            vec![
                "/avatar/parameters/LeftEyeX",
                "/avatar/parameters/RightEyeX",
                "/avatar/parameters/EyesY",
                "/avatar/parameters/LeftEyeLid",
                "/avatar/parameters/RightEyeLid",
            ]
        );
    }

    #[test]
    fn test_constant_input_round_trip() {
        let mut config = PipelineConfig::default();
        config.average_steps = 4;
        config.buffer_frames = 4;
        config.multiplier_x = 2.0;
        let addresses = OscAddresses::default();
        let mut conditioner = FrameConditioner::new(&config, &addresses);

        // Feed a constant valid sample well past window and warm-up
        let mut left_x = 0.0;
        let mut right_x = 0.0;
        let mut eye_y = 0.0;
        for _ in 0..12 {
            let batch = conditioner.condition(&frame(0.6, 0.6, 0.6, 0.6));
            left_x = value(&batch, "/avatar/parameters/LeftEyeX");
            right_x = value(&batch, "/avatar/parameters/RightEyeX");
            eye_y = value(&batch, "/avatar/parameters/EyesY");
        }

        let expected = config.x_left_range.normalize(0.6) * 2.0;
        assert!((left_x - expected).abs() < 1e-5);
        assert!((right_x - expected).abs() < 1e-5);

        let y_n = config.y_left_range.normalize(0.6);
        let expected_y = -(y_n + y_n / 2.0);
        assert!((eye_y - expected_y).abs() < 1e-5);
    }

    #[test]
    fn test_single_eye_warms_through_commit_delay() {
        // Left eye steady, right eye never tracks, no prior history:
        // the left channel stays centered through the loss debounce
        // (4 frames of substituted zeros) plus the filter warm-up, then
        // snaps to the normalized input.
        let mut config = PipelineConfig::default();
        config.average_steps = 4;
        config.buffer_frames = 4;
        let addresses = OscAddresses::default();
        let mut conditioner = FrameConditioner::new(&config, &addresses);

        let mut outputs = Vec::new();
        for _ in 0..8 {
            let batch = conditioner.condition(&frame(0.75, 0.75, 0.0, 0.0));
            outputs.push(value(&batch, "/avatar/parameters/LeftEyeX"));
        }

        for out in &outputs[..7] {
            assert_eq!(*out, 0.0);
        }
        let expected = config.x_left_range.normalize(0.75);
        assert!((outputs[7] - expected).abs() < 1e-5);
    }

    #[test]
    fn test_bilateral_loss_centers_not_left_edge() {
        let config = PipelineConfig::default();
        let addresses = OscAddresses::default();
        let mut conditioner = FrameConditioner::new(&config, &addresses);

        // No tracking at all: outputs are centered zeros, not
        // normalize(0) = -1
        let batch = conditioner.condition(&frame(0.0, 0.0, 0.0, 0.0));
        assert_eq!(value(&batch, "/avatar/parameters/LeftEyeX"), 0.0);
        assert_eq!(value(&batch, "/avatar/parameters/RightEyeX"), 0.0);
        assert_eq!(value(&batch, "/avatar/parameters/EyesY"), 0.0);
    }

    #[test]
    fn test_blink_timing_through_pipeline() {
        let mut config = PipelineConfig::default();
        config.blink_frames = 2;
        let addresses = OscAddresses::default();
        let mut conditioner = FrameConditioner::new(&config, &addresses);

        // Warm up with valid samples, then drop both eyes
        for _ in 0..4 {
            let batch = conditioner.condition(&frame(0.5, 0.5, 0.5, 0.5));
            assert_eq!(value(&batch, "/avatar/parameters/LeftEyeLid"), 1.0);
        }

        let first_loss = value(
            &conditioner.condition(&frame(0.0, 0.0, 0.0, 0.0)),
            "/avatar/parameters/LeftEyeLid",
        );
        assert_eq!(first_loss, 1.0);

        let batch = conditioner.condition(&frame(0.0, 0.0, 0.0, 0.0));
        assert_eq!(value(&batch, "/avatar/parameters/LeftEyeLid"), 0.0);
        assert_eq!(value(&batch, "/avatar/parameters/RightEyeLid"), 0.0);

        // First valid frame reopens both lids
        let reopened = value(
            &conditioner.condition(&frame(0.5, 0.5, 0.0, 0.0)),
            "/avatar/parameters/LeftEyeLid",
        );
        assert_eq!(reopened, 1.0);
    }

    #[test]
    fn test_asymmetric_vertical_combination() {
        // Distinct calibrated ranges per eye make the half-weighted
        // right-eye contribution visible
        let mut config = PipelineConfig::default();
        config.average_steps = 1;
        config.buffer_frames = 0;
        config.y_right_range = MinMaxRange::new(0.2, 0.8);
        config.multiplier_y = 1.5;
        let addresses = OscAddresses::default();
        let mut conditioner = FrameConditioner::new(&config, &addresses);

        let batch = conditioner.condition(&frame(0.6, 0.6, 0.6, 0.6));

        let left_n = config.y_left_range.normalize(0.6);
        let right_n = config.y_right_range.normalize(0.6);
        let expected = -(left_n + right_n / 2.0) * 1.5;
        assert!((value(&batch, "/avatar/parameters/EyesY") - expected).abs() < 1e-5);
    }

    #[test]
    fn test_one_euro_pipeline_passes_first_frame() {
        let mut config = PipelineConfig::default();
        config.smoothing = SmoothingMode::OneEuro;
        config.buffer_frames = 0;
        let addresses = OscAddresses::default();
        let mut conditioner = FrameConditioner::new(&config, &addresses);

        // With no loss debounce, the adaptive filter passes the first
        // raw sample straight through
        let batch = conditioner.condition(&frame(0.75, 0.75, 0.75, 0.75));
        let expected = config.x_left_range.normalize(0.75);
        assert!((value(&batch, "/avatar/parameters/LeftEyeX") - expected).abs() < 1e-5);
    }

    #[test]
    fn test_reset_restarts_warmup() {
        let mut config = PipelineConfig::default();
        config.average_steps = 4;
        config.buffer_frames = 2;
        let addresses = OscAddresses::default();
        let mut conditioner = FrameConditioner::new(&config, &addresses);

        let mut warmed = 0.0;
        for _ in 0..8 {
            let batch = conditioner.condition(&frame(0.75, 0.75, 0.75, 0.75));
            warmed = value(&batch, "/avatar/parameters/LeftEyeX");
        }
        assert!(warmed > 0.0);

        conditioner.reset();
        let batch = conditioner.condition(&frame(0.75, 0.75, 0.75, 0.75));
        assert_eq!(value(&batch, "/avatar/parameters/LeftEyeX"), 0.0);
    }
}
