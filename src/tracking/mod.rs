//! Tracking module
//!
//! Inbound raw-sample glue: a UDP receiver for per-frame gaze samples
//! forwarded by the tracker helper process.

pub mod receiver;

pub use receiver::GazeReceiver;

use serde::Deserialize;

/// One raw tracker frame: four per-eye screen-space coordinates,
/// nominally in [0, 1]. A coordinate at or below the tracking epsilon is
/// the "no data" sentinel, not a real position.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GazeFrame {
    /// Left pupil center X
    pub left_x: f32,
    /// Right pupil center X
    pub right_x: f32,
    /// Left pupil center Y
    pub left_y: f32,
    /// Right pupil center Y
    pub right_y: f32,
    /// Producer liveness flag; inactive frames never reach the pipeline
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_json() {
        let json = r#"{"left_x":0.42,"right_x":0.44,"left_y":0.5,"right_y":0.51}"#;
        let frame: GazeFrame = serde_json::from_str(json).unwrap();
        assert!((frame.left_x - 0.42).abs() < 1e-6);
        assert!((frame.right_y - 0.51).abs() < 1e-6);
        // Liveness flag defaults to true when omitted
        assert!(frame.active);
    }

    #[test]
    fn test_parse_inactive_frame() {
        let json =
            r#"{"left_x":0.0,"right_x":0.0,"left_y":0.0,"right_y":0.0,"active":false}"#;
        let frame: GazeFrame = serde_json::from_str(json).unwrap();
        assert!(!frame.active);
    }
}
