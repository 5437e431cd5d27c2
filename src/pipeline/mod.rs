//! Signal-conditioning pipeline
//!
//! Per-frame chain from raw gaze samples to outgoing avatar parameters:
//! tracking-loss resolution, per-channel smoothing, range normalization
//! and blink timing, orchestrated by [`FrameConditioner`].

pub mod blink;
pub mod conditioner;
pub mod loss;

pub use blink::BlinkDetector;
pub use conditioner::FrameConditioner;
pub use loss::{LossResolver, ResolvedFrame};
