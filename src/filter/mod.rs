//! Per-channel smoothing strategies
//!
//! Two interchangeable filters consume one raw scalar per frame and
//! produce one smoothed scalar: a deadband moving average (the default)
//! and an adaptive 1-euro low-pass. Which one runs is decided once from
//! configuration; there is no per-frame strategy branching on data.

pub mod moving_average;
pub mod one_euro;

pub use moving_average::DeadbandAverage;
pub use one_euro::OneEuroFilter;

use crate::config::{PipelineConfig, SmoothingMode};

/// One smoothed channel (leftX, rightX, leftY or rightY), dispatching to
/// the configured strategy.
#[derive(Debug, Clone)]
pub enum ChannelFilter {
    Deadband(DeadbandAverage),
    OneEuro(OneEuroFilter),
}

impl ChannelFilter {
    /// Build one channel filter from the pipeline configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        match config.smoothing {
            SmoothingMode::Deadband => Self::Deadband(DeadbandAverage::new(
                config.average_steps,
                config.buffer_frames,
            )),
            SmoothingMode::OneEuro => Self::OneEuro(OneEuroFilter::new(
                config.one_euro.min_cutoff,
                config.one_euro.beta,
                config.one_euro.rate,
            )),
        }
    }

    /// Feed one raw sample, producing the smoothed value.
    pub fn update(&mut self, x: f32) -> f32 {
        match self {
            Self::Deadband(f) => f.update(x),
            Self::OneEuro(f) => f.update(x),
        }
    }

    /// Clear all filter state.
    pub fn reset(&mut self) {
        match self {
            Self::Deadband(f) => f.reset(),
            Self::OneEuro(f) => f.reset(),
        }
    }
}
