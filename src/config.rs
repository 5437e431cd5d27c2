//! Configuration parsing and management for gazebridge

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, GazebridgeError};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracker: TrackerConfig,
    pub osc: OscConfig,
    pub pipeline: PipelineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            osc: OscConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GazebridgeError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> Result<Self, GazebridgeError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, GazebridgeError> {
        // Try config paths in order
        let paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("config/default.toml"),
            dirs_path().join("config.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration. The pipeline never runs with values
    /// that would make it divide by zero or allocate an empty window.
    pub fn validate(&self) -> Result<(), GazebridgeError> {
        if self.pipeline.average_steps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.average_steps".to_string(),
                message: "Smoothing window must be greater than 0".to_string(),
            }
            .into());
        }

        if self.pipeline.blink_frames == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.blink_frames".to_string(),
                message: "Blink threshold must be greater than 0".to_string(),
            }
            .into());
        }

        for (field, range) in [
            ("pipeline.x_left_range", &self.pipeline.x_left_range),
            ("pipeline.x_right_range", &self.pipeline.x_right_range),
            ("pipeline.y_left_range", &self.pipeline.y_left_range),
            ("pipeline.y_right_range", &self.pipeline.y_right_range),
        ] {
            if range.max <= range.min {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!(
                        "Range max ({}) must be greater than min ({})",
                        range.max, range.min
                    ),
                }
                .into());
            }
        }

        if self.pipeline.one_euro.min_cutoff <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.one_euro.min_cutoff".to_string(),
                message: "Minimum cutoff must be greater than 0".to_string(),
            }
            .into());
        }

        if self.pipeline.one_euro.rate <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.one_euro.rate".to_string(),
                message: "Frame rate must be greater than 0".to_string(),
            }
            .into());
        }

        if self.pipeline.one_euro.beta < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.one_euro.beta".to_string(),
                message: "Beta must not be negative".to_string(),
            }
            .into());
        }

        if self.osc.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "osc.port".to_string(),
                message: "Port must be greater than 0".to_string(),
            }
            .into());
        }

        if self.tracker.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tracker.port".to_string(),
                message: "Port must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// A calibrated [min, max] input range for one gaze axis.
///
/// Owned by configuration and read-only to the pipeline; `Config::validate`
/// rejects `max <= min` so `normalize` never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxRange {
    pub min: f32,
    pub max: f32,
}

impl MinMaxRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Linear-map a raw value from [min, max] into [-1, 1].
    pub fn normalize(&self, value: f32) -> f32 {
        let slope = 2.0 / (self.max - self.min);
        -1.0 + slope * (value - self.min)
    }
}

impl Default for MinMaxRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

/// Smoothing strategy selection. A configuration choice, not a runtime
/// branch on data — every channel filter is constructed once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Deadband moving average with warm-up hysteresis
    Deadband,
    /// Adaptive low-pass (1-euro) filter
    OneEuro,
}

impl Default for SmoothingMode {
    fn default() -> Self {
        Self::Deadband
    }
}

/// Inbound gaze frame receiver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Listen address for the UDP socket
    pub listen_address: String,
    /// UDP port to receive gaze frames on
    pub port: u16,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            listen_address: "127.0.0.1".to_string(),
            port: 9015,
        }
    }
}

/// Outbound OSC sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OscConfig {
    /// OSC target host
    pub host: String,
    /// OSC target port
    pub port: u16,
    /// Output parameter addresses
    pub addresses: OscAddresses,
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9000,
            addresses: OscAddresses::default(),
        }
    }
}

/// The five output parameter address strings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OscAddresses {
    pub eye_x_left: String,
    pub eye_x_right: String,
    pub eye_y: String,
    pub eyelid_left: String,
    pub eyelid_right: String,
}

impl Default for OscAddresses {
    fn default() -> Self {
        Self {
            eye_x_left: "/avatar/parameters/LeftEyeX".to_string(),
            eye_x_right: "/avatar/parameters/RightEyeX".to_string(),
            eye_y: "/avatar/parameters/EyesY".to_string(),
            eyelid_left: "/avatar/parameters/LeftEyeLid".to_string(),
            eyelid_right: "/avatar/parameters/RightEyeLid".to_string(),
        }
    }
}

/// Signal-conditioning parameters, immutable after load
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Step count for the smoothing window
    #[serde(default = "default_average_steps")]
    pub average_steps: usize,
    /// Frames an eye must report valid samples before it is trusted again
    /// after tracking loss; also the filter warm-up cap
    #[serde(default = "default_buffer_frames")]
    pub buffer_frames: u32,
    /// Frames of bilateral loss required before reporting a blink
    #[serde(default = "default_blink_frames")]
    pub blink_frames: u32,
    /// Frames of single-eye loss required before reporting a wink.
    /// Parsed and carried for config compatibility; the detector currently
    /// reports both eyelids from the shared bilateral counter.
    #[serde(default = "default_wink_frames")]
    pub wink_frames: u32,
    /// Horizontal output multiplier
    #[serde(default = "default_multiplier")]
    pub multiplier_x: f32,
    /// Vertical output multiplier
    #[serde(default = "default_multiplier")]
    pub multiplier_y: f32,
    /// Active smoothing strategy
    pub smoothing: SmoothingMode,
    /// 1-euro filter parameters (used when smoothing = "one_euro")
    pub one_euro: OneEuroConfig,
    /// Calibrated input ranges, one per axis per eye
    pub x_left_range: MinMaxRange,
    pub x_right_range: MinMaxRange,
    pub y_left_range: MinMaxRange,
    pub y_right_range: MinMaxRange,
}

fn default_average_steps() -> usize {
    10
}
fn default_buffer_frames() -> u32 {
    4
}
fn default_blink_frames() -> u32 {
    2
}
fn default_wink_frames() -> u32 {
    6
}
fn default_multiplier() -> f32 {
    1.0
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            average_steps: default_average_steps(),
            buffer_frames: default_buffer_frames(),
            blink_frames: default_blink_frames(),
            wink_frames: default_wink_frames(),
            multiplier_x: default_multiplier(),
            multiplier_y: default_multiplier(),
            smoothing: SmoothingMode::default(),
            one_euro: OneEuroConfig::default(),
            x_left_range: MinMaxRange::default(),
            x_right_range: MinMaxRange::default(),
            y_left_range: MinMaxRange::default(),
            y_right_range: MinMaxRange::default(),
        }
    }
}

/// 1-euro filter tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct OneEuroConfig {
    /// Minimum cutoff frequency (Hz) - lower = smoother at rest
    pub min_cutoff: f32,
    /// Speed coefficient - higher = less lag during fast motion
    pub beta: f32,
    /// Tracker frame rate (Hz) the filter coefficients are derived from
    pub rate: f32,
}

impl Default for OneEuroConfig {
    fn default() -> Self {
        Self {
            min_cutoff: 1.0,
            beta: 0.3,
            rate: 120.0,
        }
    }
}

/// Get the platform-specific configuration directory
fn dirs_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(config_dir).join("gazebridge");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config/gazebridge");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Application Support/gazebridge");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("gazebridge");
        }
    }

    PathBuf::from(".")
}
