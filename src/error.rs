//! Error types for gazebridge

use thiserror::Error;

/// Main error type for gazebridge
#[derive(Error, Debug)]
pub enum GazebridgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Inbound gaze receiver errors
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Gaze receiver error: {0}")]
    Receiver(String),

    #[error("Gaze frame parse error: {0}")]
    Parse(String),
}

/// Outbound OSC sink errors
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to bind OSC socket: {0}")]
    Bind(String),

    #[error("OSC encode error: {0}")]
    Encode(String),

    #[error("OSC send error: {0}")]
    Send(String),
}

/// Result type alias for gazebridge operations
pub type Result<T> = std::result::Result<T, GazebridgeError>;
