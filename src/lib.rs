//! Gazebridge - Headless Eye-Gaze OSC Bridge
//!
//! A small Rust service that conditions noisy per-eye gaze-tracker
//! samples into smoothed avatar control parameters:
//! - Receives raw gaze frames over UDP (one datagram per tracker frame)
//! - Handles per-eye tracking loss with hysteresis and fallback
//! - Smooths each channel with a deadband moving average or a 1-euro filter
//! - Normalizes into [-1, 1] and emits OSC messages to the avatar host

pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod pipeline;
pub mod tracking;

pub use config::Config;
pub use error::{GazebridgeError, Result};

use std::sync::Arc;
use tokio::sync::{broadcast, Notify, RwLock};

/// Any sample at or below this value is the tracker's "no data" sentinel,
/// not a real position. The same threshold clamps the deadband filter.
pub const TRACKING_EPSILON: f32 = 1e-5;

/// Application state shared across all tasks
#[derive(Debug)]
pub struct AppState {
    /// Current configuration
    pub config: RwLock<Config>,
    /// Shutdown signal
    pub shutdown_tx: broadcast::Sender<()>,
    /// Recalibrate signal (resets all pipeline state)
    pub recalibrate: Notify,
}

impl AppState {
    /// Create a new application state with the given configuration
    pub fn new(config: Config) -> Arc<Self> {
        let (shutdown_tx, _) = broadcast::channel(1);

        Arc::new(Self {
            config: RwLock::new(config),
            shutdown_tx,
            recalibrate: Notify::new(),
        })
    }

    /// Subscribe to shutdown signal
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Signal the pipeline to recalibrate
    pub fn signal_recalibrate(&self) {
        self.recalibrate.notify_one();
    }

    /// Wait for a recalibrate signal
    pub async fn wait_recalibrate(&self) {
        self.recalibrate.notified().await;
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
