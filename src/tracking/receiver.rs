//! Gaze frame JSON-over-UDP receiver
//!
//! Receives one JSON datagram per tracker frame from the vendor helper
//! process. The socket is non-blocking and polled from the pipeline
//! task; an empty socket is not an error, a malformed datagram is.

use std::net::UdpSocket;
use std::time::Duration;

use crate::config::TrackerConfig;
use crate::error::{GazebridgeError, TrackingError};
use crate::tracking::GazeFrame;

/// Inbound gaze frame receiver
pub struct GazeReceiver {
    config: TrackerConfig,
    socket: Option<UdpSocket>,
}

impl GazeReceiver {
    /// Create a new receiver (does not bind yet)
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            config: config.clone(),
            socket: None,
        }
    }

    /// Bind the UDP socket and start receiving
    pub fn start(&mut self) -> Result<(), GazebridgeError> {
        let addr = format!("{}:{}", self.config.listen_address, self.config.port);

        let socket = UdpSocket::bind(&addr).map_err(|e| {
            TrackingError::Receiver(format!("Failed to bind to {}: {}", addr, e))
        })?;

        socket.set_nonblocking(true).map_err(|e| {
            TrackingError::Receiver(format!("Failed to set non-blocking: {}", e))
        })?;

        socket
            .set_read_timeout(Some(Duration::from_millis(100)))
            .ok();

        tracing::info!("Gaze receiver listening on {}", addr);
        self.socket = Some(socket);

        Ok(())
    }

    /// Poll for the next frame (non-blocking). Returns `Ok(None)` when no
    /// datagram is waiting, so the pipeline runs exactly once per frame.
    pub async fn process(&self) -> Result<Option<GazeFrame>, GazebridgeError> {
        let socket = match &self.socket {
            Some(s) => s,
            None => return Ok(None),
        };

        let mut buf = [0u8; 1024];

        match socket.recv(&mut buf) {
            Ok(size) if size > 0 => {
                let frame: GazeFrame = serde_json::from_slice(&buf[..size])
                    .map_err(|e| TrackingError::Parse(format!("JSON parse error: {}", e)))?;
                Ok(Some(frame))
            }
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                // No data available
                Ok(None)
            }
            Err(e) => Err(TrackingError::Receiver(format!("Receive error: {}", e)).into()),
        }
    }

    /// Stop the receiver
    pub fn stop(&mut self) {
        self.socket = None;
        tracing::info!("Gaze receiver stopped");
    }
}
