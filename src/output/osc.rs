//! OSC message sender
//!
//! Encodes each (address, value) pair as a single OSC message and sends
//! it as its own UDP datagram, matching what avatar hosts expect for
//! parameter updates. Delivery is best-effort: no acknowledgement, no
//! retry, and a dropped packet is simply superseded by the next frame.

use rosc::{encoder, OscMessage, OscPacket, OscType};
use std::net::UdpSocket;

use crate::config::OscConfig;
use crate::error::{GazebridgeError, OutputError};

/// Fire-and-forget OSC sink over UDP
pub struct OscSender {
    socket: UdpSocket,
}

impl OscSender {
    /// Bind an ephemeral local socket and connect it to the OSC target.
    pub fn new(config: &OscConfig) -> Result<Self, GazebridgeError> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| OutputError::Bind(e.to_string()))?;

        let target = format!("{}:{}", config.host, config.port);
        socket
            .connect(&target)
            .map_err(|e| OutputError::Bind(format!("Failed to connect to {}: {}", target, e)))?;

        tracing::info!("OSC sender targeting {}", target);

        Ok(Self { socket })
    }

    /// Send one ordered batch, one datagram per parameter.
    pub fn send_batch(&self, batch: &[(&str, f32)]) -> Result<(), GazebridgeError> {
        for (addr, value) in batch {
            let packet = OscPacket::Message(OscMessage {
                addr: addr.to_string(),
                args: vec![OscType::Float(*value)],
            });

            let buf = encoder::encode(&packet)
                .map_err(|e| OutputError::Encode(e.to_string()))?;

            self.socket
                .send(&buf)
                .map_err(|e| OutputError::Send(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OscConfig;

    #[test]
    fn test_send_batch_reaches_socket() {
        // Stand up a local listener as the OSC target
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        listener
            .set_read_timeout(Some(std::time::Duration::from_secs(1)))
            .unwrap();

        let config = OscConfig {
            host: "127.0.0.1".to_string(),
            port,
            ..Default::default()
        };
        let sender = OscSender::new(&config).unwrap();

        sender
            .send_batch(&[("/avatar/parameters/LeftEyeX", 0.25)])
            .unwrap();

        let mut buf = [0u8; 512];
        let size = listener.recv(&mut buf).unwrap();
        let (_, packet) = rosc::decoder::decode_udp(&buf[..size]).unwrap();

        match packet {
            OscPacket::Message(msg) => {
                assert_eq!(msg.addr, "/avatar/parameters/LeftEyeX");
                assert_eq!(msg.args, vec![OscType::Float(0.25)]);
            }
            _ => panic!("expected a single OSC message"),
        }
    }
}
