//! Relay link packets and the two ends of the link.
//!
//! A relay node switches a mains relay and reports its state; a controller
//! asks it to toggle and mirrors the reported state. Packets are fixed-size:
//! a 1-byte status and a 4-byte little-endian command. Anything whose length
//! does not match is dropped by the receiver.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Command value that flips the relay.
pub const CMD_TOGGLE: i32 = 1;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    #[error("packet length {found} does not match expected {expected}")]
    WrongLength { expected: usize, found: usize },

    #[error("packet could not be decoded")]
    Malformed,

    #[error("output buffer too small")]
    BufferTooSmall,
}

impl From<postcard::Error> for LinkError {
    fn from(err: postcard::Error) -> Self {
        match err {
            postcard::Error::SerializeBufferFull => Self::BufferTooSmall,
            _ => Self::Malformed,
        }
    }
}

/// Fixed-layout packet with an exact wire size.
pub trait Packet: Serialize + for<'de> Deserialize<'de> {
    const SIZE: usize;

    fn encode<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], LinkError> {
        Ok(postcard::to_slice(self, buf)?)
    }

    fn decode(bytes: &[u8]) -> Result<Self, LinkError> {
        if bytes.len() != Self::SIZE {
            return Err(LinkError::WrongLength {
                expected: Self::SIZE,
                found: bytes.len(),
            });
        }
        Ok(postcard::from_bytes(bytes)?)
    }
}

/// Relay node to controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPacket {
    pub relay_on: bool,
}

impl Packet for StatusPacket {
    const SIZE: usize = 1;
}

/// Controller to relay node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPacket {
    #[serde(with = "postcard::fixint::le")]
    pub command: i32,
}

impl Packet for CommandPacket {
    const SIZE: usize = 4;
}

impl CommandPacket {
    pub const TOGGLE: Self = Self {
        command: CMD_TOGGLE,
    };
}

/// The switching end. Starts with the relay released.
#[derive(Debug, Default, Clone)]
pub struct RelayNode {
    relay_on: bool,
    last_command_ms: Option<u64>,
}

impl RelayNode {
    pub const fn new() -> Self {
        Self {
            relay_on: false,
            last_command_ms: None,
        }
    }

    pub const fn status(&self) -> StatusPacket {
        StatusPacket {
            relay_on: self.relay_on,
        }
    }

    /// Pin level for the relay driver, which is active-low.
    pub const fn output_high(&self) -> bool {
        !self.relay_on
    }

    pub const fn last_command_ms(&self) -> Option<u64> {
        self.last_command_ms
    }

    /// Flip the relay locally (button or web route) and return the status to
    /// broadcast.
    pub fn toggle(&mut self) -> StatusPacket {
        self.relay_on = !self.relay_on;
        debug!("relay {}", if self.relay_on { "on" } else { "off" });
        self.status()
    }

    /// Handle a received command. Every well-formed command is answered with
    /// the resulting status; unknown command values only refresh it.
    pub fn handle_command(&mut self, bytes: &[u8], now_ms: u64) -> Result<StatusPacket, LinkError> {
        let packet = CommandPacket::decode(bytes).inspect_err(|e| warn!("dropping command: {e}"))?;
        self.last_command_ms = Some(now_ms);
        if packet.command == CMD_TOGGLE {
            return Ok(self.toggle());
        }
        Ok(self.status())
    }
}

/// The commanding end, mirroring the last reported relay state.
#[derive(Debug, Default, Clone)]
pub struct RelayController {
    remote: Option<bool>,
}

impl RelayController {
    pub const fn new() -> Self {
        Self { remote: None }
    }

    /// Last reported state, `None` until the node has answered once.
    pub const fn remote_state(&self) -> Option<bool> {
        self.remote
    }

    pub fn handle_status(&mut self, bytes: &[u8]) -> Result<bool, LinkError> {
        let status = StatusPacket::decode(bytes).inspect_err(|e| warn!("dropping status: {e}"))?;
        self.remote = Some(status.relay_on);
        Ok(status.relay_on)
    }

    pub fn toggle_command(&self) -> CommandPacket {
        CommandPacket::TOGGLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_four_bytes_little_endian() {
        let mut buf = [0u8; 8];
        let bytes = CommandPacket::TOGGLE.encode(&mut buf).unwrap();
        assert_eq!(bytes, [1u8, 0, 0, 0]);

        let negative = CommandPacket { command: -2 };
        let bytes = negative.encode(&mut buf).unwrap();
        assert_eq!(bytes, [0xFEu8, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn status_is_one_byte() {
        let mut buf = [0u8; 4];
        let bytes = StatusPacket { relay_on: true }.encode(&mut buf).unwrap();
        assert_eq!(bytes, [1u8]);
        assert_eq!(
            StatusPacket::decode(&[0]),
            Ok(StatusPacket { relay_on: false })
        );
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert_eq!(
            CommandPacket::decode(&[1, 0, 0]),
            Err(LinkError::WrongLength {
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            StatusPacket::decode(&[1, 0]),
            Err(LinkError::WrongLength {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn node_toggles_on_command_one_only() {
        let mut node = RelayNode::new();
        assert!(node.output_high());

        let status = node.handle_command(&[1, 0, 0, 0], 10).unwrap();
        assert!(status.relay_on);
        assert!(!node.output_high());

        let status = node.handle_command(&[7, 0, 0, 0], 20).unwrap();
        assert!(status.relay_on);
        assert_eq!(node.last_command_ms(), Some(20));
    }

    #[test]
    fn malformed_command_leaves_node_untouched() {
        let mut node = RelayNode::new();
        assert!(node.handle_command(&[1, 0], 5).is_err());
        assert!(!node.status().relay_on);
        assert_eq!(node.last_command_ms(), None);
    }

    #[test]
    fn controller_mirrors_remote_state() {
        let mut node = RelayNode::new();
        let mut controller = RelayController::new();
        assert_eq!(controller.remote_state(), None);

        let mut buf = [0u8; 4];
        let command = controller.toggle_command().encode(&mut buf).unwrap().len();
        let reply = node.handle_command(&buf[..command], 0).unwrap();

        let mut out = [0u8; 1];
        let bytes = reply.encode(&mut out).unwrap();
        assert_eq!(controller.handle_status(bytes), Ok(true));
        assert_eq!(controller.remote_state(), Some(true));
    }

    #[test]
    fn local_toggle_reports_new_state() {
        let mut node = RelayNode::new();
        assert!(node.toggle().relay_on);
        assert!(!node.toggle().relay_on);
    }
}
