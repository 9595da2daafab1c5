//! One-step encode+frame and deframe+decode

use tracing::debug;

use crate::codec::{self, Codec};
use crate::frame::{deframe, frame};
use crate::Result;

/// A decoded packet
#[derive(Debug, Clone, PartialEq)]
pub struct Packet<T> {
    /// Message id from the frame header
    pub message_id: u8,
    /// Decoded payload value
    pub value: T,
}

/// Encode `value` and wrap it in a frame
pub fn create_packet<T: Codec>(message_id: u8, value: &T) -> Result<Vec<u8>> {
    let payload = codec::encode(value)?;
    frame(message_id, &payload)
}

/// Deframe `wire` and decode its payload as `T`.
///
/// # Errors
///
/// Returns [`Error::Frame`](crate::Error::Frame) if the frame is invalid, or
/// the decode error if the payload is not a valid `T`.
pub fn parse_packet<T: Codec>(wire: &[u8]) -> Result<Packet<T>> {
    let frame = deframe(wire)?;
    let value = codec::decode(&frame.payload)?;
    Ok(Packet {
        message_id: frame.message_id,
        value,
    })
}

/// Lossy form of [`parse_packet`]: `(true, value)` on success, otherwise
/// `(false, T::default())`. The failure reason is only logged.
pub fn parse_packet_or_default<T: Codec + Default>(wire: &[u8]) -> (bool, T) {
    match parse_packet(wire) {
        Ok(packet) => (true, packet.value),
        Err(err) => {
            debug!(error = %err, "discarding unparseable packet");
            (false, T::default())
        }
    }
}
