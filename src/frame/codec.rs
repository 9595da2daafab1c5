//! Whole-buffer frame encoding and validation

use bytes::{BufMut, Bytes};

use super::{
    END_BYTE, ESCAPE_BYTE, ESCAPE_XOR, FRAME_OVERHEAD, FrameError, HEADER_SIZE, MAX_PAYLOAD_LEN,
    START_BYTE, TRAILER_SIZE, needs_escape,
};
use crate::checksum::crc16;
use crate::{Error, Result};

/// A validated frame: message id plus unescaped payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Application message id
    pub message_id: u8,
    /// Payload bytes, escaping removed
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame
    pub fn new(message_id: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            message_id,
            payload: payload.into(),
        }
    }

    /// Encode to wire bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        frame(self.message_id, &self.payload)
    }
}

/// Wrap `payload` in a frame.
///
/// The frame is assembled unstuffed (ID, length, payload, CRC) and then every
/// byte between the markers is escaped as needed.
///
/// # Errors
///
/// Returns [`Error::PayloadTooLarge`] if the payload does not fit the 16-bit
/// length field.
pub fn frame(message_id: u8, payload: &[u8]) -> Result<Vec<u8>> {
    let len = u16::try_from(payload.len()).map_err(|_| Error::PayloadTooLarge {
        size: payload.len(),
        max: MAX_PAYLOAD_LEN,
    })?;

    let mut body = Vec::with_capacity(payload.len() + FRAME_OVERHEAD - 2);
    body.put_u8(message_id);
    body.put_u16_le(len);
    body.put_slice(payload);
    let crc = crc16(&body);
    body.put_u16_le(crc);

    // Room for a few escapes before the first reallocation
    let mut wire = Vec::with_capacity(body.len() + body.len() / 16 + 2);
    wire.put_u8(START_BYTE);
    stuff(&body, &mut wire);
    wire.put_u8(END_BYTE);
    Ok(wire)
}

/// Validate a complete wire buffer and extract its payload.
///
/// Size and markers are checked on the raw buffer; the bytes between the
/// markers are then unescaped and passed to [`validate`].
pub fn deframe(wire: &[u8]) -> std::result::Result<Frame, FrameError> {
    if wire.len() < FRAME_OVERHEAD {
        return Err(FrameError::TooSmall { len: wire.len() });
    }

    let [START_BYTE, body @ .., END_BYTE] = wire else {
        return Err(FrameError::InvalidMarkers);
    };

    let mut logical = Vec::with_capacity(wire.len());
    logical.push(START_BYTE);
    logical.extend_from_slice(&unstuff(body));
    logical.push(END_BYTE);

    validate(&logical)
}

/// Validate an already unescaped frame, START and END included.
///
/// Checks run in order and stop at the first failure: size, markers, length
/// field, CRC.
pub fn validate(logical: &[u8]) -> std::result::Result<Frame, FrameError> {
    let len = logical.len();
    if len < FRAME_OVERHEAD {
        return Err(FrameError::TooSmall { len });
    }

    if logical[0] != START_BYTE || logical[len - 1] != END_BYTE {
        return Err(FrameError::InvalidMarkers);
    }

    let message_id = logical[1];
    let declared = usize::from(u16::from_le_bytes([logical[2], logical[3]]));
    let actual = len - FRAME_OVERHEAD;
    if declared != actual {
        return Err(FrameError::LengthMismatch { declared, actual });
    }

    let crc_pos = len - TRAILER_SIZE;
    let found = u16::from_le_bytes([logical[crc_pos], logical[crc_pos + 1]]);
    let expected = crc16(&logical[1..crc_pos]);
    if found != expected {
        return Err(FrameError::CrcMismatch { expected, found });
    }

    Ok(Frame {
        message_id,
        payload: Bytes::copy_from_slice(&logical[HEADER_SIZE..crc_pos]),
    })
}

/// Escape marker bytes in `input`, appending to `out`
pub fn stuff(input: &[u8], out: &mut impl BufMut) {
    for &byte in input {
        if needs_escape(byte) {
            out.put_u8(ESCAPE_BYTE);
            out.put_u8(byte ^ ESCAPE_XOR);
        } else {
            out.put_u8(byte);
        }
    }
}

/// Reverse [`stuff`].
///
/// The byte after each ESCAPE is XORed back. A trailing ESCAPE with nothing
/// after it is dropped.
#[must_use]
pub fn unstuff(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut escaped = false;

    for &byte in input {
        if escaped {
            out.push(byte ^ ESCAPE_XOR);
            escaped = false;
        } else if byte == ESCAPE_BYTE {
            escaped = true;
        } else {
            out.push(byte);
        }
    }

    out
}
