//! Byte-stuffed packet framing
//!
//! # Wire Format
//!
//! ```text
//! +-------+-------+-----------+-------------------+-----------+-------+
//! | START |  ID   | LEN (LE)  |  PAYLOAD (LEN)    | CRC (LE)  |  END  |
//! | 0x7E  |  1    |    2      |    variable       |    2      | 0x7D  |
//! +-------+-------+-----------+-------------------+-----------+-------+
//! ```
//!
//! Every byte between START and END that equals START, END or ESCAPE is sent
//! as ESCAPE followed by the byte XOR [`ESCAPE_XOR`]. The length field and the
//! CRC-16 (over ID..end of payload) describe the unstuffed frame, so the
//! whole-buffer [`deframe`] and the incremental [`StreamDeframer`] agree on
//! every frame.
//!
//! Because the ID, length and CRC are escaped too, the CRC is computed over
//! unescaped bytes, never over the escaped payload. A single bit flip that
//! turns a byte into ESCAPE (or an ESCAPE into something else) changes the
//! unescaped length, so it is reported as
//! [`FrameError::LengthMismatch`] rather than [`FrameError::CrcMismatch`].
//! Any other single-bit flip in the ID, payload or CRC fails the CRC.

mod codec;
mod error;
mod stats;
mod stream;

pub use codec::{Frame, deframe, frame, stuff, unstuff, validate};
pub use error::FrameError;
pub use stats::ReceiverStats;
pub use stream::{DeframerConfig, ReceiverState, StreamDeframer};

/// Frame start marker
pub const START_BYTE: u8 = 0x7E;

/// Frame end marker
pub const END_BYTE: u8 = 0x7D;

/// Escape prefix for marker bytes inside a frame
pub const ESCAPE_BYTE: u8 = 0x7C;

/// Mask applied to an escaped byte
pub const ESCAPE_XOR: u8 = 0x20;

/// ID (1) + length (2) + CRC (2) + START + END
pub const FRAME_OVERHEAD: usize = 7;

/// Header size: START + ID + length
pub const HEADER_SIZE: usize = 4;

/// Trailer size: CRC + END
pub const TRAILER_SIZE: usize = 3;

/// Largest payload the 16-bit length field can describe
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Default accumulator limit for [`StreamDeframer`]
pub const DEFAULT_MAX_FRAME_LEN: usize = 1024;

/// Whether `byte` must be escaped inside a frame
#[must_use]
pub const fn needs_escape(byte: u8) -> bool {
    matches!(byte, START_BYTE | END_BYTE | ESCAPE_BYTE)
}
