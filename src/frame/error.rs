//! Frame validation failures

use thiserror::Error;

/// Why a candidate frame was rejected.
///
/// These are expected outcomes on a noisy channel, not faults. The `Display`
/// text of each variant is a stable reason string.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer bytes than the fixed frame overhead
    #[error("too small")]
    TooSmall {
        /// Size of the rejected buffer
        len: usize,
    },

    /// First byte is not START or last byte is not END
    #[error("invalid frame markers")]
    InvalidMarkers,

    /// Length field disagrees with the frame size
    #[error("length mismatch")]
    LengthMismatch {
        /// Payload length from the header
        declared: usize,
        /// Payload length actually present
        actual: usize,
    },

    /// Trailer checksum disagrees with the recomputed one
    #[error("CRC mismatch")]
    CrcMismatch {
        /// Checksum computed over the received bytes
        expected: u16,
        /// Checksum carried in the trailer
        found: u16,
    },

    /// Stream receiver accumulated more than its limit without an END
    #[error("buffer overflow")]
    BufferOverflow {
        /// Configured accumulator limit
        limit: usize,
    },
}

impl FrameError {
    /// Stable reason string for this failure
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::TooSmall { .. } => "too small",
            Self::InvalidMarkers => "invalid frame markers",
            Self::LengthMismatch { .. } => "length mismatch",
            Self::CrcMismatch { .. } => "CRC mismatch",
            Self::BufferOverflow { .. } => "buffer overflow",
        }
    }
}
