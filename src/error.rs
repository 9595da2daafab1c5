//! Crate-wide error types

use thiserror::Error;

use crate::frame::FrameError;

/// Errors produced while encoding, decoding or framing values
#[derive(Error, Debug)]
pub enum Error {
    /// Fewer bytes remain than the read requires
    #[error("truncated input: need {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the input
        remaining: usize,
    },

    /// Decoded bytes are not a valid value of the target type
    #[error("invalid {ty} value: {reason}")]
    InvalidValue {
        /// Target type name
        ty: &'static str,
        /// What was wrong with the bytes
        reason: String,
    },

    /// Text payload is not valid UTF-8
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Sequence has more elements than the 32-bit count can describe
    #[error("sequence too long: {len} elements (max {})", u32::MAX)]
    SequenceTooLong {
        /// Element count
        len: usize,
    },

    /// Payload does not fit the 16-bit frame length field
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Payload size
        size: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Frame failed validation
    #[error("invalid frame: {0}")]
    Frame(#[from] FrameError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
