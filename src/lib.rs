//! serframe - binary value codec and packet framing for serial links
//!
//! This library turns structured values into flat byte buffers and carries
//! them across an unreliable byte channel inside delimited, CRC-checked
//! frames.
//!
//! # Quick Start
//!
//! ```rust
//! use serframe::{StreamDeframer, create_packet, parse_packet};
//!
//! // Encode and frame a value
//! let wire = create_packet(0x10, &vec![1u16, 2, 3])?;
//!
//! // Whole-buffer receive
//! let packet = parse_packet::<Vec<u16>>(&wire)?;
//! assert_eq!(packet.value, vec![1, 2, 3]);
//!
//! // Byte-at-a-time receive
//! let mut receiver = StreamDeframer::new();
//! let frame = wire
//!     .iter()
//!     .find_map(|&byte| receiver.push(byte))
//!     .expect("complete frame")?;
//! assert_eq!(frame.message_id, 0x10);
//! # Ok::<(), serframe::Error>(())
//! ```
//!
//! # Layers
//!
//! - [`codec`] - shape-based encode/decode of values (no framing)
//! - [`frame`] - byte stuffing, frame validation and the stream receiver
//! - [`checksum`] - CRC-8, CRC-16 and CRC-32
//! - [`packet`] - both layers in one call
//!
//! The core performs no I/O; callers own the channel and feed bytes in.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod checksum;
pub mod codec;
mod error;
pub mod frame;
pub mod packet;

pub use codec::{Codec, Reader, Shape, decode, encode};
pub use error::{Error, Result};
pub use frame::{DeframerConfig, Frame, FrameError, ReceiverState, StreamDeframer};
pub use packet::{Packet, create_packet, parse_packet, parse_packet_or_default};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
