//! Value codec (encode/decode)
//!
//! Every encodable type implements [`Codec`] and declares exactly one
//! [`Shape`]. The shape is fixed per type, so dispatch is resolved at compile
//! time:
//!
//! - **Primitive** scalars are copied byte-for-byte in native byte order with
//!   no prefix.
//! - **Sequence** collections write a 4-byte little-endian element count and
//!   then each element.
//! - **Custom** aggregates implement [`Codec`] by hand, usually by encoding
//!   their fields in order. The codec adds no envelope of its own.
//!
//! ```rust
//! use bytes::BytesMut;
//! use serframe::codec::{self, Codec, Reader};
//!
//! #[derive(Debug, PartialEq)]
//! struct Reading {
//!     channel: u8,
//!     samples: Vec<u16>,
//! }
//!
//! impl Codec for Reading {
//!     fn encode_into(&self, buf: &mut BytesMut) -> serframe::Result<()> {
//!         self.channel.encode_into(buf)?;
//!         self.samples.encode_into(buf)
//!     }
//!
//!     fn decode_from(reader: &mut Reader<'_>) -> serframe::Result<Self> {
//!         Ok(Self {
//!             channel: u8::decode_from(reader)?,
//!             samples: Vec::decode_from(reader)?,
//!         })
//!     }
//! }
//!
//! let reading = Reading { channel: 3, samples: vec![10, 20] };
//! let bytes = codec::encode(&reading)?;
//! assert_eq!(codec::decode::<Reading>(&bytes)?, reading);
//! # Ok::<(), serframe::Error>(())
//! ```

mod impls;
mod reader;

use bytes::{Bytes, BytesMut};

pub use reader::Reader;

use crate::Result;

/// Size of the element count written before every sequence
pub const LEN_PREFIX_SIZE: usize = 4;

/// How a type is laid out on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Fixed-size value copied verbatim
    Primitive {
        /// Encoded width in bytes
        size: usize,
    },
    /// Count-prefixed homogeneous collection
    Sequence,
    /// Type with its own field-by-field encoding
    Custom,
}

impl Shape {
    /// Encoded width, if the shape has a fixed one
    #[must_use]
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Primitive { size } => Some(size),
            Self::Sequence | Self::Custom => None,
        }
    }
}

/// A value that can be written to and read back from a byte buffer.
///
/// Implementations for scalars and standard collections are provided. Custom
/// types implement both methods and keep the default [`Codec::SHAPE`].
/// `decode_from` must consume exactly the bytes `encode_into` wrote.
pub trait Codec: Sized {
    /// Wire shape of this type
    const SHAPE: Shape = Shape::Custom;

    /// Append the encoded form of `self` to `buf`
    fn encode_into(&self, buf: &mut BytesMut) -> Result<()>;

    /// Read one value from the shared cursor
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self>;
}

/// Encode a value into a fresh buffer
pub fn encode<T: Codec>(value: &T) -> Result<Bytes> {
    let mut buf = match T::SHAPE {
        Shape::Primitive { size } => BytesMut::with_capacity(size),
        Shape::Sequence | Shape::Custom => BytesMut::new(),
    };
    value.encode_into(&mut buf)?;
    Ok(buf.freeze())
}

/// Decode a value from the start of `bytes`.
///
/// Trailing bytes after the value are ignored.
pub fn decode<T: Codec>(bytes: &[u8]) -> Result<T> {
    let mut reader = Reader::new(bytes);
    T::decode_from(&mut reader)
}

/// Decode a value from a cursor shared with the caller
pub fn decode_from<T: Codec>(reader: &mut Reader<'_>) -> Result<T> {
    T::decode_from(reader)
}
