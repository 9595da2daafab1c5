//! `Codec` implementations for scalars and standard collections

use std::collections::VecDeque;

use bytes::{BufMut, BytesMut};

use super::{Codec, LEN_PREFIX_SIZE, Reader, Shape};
use crate::{Error, Result};

macro_rules! impl_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Codec for $ty {
                const SHAPE: Shape = Shape::Primitive {
                    size: size_of::<$ty>(),
                };

                fn encode_into(&self, buf: &mut BytesMut) -> Result<()> {
                    buf.put_slice(&self.to_ne_bytes());
                    Ok(())
                }

                fn decode_from(reader: &mut Reader<'_>) -> Result<Self> {
                    reader
                        .read_array::<{ size_of::<$ty>() }>()
                        .map(<$ty>::from_ne_bytes)
                }
            }
        )*
    };
}

impl_primitive!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64
);

impl Codec for bool {
    const SHAPE: Shape = Shape::Primitive { size: 1 };

    fn encode_into(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(u8::from(*self));
        Ok(())
    }

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::InvalidValue {
                ty: "bool",
                reason: format!("byte {other:#04x} is neither 0 nor 1"),
            }),
        }
    }
}

impl Codec for char {
    const SHAPE: Shape = Shape::Primitive { size: 4 };

    fn encode_into(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_slice(&u32::from(*self).to_ne_bytes());
        Ok(())
    }

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self> {
        let raw = u32::from_ne_bytes(reader.read_array::<4>()?);
        char::from_u32(raw).ok_or_else(|| Error::InvalidValue {
            ty: "char",
            reason: format!("{raw:#x} is not a Unicode scalar value"),
        })
    }
}

/// Elements of a fixed-width primitive array sit back to back with no count.
impl<T: Codec, const N: usize> Codec for [T; N] {
    const SHAPE: Shape = match T::SHAPE {
        Shape::Primitive { size } => Shape::Primitive { size: size * N },
        Shape::Sequence | Shape::Custom => Shape::Custom,
    };

    fn encode_into(&self, buf: &mut BytesMut) -> Result<()> {
        self.iter().try_for_each(|item| item.encode_into(buf))
    }

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self> {
        if let Some(size) = Self::SHAPE.fixed_size() {
            reader.ensure(size)?;
        }
        let items = (0..N)
            .map(|_| T::decode_from(reader))
            .collect::<Result<Vec<T>>>()?;
        items.try_into().map_err(|items: Vec<T>| Error::InvalidValue {
            ty: "array",
            reason: format!("expected {N} elements, decoded {}", items.len()),
        })
    }
}

impl<T: Codec> Codec for Box<T> {
    const SHAPE: Shape = T::SHAPE;

    fn encode_into(&self, buf: &mut BytesMut) -> Result<()> {
        T::encode_into(self, buf)
    }

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self> {
        T::decode_from(reader).map(Box::new)
    }
}

fn put_len(buf: &mut BytesMut, len: usize) -> Result<()> {
    let count = u32::try_from(len).map_err(|_| Error::SequenceTooLong { len })?;
    buf.put_u32_le(count);
    Ok(())
}

/// Read a sequence count and reject it early when the elements have a known
/// width that the remaining input cannot hold.
///
/// Zero-width elements are charged one byte each.
fn read_count<T: Codec>(reader: &mut Reader<'_>) -> Result<usize> {
    let count = reader.read_len()?;
    if let Some(size) = T::SHAPE.fixed_size() {
        reader.ensure(count.saturating_mul(size.max(1)))?;
    }
    Ok(count)
}

fn encode_elements<'a, T, I>(buf: &mut BytesMut, len: usize, items: I) -> Result<()>
where
    T: Codec + 'a,
    I: IntoIterator<Item = &'a T>,
{
    put_len(buf, len)?;
    if let Some(size) = T::SHAPE.fixed_size() {
        buf.reserve(len.saturating_mul(size));
    }
    items.into_iter().try_for_each(|item| item.encode_into(buf))
}

impl<T: Codec> Codec for Vec<T> {
    const SHAPE: Shape = Shape::Sequence;

    fn encode_into(&self, buf: &mut BytesMut) -> Result<()> {
        encode_elements(buf, self.len(), self)
    }

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self> {
        let count = read_count::<T>(reader)?;
        let mut items = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            items.push(T::decode_from(reader)?);
        }
        Ok(items)
    }
}

impl<T: Codec> Codec for VecDeque<T> {
    const SHAPE: Shape = Shape::Sequence;

    fn encode_into(&self, buf: &mut BytesMut) -> Result<()> {
        encode_elements(buf, self.len(), self)
    }

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self> {
        let count = read_count::<T>(reader)?;
        let mut items = VecDeque::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            items.push_back(T::decode_from(reader)?);
        }
        Ok(items)
    }
}

/// Text is a byte sequence: UTF-8 length, then the raw bytes.
impl Codec for String {
    const SHAPE: Shape = Shape::Sequence;

    fn encode_into(&self, buf: &mut BytesMut) -> Result<()> {
        buf.reserve(LEN_PREFIX_SIZE + self.len());
        put_len(buf, self.len())?;
        buf.put_slice(self.as_bytes());
        Ok(())
    }

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self> {
        let count = reader.read_len()?;
        let bytes = reader.read_bytes(count)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}
