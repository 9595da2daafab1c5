//! Bounds-checked read cursor shared across nested decodes

use bytes::Buf;

use crate::{Error, Result};

/// Forward-only cursor over an encoded buffer.
///
/// Every read checks the remaining length first; a short read fails with
/// [`Error::Truncated`] and leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    len: usize,
}

impl<'a> Reader<'a> {
    /// Create a cursor positioned at the start of `data`
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            buf: data,
            len: data.len(),
        }
    }

    /// Bytes not yet consumed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Whether any bytes are left
    #[must_use]
    pub fn has_remaining(&self) -> bool {
        self.buf.has_remaining()
    }

    /// Offset of the next unread byte
    #[must_use]
    pub fn position(&self) -> usize {
        self.len - self.buf.len()
    }

    /// Unconsumed tail of the input
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        self.buf
    }

    /// Fail with [`Error::Truncated`] unless `needed` bytes remain
    pub fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(Error::Truncated { needed, remaining });
        }
        Ok(())
    }

    /// Read exactly `N` bytes
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        self.buf.copy_to_slice(&mut out);
        Ok(out)
    }

    /// Borrow the next `count` bytes without copying
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.ensure(count)?;
        let buf: &'a [u8] = self.buf;
        let (head, tail) = buf.split_at(count);
        self.buf = tail;
        Ok(head)
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    /// Read a 4-byte little-endian sequence count
    pub fn read_len(&mut self) -> Result<usize> {
        self.ensure(4)?;
        Ok(self.buf.get_u32_le() as usize)
    }
}
