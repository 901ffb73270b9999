//! Binary buffer reader with cursor tracking.

use std::str;

use crate::BufferError;

/// A bounds-checked binary reader over a byte slice.
///
/// The reader keeps a cursor position `x`. Every read either advances the
/// cursor by the number of bytes consumed or fails with
/// [`BufferError::EndOfBuffer`], leaving the cursor untouched.
///
/// # Example
///
/// ```
/// use bytelyplay_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8().unwrap(), 0x01);
/// assert_eq!(reader.u16().unwrap(), 0x0203);
/// assert!(reader.u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.uint8.len() - self.x
    }

    /// Returns `true` when every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Peeks at the current byte without advancing the cursor.
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.uint8
            .get(self.x)
            .copied()
            .ok_or(BufferError::EndOfBuffer {
                needed: 1,
                remaining: 0,
            })
    }

    /// Fails unless at least `size` bytes remain.
    pub fn ensure(&self, size: usize) -> Result<(), BufferError> {
        let remaining = self.size();
        if size > remaining {
            return Err(BufferError::EndOfBuffer {
                needed: size,
                remaining,
            });
        }
        Ok(())
    }

    /// Returns a subarray of the given size and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.ensure(size)?;
        let x = self.x;
        self.x = x + size;
        Ok(&self.uint8[x..x + size])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.buf(N)?);
        Ok(out)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        let val = self.peek()?;
        self.x += 1;
        Ok(val)
    }

    /// Reads an unsigned 16-bit integer (big-endian).
    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        self.array().map(u16::from_be_bytes)
    }

    /// Reads an unsigned 32-bit integer (big-endian).
    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        self.array().map(u32::from_be_bytes)
    }

    /// Reads an unsigned 64-bit integer (big-endian).
    #[inline]
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        self.array().map(u64::from_be_bytes)
    }

    /// Reads a 32-bit floating point number (big-endian).
    #[inline]
    pub fn f32(&mut self) -> Result<f32, BufferError> {
        self.array().map(f32::from_be_bytes)
    }

    /// Reads a 64-bit floating point number (big-endian).
    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        self.array().map(f64::from_be_bytes)
    }

    /// Reads a UTF-8 string of the given byte size.
    pub fn utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        let start = self.x;
        let bytes = self.buf(size)?;
        str::from_utf8(bytes).map_err(|e| {
            self.x = start;
            BufferError::InvalidUtf8(start + e.valid_up_to())
        })
    }
}
