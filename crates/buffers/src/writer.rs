//! Auto-growing binary buffer writer.

/// A binary writer that appends big-endian data to an internal buffer.
///
/// Call [`Writer::flush`] to take the written bytes; the writer is left empty
/// and can be reused for the next document.
#[derive(Debug, Default, Clone)]
pub struct Writer {
    uint8: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    /// Returns `true` if nothing has been written since the last flush.
    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Discards everything written so far.
    pub fn reset(&mut self) {
        self.uint8.clear();
    }

    /// Takes the written bytes, leaving the writer empty.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    /// Read-only view of the bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a one-byte marker followed by a big-endian `u64`.
    #[inline]
    pub fn u8u64(&mut self, marker: u8, val: u64) {
        self.u8(marker);
        self.u64(val);
    }

    /// Writes a one-byte marker followed by a big-endian `f64`.
    #[inline]
    pub fn u8f64(&mut self, marker: u8, val: f64) {
        self.u8(marker);
        self.f64(val);
    }

    /// Appends raw bytes.
    pub fn buf(&mut self, bytes: &[u8]) {
        self.uint8.extend_from_slice(bytes);
    }

    /// Appends the UTF-8 bytes of `s`.
    pub fn utf8(&mut self, s: &str) {
        self.buf(s.as_bytes());
    }
}
