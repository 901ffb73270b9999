//! Binary buffer utilities for bytelyplay.
//!
//! The binary formats (CBOR, Smile) decode untrusted input, so every read on
//! [`Reader`] is bounds-checked and reports [`BufferError::EndOfBuffer`]
//! instead of panicking.
//!
//! # Overview
//!
//! - [`Reader`] - Reads binary data from a byte slice with cursor tracking
//! - [`Writer`] - Writes binary data to an auto-growing buffer
//!
//! # Example
//!
//! ```
//! use bytelyplay_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.u16(0x0203);
//! writer.utf8("hello");
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8().unwrap(), 0x01);
//! assert_eq!(reader.u16().unwrap(), 0x0203);
//! assert_eq!(reader.utf8(5).unwrap(), "hello");
//! assert!(reader.is_empty());
//! ```

mod f16;
mod reader;
mod writer;

pub use f16::decode_f16;
pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    #[error("end of buffer: needed {needed} byte(s), {remaining} remaining")]
    EndOfBuffer { needed: usize, remaining: usize },
    /// Invalid UTF-8 sequence.
    #[error("invalid UTF-8 sequence at offset {0}")]
    InvalidUtf8(usize),
}
