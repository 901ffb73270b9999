//! Smile encoder/decoder error type.

use bytelyplay_buffers::BufferError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmileError {
    #[error("truncated smile payload: {0}")]
    Buffer(#[from] BufferError),
    #[error("missing `:)\\n` smile header")]
    MissingHeader,
    #[error("unsupported smile version {0}")]
    UnsupportedVersion(u8),
    #[error("unknown token 0x{token:02x} at offset {offset}")]
    UnknownToken { token: u8, offset: usize },
    #[error("unsupported {what} at offset {offset}")]
    Unsupported { what: &'static str, offset: usize },
    #[error("back-reference to unknown index {index} at offset {offset}")]
    InvalidReference { index: usize, offset: usize },
    #[error("malformed variable-length integer at offset {0}")]
    InvalidVInt(usize),
    #[error("malformed 7-bit encoded data at offset {0}")]
    Invalid7Bit(usize),
    #[error("integer at offset {0} does not fit in 64-bit signed range")]
    IntegerOverflow(usize),
    #[error("string at offset {0} is missing its end marker")]
    UnterminatedString(usize),
    #[error("duplicate object key `{0}`")]
    DuplicateKey(String),
    #[error("nesting deeper than {0} levels")]
    DepthExceeded(usize),
    #[error("{0} trailing byte(s) after the top-level value")]
    TrailingBytes(usize),
}
