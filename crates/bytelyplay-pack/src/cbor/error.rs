use bytelyplay_buffers::BufferError;
use thiserror::Error;

/// Error type for CBOR encoding/decoding operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CborError {
    #[error("truncated cbor payload: {0}")]
    Buffer(#[from] BufferError),
    #[error("reserved additional info {minor} at offset {offset}")]
    UnexpectedMinor { minor: u8, offset: usize },
    #[error("unexpected break code at offset {0}")]
    UnexpectedBreak(usize),
    #[error("unsupported simple value {value} at offset {offset}")]
    UnsupportedSimple { value: u8, offset: usize },
    #[error("integer at offset {0} does not fit in 64-bit signed range")]
    IntegerOverflow(usize),
    #[error("map key at offset {0} is not a text string")]
    UnexpectedObjKey(usize),
    #[error("duplicate map key `{0}`")]
    DuplicateKey(String),
    #[error("indefinite-length chunk at offset {0} has the wrong major type")]
    UnexpectedChunk(usize),
    #[error("invalid size {size} at offset {offset}")]
    InvalidSize { size: u64, offset: usize },
    #[error("nesting deeper than {0} levels")]
    DepthExceeded(usize),
    #[error("{0} trailing byte(s) after the top-level item")]
    TrailingBytes(usize),
}
