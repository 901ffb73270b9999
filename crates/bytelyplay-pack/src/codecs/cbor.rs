//! CBOR adapter.

use crate::{cbor::CborDecoder, cbor::CborEncoder, EncodingFormat, Value, DEFAULT_MAX_DEPTH};

use super::types::{FormatAdapter, PackError};

#[derive(Debug, Clone, Copy)]
pub struct CborAdapter {
    max_depth: usize,
}

impl Default for CborAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CborAdapter {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl FormatAdapter for CborAdapter {
    fn format(&self) -> EncodingFormat {
        EncodingFormat::Cbor
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, PackError> {
        Ok(CborEncoder::with_max_depth(self.max_depth).encode(value)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, PackError> {
        Ok(CborDecoder::with_max_depth(self.max_depth).decode(bytes)?)
    }
}
