//! Shared convenience wrappers for CBOR encode/decode.

use crate::Value;

use super::{CborDecoder, CborEncoder, CborError};

/// Encode a [`Value`] into CBOR bytes.
pub fn encode(data: &Value) -> Result<Vec<u8>, CborError> {
    let mut encoder = CborEncoder::new();
    encoder.encode(data)
}

/// Decode CBOR bytes into a [`Value`].
pub fn decode(blob: &[u8]) -> Result<Value, CborError> {
    CborDecoder::new().decode(blob)
}
