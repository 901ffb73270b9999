//! Format identifier byte in front of binary payloads.
//!
//! Smile documents are prefixed with `0x00` and CBOR with `0x01`. JSON is
//! left as is: text never starts with either byte, so anything else is read
//! as JSON.

use bytelyplay_pack::EncodingFormat;

/// Guesses the format of a tagged payload from its first byte.
///
/// Returns `None` only for empty input.
pub fn detect_format(bytes: &[u8]) -> Option<EncodingFormat> {
    let first = *bytes.first()?;
    Some(match EncodingFormat::from_identifier(first) {
        Some(format) if format.is_binary() => format,
        _ => EncodingFormat::Json,
    })
}

pub(crate) fn tag(format: EncodingFormat, payload: Vec<u8>) -> Vec<u8> {
    if !format.is_binary() {
        return payload;
    }
    let mut out = Vec::with_capacity(payload.len() + 1);
    out.push(format.identifier());
    out.extend_from_slice(&payload);
    out
}

/// Splits a tagged payload. Empty input goes to the JSON decoder, which
/// rejects it.
pub(crate) fn untag(bytes: &[u8]) -> (EncodingFormat, &[u8]) {
    match detect_format(bytes) {
        Some(format) if format.is_binary() => (format, &bytes[1..]),
        _ => (EncodingFormat::Json, bytes),
    }
}
