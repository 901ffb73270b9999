//! Embed binary data in JSON using data URI strings.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Binary data URI prefix: `data:application/octet-stream;base64,`
pub const BIN_URI_START: &str = "data:application/octet-stream;base64,";

/// Wraps raw bytes into a data URI string.
pub fn wrap_binary(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(BIN_URI_START.len() + bytes.len().div_ceil(3) * 4);
    out.push_str(BIN_URI_START);
    STANDARD.encode_string(bytes, &mut out);
    out
}

/// Unwraps a data URI string produced by [`wrap_binary`].
///
/// Returns `None` when `s` is ordinary text, including a prefixed string
/// whose payload is not valid base64.
pub fn unwrap_binary(s: &str) -> Option<Vec<u8>> {
    s.strip_prefix(BIN_URI_START)
        .and_then(|payload| STANDARD.decode(payload).ok())
}

/// Marks text that would otherwise read back as binary.
const TEXT_ESCAPE: char = '\\';

/// True when `s`, after any leading escapes, starts with [`BIN_URI_START`].
fn looks_binary(s: &str) -> bool {
    s.trim_start_matches(TEXT_ESCAPE).starts_with(BIN_URI_START)
}

/// Prepares text for JSON so that it never collides with a data URI.
///
/// Text that looks like a data URI (possibly behind escapes) gets one more
/// leading escape; [`unescape_text`] removes exactly one.
pub fn escape_text(s: &str) -> String {
    if looks_binary(s) {
        let mut out = String::with_capacity(s.len() + 1);
        out.push(TEXT_ESCAPE);
        out.push_str(s);
        out
    } else {
        s.to_owned()
    }
}

/// Reverses [`escape_text`] on a JSON string that is not binary.
pub fn unescape_text(s: String) -> String {
    match s.strip_prefix(TEXT_ESCAPE) {
        Some(rest) if looks_binary(rest) => rest.to_owned(),
        _ => s,
    }
}
