//! Smile adapter.

use crate::smile::{SmileDecoder, SmileEncoder, SmileOptions};
use crate::{EncodingFormat, Value, DEFAULT_MAX_DEPTH};

use super::types::{FormatAdapter, PackError};

#[derive(Debug, Clone, Copy)]
pub struct SmileAdapter {
    options: SmileOptions,
    max_depth: usize,
}

impl Default for SmileAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SmileAdapter {
    pub fn new() -> Self {
        Self::with_options(SmileOptions::default(), DEFAULT_MAX_DEPTH)
    }

    pub fn with_options(options: SmileOptions, max_depth: usize) -> Self {
        Self { options, max_depth }
    }
}

impl FormatAdapter for SmileAdapter {
    fn format(&self) -> EncodingFormat {
        EncodingFormat::Smile
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, PackError> {
        Ok(SmileEncoder::with_options(self.options, self.max_depth).encode(value)?)
    }

    /// Back-reference rules come from the document header, not from the
    /// adapter's own options.
    fn decode(&self, bytes: &[u8]) -> Result<Value, PackError> {
        Ok(SmileDecoder::with_max_depth(self.max_depth).decode(bytes)?)
    }
}
