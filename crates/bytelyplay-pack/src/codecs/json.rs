//! JSON adapter.

use crate::json::{JsonDecoder, JsonEncoder, JsonOptions};
use crate::{EncodingFormat, Value, DEFAULT_MAX_DEPTH};

use super::types::{FormatAdapter, PackError};

#[derive(Debug, Clone, Copy)]
pub struct JsonAdapter {
    options: JsonOptions,
    max_depth: usize,
}

impl Default for JsonAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonAdapter {
    pub fn new() -> Self {
        Self::with_options(JsonOptions::default(), DEFAULT_MAX_DEPTH)
    }

    pub fn with_options(options: JsonOptions, max_depth: usize) -> Self {
        Self { options, max_depth }
    }
}

impl FormatAdapter for JsonAdapter {
    fn format(&self) -> EncodingFormat {
        EncodingFormat::Json
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, PackError> {
        Ok(JsonEncoder::with_options(self.options, self.max_depth).encode(value)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, PackError> {
        Ok(JsonDecoder::with_max_depth(self.max_depth).decode(bytes)?)
    }
}
