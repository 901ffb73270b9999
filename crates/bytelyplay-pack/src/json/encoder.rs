//! `JsonEncoder`: writes a [`Value`] tree as UTF-8 JSON text.

use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use super::binary::{escape_text, wrap_binary};
use super::JsonError;
use crate::{Value, DEFAULT_MAX_DEPTH};

/// Output options for [`JsonEncoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonOptions {
    /// Indent nested containers with two spaces.
    pub pretty: bool,
}

/// JSON encoder.
///
/// Mapping keys are emitted in insertion order. Floats always carry a
/// fraction or exponent (`1.0`) so they read back as floats. Non-finite
/// floats are rejected. Text that would read back as a binary data URI is
/// written with one leading `\\`.
pub struct JsonEncoder {
    options: JsonOptions,
    max_depth: usize,
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self::with_options(JsonOptions::default(), DEFAULT_MAX_DEPTH)
    }

    pub fn pretty() -> Self {
        Self::with_options(JsonOptions { pretty: true }, DEFAULT_MAX_DEPTH)
    }

    pub fn with_options(options: JsonOptions, max_depth: usize) -> Self {
        Self { options, max_depth }
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, JsonError> {
        let json = self.value_to_json(value, 0)?;
        let bytes = if self.options.pretty {
            serde_json::to_vec_pretty(&json)?
        } else {
            serde_json::to_vec(&json)?
        };
        Ok(bytes)
    }

    /// Converts a value into a `serde_json` tree.
    pub fn value_to_json(&self, value: &Value, depth: usize) -> Result<JsonValue, JsonError> {
        Ok(match value {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::Number(Number::from(*i)),
            Value::Float(f) => Number::from_f64(*f)
                .map(JsonValue::Number)
                .ok_or(JsonError::NonFiniteFloat(*f))?,
            Value::Text(s) => JsonValue::String(escape_text(s)),
            Value::Bytes(b) => JsonValue::String(wrap_binary(b)),
            Value::Sequence(items) => {
                self.check_depth(depth + 1)?;
                items
                    .iter()
                    .map(|item| self.value_to_json(item, depth + 1))
                    .collect::<Result<Vec<_>, _>>()
                    .map(JsonValue::Array)?
            }
            Value::Mapping(map) => {
                self.check_depth(depth + 1)?;
                let mut obj = JsonMap::with_capacity(map.len());
                for (key, item) in map {
                    obj.insert(key.clone(), self.value_to_json(item, depth + 1)?);
                }
                JsonValue::Object(obj)
            }
        })
    }

    fn check_depth(&self, depth: usize) -> Result<(), JsonError> {
        if depth > self.max_depth {
            return Err(JsonError::DepthExceeded(self.max_depth));
        }
        Ok(())
    }
}
