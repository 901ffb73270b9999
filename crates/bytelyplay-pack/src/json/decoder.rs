//! `JsonDecoder`: parses UTF-8 JSON text into a [`Value`] tree.

use serde_json::Value as JsonValue;

use super::binary::{unescape_text, unwrap_binary};
use super::JsonError;
use crate::{Mapping, Value, DEFAULT_MAX_DEPTH};

/// JSON decoder.
///
/// Integer literals become `Int` and must fit in `i64`; literals with a
/// fraction or exponent become `Float` and must be finite. Strings carrying
/// the binary data-URI prefix and a valid base64 payload become `Bytes`.
pub struct JsonDecoder {
    max_depth: usize,
}

impl Default for JsonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonDecoder {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn decode(&self, data: &[u8]) -> Result<Value, JsonError> {
        let json: JsonValue = serde_json::from_slice(data)?;
        self.json_to_value(json, 0)
    }

    /// Converts a `serde_json` tree into a value.
    pub fn json_to_value(&self, json: JsonValue, depth: usize) -> Result<Value, JsonError> {
        Ok(match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // the number keeps its literal text (arbitrary_precision)
                    let literal = n.to_string();
                    if !literal.contains(['.', 'e', 'E']) {
                        return Err(JsonError::IntegerOverflow(literal));
                    }
                    Value::Float(n.as_f64().ok_or(JsonError::FloatOverflow(literal))?)
                }
            }
            JsonValue::String(s) => match unwrap_binary(&s) {
                Some(bytes) => Value::Bytes(bytes),
                None => Value::Text(unescape_text(s)),
            },
            JsonValue::Array(items) => {
                self.check_depth(depth + 1)?;
                items
                    .into_iter()
                    .map(|item| self.json_to_value(item, depth + 1))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Sequence)?
            }
            JsonValue::Object(obj) => {
                self.check_depth(depth + 1)?;
                let mut map = Mapping::with_capacity(obj.len());
                for (key, item) in obj {
                    map.insert(key, self.json_to_value(item, depth + 1)?);
                }
                Value::Mapping(map)
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
