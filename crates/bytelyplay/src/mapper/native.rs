//! [`FieldValue`] for common native types.

use std::ops::{Deref, DerefMut};

use bytelyplay_pack::{Mapping, Value, ValueKind};
use indexmap::IndexMap;

use super::fields::FieldValue;
use super::registry::{exact_float, exact_int, index, join};
use crate::{CodecError, Result};

fn mismatch(path: &str, expected: &str, value: &Value) -> CodecError {
    CodecError::mismatch(path, expected, value.kind())
}

impl FieldValue for bool {
    fn encode_field(&self) -> Value {
        Value::Bool(*self)
    }

    fn decode_field(value: Value, path: &str) -> Result<Self> {
        value.as_bool().map_err(|_| mismatch(path, "bool", &value))
    }
}

impl FieldValue for i64 {
    fn encode_field(&self) -> Value {
        Value::Int(*self)
    }

    fn decode_field(value: Value, path: &str) -> Result<Self> {
        match value {
            Value::Int(i) => Ok(i),
            Value::Float(f) => exact_int(f).ok_or_else(|| mismatch(path, "int", &value)),
            _ => Err(mismatch(path, "int", &value)),
        }
    }
}

macro_rules! narrow_int {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            fn encode_field(&self) -> Value {
                Value::Int(i64::from(*self))
            }

            fn decode_field(value: Value, path: &str) -> Result<Self> {
                let wide = i64::decode_field(value, path)?;
                <$ty>::try_from(wide).map_err(|_| {
                    CodecError::mismatch(path, stringify!($ty), format!("int {wide}"))
                })
            }
        }
    )*};
}

narrow_int!(i32, u32);

impl FieldValue for f64 {
    fn encode_field(&self) -> Value {
        Value::Float(*self)
    }

    fn decode_field(value: Value, path: &str) -> Result<Self> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => exact_float(i).ok_or_else(|| mismatch(path, "float", &value)),
            _ => Err(mismatch(path, "float", &value)),
        }
    }
}

impl FieldValue for String {
    fn encode_field(&self) -> Value {
        Value::Text(self.clone())
    }

    fn decode_field(value: Value, path: &str) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch(path, "text", &other)),
        }
    }
}

/// Owned byte string that maps to [`Value::Bytes`].
///
/// A plain `Vec<u8>` would map to a sequence of integers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteBuf(pub Vec<u8>);

impl From<Vec<u8>> for ByteBuf {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ByteBuf {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Deref for ByteBuf {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.0
    }
}

impl DerefMut for ByteBuf {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.0
    }
}

impl FieldValue for ByteBuf {
    fn encode_field(&self) -> Value {
        Value::Bytes(self.0.clone())
    }

    fn decode_field(value: Value, path: &str) -> Result<Self> {
        match value {
            Value::Bytes(b) => Ok(Self(b)),
            other => Err(mismatch(path, "bytes", &other)),
        }
    }
}

impl FieldValue for Value {
    fn encode_field(&self) -> Value {
        self.clone()
    }

    fn decode_field(value: Value, _path: &str) -> Result<Self> {
        Ok(value)
    }

    fn absent() -> Option<Self> {
        Some(Value::Null)
    }
}

/// Null and absence both read as `None`.
impl<T: FieldValue> FieldValue for Option<T> {
    fn encode_field(&self) -> Value {
        self.as_ref().map_or(Value::Null, T::encode_field)
    }

    fn decode_field(value: Value, path: &str) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::decode_field(other, path).map(Some),
        }
    }

    fn absent() -> Option<Self> {
        Some(None)
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn encode_field(&self) -> Value {
        Value::Sequence(self.iter().map(T::encode_field).collect())
    }

    fn decode_field(value: Value, path: &str) -> Result<Self> {
        match value {
            Value::Sequence(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| T::decode_field(item, &index(path, i)))
                .collect(),
            other => Err(CodecError::mismatch(path, ValueKind::Sequence, other.kind())),
        }
    }

    fn absent() -> Option<Self> {
        Some(Vec::new())
    }
}

impl<T: FieldValue> FieldValue for IndexMap<String, T> {
    fn encode_field(&self) -> Value {
        Value::Mapping(
            self.iter()
                .map(|(key, item)| (key.clone(), item.encode_field()))
                .collect::<Mapping>(),
        )
    }

    fn decode_field(value: Value, path: &str) -> Result<Self> {
        match value {
            Value::Mapping(map) => map
                .into_iter()
                .map(|(key, item)| {
                    let item = T::decode_field(item, &join(path, &key))?;
                    Ok((key, item))
                })
                .collect(),
            other => Err(CodecError::mismatch(path, ValueKind::Mapping, other.kind())),
        }
    }

    fn absent() -> Option<Self> {
        Some(IndexMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_ints_check_range() {
        assert_eq!(i32::decode_field(Value::Int(-5), "n").unwrap(), -5);
        assert_eq!(u32::decode_field(Value::Float(7.0), "n").unwrap(), 7);
        match u32::decode_field(Value::Int(-1), "n") {
            Err(CodecError::TypeMismatch { path, expected, found }) => {
                assert_eq!(path, "n");
                assert_eq!(expected, "u32");
                assert_eq!(found, "int -1");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn float_accepts_exact_ints_only() {
        assert_eq!(f64::decode_field(Value::Int(3), "f").unwrap(), 3.0);
        assert!(f64::decode_field(Value::Int(i64::MAX), "f").is_err());
        assert!(i64::decode_field(Value::Float(2.5), "i").is_err());
    }

    #[test]
    fn nested_containers_report_element_paths() {
        let value = Value::mapping([("a", Value::sequence([Value::Int(1), Value::from("x")]))]);
        match IndexMap::<String, Vec<i64>>::decode_field(value, "m") {
            Err(CodecError::TypeMismatch { path, .. }) => assert_eq!(path, "m.a[1]"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn byte_buf_maps_to_bytes() {
        let buf = ByteBuf::from(vec![1, 2]);
        assert_eq!(buf.encode_field(), Value::Bytes(vec![1, 2]));
        assert_eq!(ByteBuf::decode_field(Value::Bytes(vec![3]), "b").unwrap(), ByteBuf(vec![3]));
        assert!(ByteBuf::decode_field(Value::from("AQI="), "b").is_err());
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn option_treats_null_as_none() {
        assert_eq!(Option::<String>::decode_field(Value::Null, "o").unwrap(), None);
        assert_eq!(None::<String>.encode_field(), Value::Null);
        assert_eq!(Option::<i64>::absent(), Some(None));
    }
}
