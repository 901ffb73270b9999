//! [`Value`]: the format-neutral in-memory data model.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

/// Ordered mapping from text keys to values. Keys are unique.
///
/// Equality compares key sets and per-key values; insertion order only
/// affects how encoders emit the entries.
pub type Mapping = IndexMap<String, Value>;

/// A structured value shared by every encoding.
///
/// Values are plain owned trees, so a graph is acyclic by construction.
/// Nothing in this crate mutates a value after it has been built.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Text,
    Bytes,
    Sequence,
    Mapping,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A kind-specific accessor was called on a value of another kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct TypeMismatch {
    pub expected: ValueKind,
    pub found: ValueKind,
}

impl Value {
    /// Builds a mapping from key/value pairs. A repeated key keeps the last value.
    pub fn mapping<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Mapping(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds a sequence from anything convertible into values.
    pub fn sequence<T, I>(items: I) -> Self
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Mapping(_) => ValueKind::Mapping,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn mismatch(&self, expected: ValueKind) -> TypeMismatch {
        TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    pub fn as_bool(&self) -> Result<bool, TypeMismatch> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch(ValueKind::Bool)),
        }
    }

    pub fn as_int(&self) -> Result<i64, TypeMismatch> {
        match self {
            Value::Int(i) => Ok(*i),
            other => Err(other.mismatch(ValueKind::Int)),
        }
    }

    /// Strict float accessor; an `Int` is a mismatch here.
    pub fn as_float(&self) -> Result<f64, TypeMismatch> {
        match self {
            Value::Float(f) => Ok(*f),
            other => Err(other.mismatch(ValueKind::Float)),
        }
    }

    pub fn as_text(&self) -> Result<&str, TypeMismatch> {
        match self {
            Value::Text(s) => Ok(s),
            other => Err(other.mismatch(ValueKind::Text)),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8], TypeMismatch> {
        match self {
            Value::Bytes(b) => Ok(b),
            other => Err(other.mismatch(ValueKind::Bytes)),
        }
    }

    pub fn as_sequence(&self) -> Result<&[Value], TypeMismatch> {
        match self {
            Value::Sequence(items) => Ok(items),
            other => Err(other.mismatch(ValueKind::Sequence)),
        }
    }

    pub fn as_mapping(&self) -> Result<&Mapping, TypeMismatch> {
        match self {
            Value::Mapping(map) => Ok(map),
            other => Err(other.mismatch(ValueKind::Mapping)),
        }
    }

    pub fn into_text(self) -> Result<String, TypeMismatch> {
        match self {
            Value::Text(s) => Ok(s),
            other => Err(other.mismatch(ValueKind::Text)),
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, TypeMismatch> {
        match self {
            Value::Bytes(b) => Ok(b),
            other => Err(other.mismatch(ValueKind::Bytes)),
        }
    }

    pub fn into_sequence(self) -> Result<Vec<Value>, TypeMismatch> {
        match self {
            Value::Sequence(items) => Ok(items),
            other => Err(other.mismatch(ValueKind::Sequence)),
        }
    }

    pub fn into_mapping(self) -> Result<Mapping, TypeMismatch> {
        match self {
            Value::Mapping(map) => Ok(map),
            other => Err(other.mismatch(ValueKind::Mapping)),
        }
    }

    /// Looks up `key` when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Container nesting depth: scalars are 0, `[]` and `{}` are 1.
    pub fn depth(&self) -> usize {
        match self {
            Value::Sequence(items) => 1 + items.iter().map(Value::depth).max().unwrap_or(0),
            Value::Mapping(map) => 1 + map.values().map(Value::depth).max().unwrap_or(0),
            _ => 0,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_equality_ignores_insertion_order() {
        let a = Value::mapping([("x", Value::Int(1)), ("y", Value::Bool(true))]);
        let b = Value::mapping([("y", Value::Bool(true)), ("x", Value::Int(1))]);
        assert_eq!(a, b);

        let c = Value::mapping([("x", Value::Int(2)), ("y", Value::Bool(true))]);
        assert_ne!(a, c);
    }

    #[test]
    fn sequence_equality_is_order_sensitive() {
        let a = Value::sequence([1i64, 2]);
        let b = Value::sequence([2i64, 1]);
        assert_ne!(a, b);
    }

    #[test]
    fn accessors_report_kind_mismatch() {
        let v = Value::from("hi");
        assert_eq!(v.as_text().unwrap(), "hi");
        assert_eq!(
            v.as_int(),
            Err(TypeMismatch {
                expected: ValueKind::Int,
                found: ValueKind::Text
            })
        );
        assert!(Value::Int(3).as_float().is_err());
        assert_eq!(Value::Float(3.0).as_float().unwrap(), 3.0);
    }

    #[test]
    fn depth_counts_containers() {
        assert_eq!(Value::Int(1).depth(), 0);
        assert_eq!(Value::Sequence(vec![]).depth(), 1);
        let nested = Value::sequence([Value::mapping([("a", Value::sequence([1i64]))])]);
        assert_eq!(nested.depth(), 3);
    }

    #[test]
    fn option_converts_to_null() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }
}
