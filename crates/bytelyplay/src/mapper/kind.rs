//! Field metadata: declared kinds, descriptors and per-type specs.

use std::fmt;

use bytelyplay_pack::Value;

/// Declared kind of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Any value, including null. Nothing is checked.
    Any,
    Bool,
    Int,
    Float,
    Text,
    Bytes,
    Sequence(Box<FieldKind>),
    /// Text-keyed mapping whose values all have the given kind.
    Mapping(Box<FieldKind>),
    /// Nested record, by registered type name.
    Record(String),
}

impl FieldKind {
    pub fn sequence(elem: FieldKind) -> Self {
        Self::Sequence(Box::new(elem))
    }

    pub fn mapping(elem: FieldKind) -> Self {
        Self::Mapping(Box::new(elem))
    }

    pub fn record(type_name: impl Into<String>) -> Self {
        Self::Record(type_name.into())
    }

    /// Calls `f` with every record type name this kind refers to.
    pub(crate) fn visit_records<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Self::Sequence(elem) | Self::Mapping(elem) => elem.visit_records(f),
            Self::Record(name) => f(name),
            _ => {}
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Text => f.write_str("text"),
            Self::Bytes => f.write_str("bytes"),
            Self::Sequence(elem) => write!(f, "sequence<{elem}>"),
            Self::Mapping(elem) => write!(f, "mapping<{elem}>"),
            Self::Record(name) => write!(f, "record {name}"),
        }
    }
}

/// Immutable metadata for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Used whenever the field is absent, on both encode and decode.
    pub default: Option<Value>,
}

impl FieldDescriptor {
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: None,
        }
    }

    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A type name plus its ordered field descriptors.
///
/// ```
/// use bytelyplay::{FieldKind, TypeSpec};
///
/// let spec = TypeSpec::new("Widget")
///     .required("id", FieldKind::Int)
///     .required("name", FieldKind::Text)
///     .optional("tags", FieldKind::sequence(FieldKind::Text));
/// assert_eq!(spec.fields().len(), 3);
/// assert!(spec.field_named("tags").is_some_and(|f| !f.required));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl TypeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    pub fn required(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.field(FieldDescriptor::required(name, kind))
    }

    pub fn optional(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.field(FieldDescriptor::optional(name, kind))
    }

    /// Optional field that falls back to `default` when absent.
    pub fn defaulted(self, name: impl Into<String>, kind: FieldKind, default: impl Into<Value>) -> Self {
        self.field(FieldDescriptor::optional(name, kind).with_default(default))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}
