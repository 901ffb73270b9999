//! Error type shared by the mapper, the facade and the slot store.

use bytelyplay_pack::{EncodingFormat, PackError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// A value's kind does not match the declared field kind, and no exact
    /// coercion applies. `path` is dotted (`items[2].name`); empty for the root.
    #[error("type mismatch at `{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },
    #[error("malformed {format} input: {source}")]
    MalformedInput {
        format: EncodingFormat,
        #[source]
        source: PackError,
    },
    #[error("{type_name}: missing required field `{field}`")]
    MissingField { type_name: String, field: String },
    #[error("unsupported format `{0}`")]
    UnsupportedFormat(String),
    #[error("no mapper registered for type `{0}`")]
    UnknownType(String),
    #[error("value cannot be represented in {format}: {source}")]
    Unrepresentable {
        format: EncodingFormat,
        #[source]
        source: PackError,
    },
    #[error("{type_name}: unknown field `{field}`")]
    UnknownField { type_name: String, field: String },
    #[error("registration error: {0}")]
    Registration(String),
}

impl CodecError {
    pub(crate) fn mismatch(
        path: impl Into<String>,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

pub type Result<T, E = CodecError> = std::result::Result<T, E>;
