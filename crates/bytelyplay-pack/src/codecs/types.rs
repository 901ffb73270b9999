//! Common adapter trait, options and error.

use thiserror::Error;

use crate::{
    cbor::CborError, json::JsonError, json::JsonOptions, smile::SmileError, smile::SmileOptions,
    EncodingFormat, Value, DEFAULT_MAX_DEPTH,
};

#[derive(Debug, Error)]
pub enum PackError {
    #[error("CBOR: {0}")]
    Cbor(#[from] CborError),
    #[error("JSON: {0}")]
    Json(#[from] JsonError),
    #[error("Smile: {0}")]
    Smile(#[from] SmileError),
}

impl PackError {
    /// Format whose adapter raised the error.
    pub fn format(&self) -> EncodingFormat {
        match self {
            Self::Cbor(_) => EncodingFormat::Cbor,
            Self::Json(_) => EncodingFormat::Json,
            Self::Smile(_) => EncodingFormat::Smile,
        }
    }
}

/// Per-format knobs shared by every adapter in a [`super::Codecs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackOptions {
    pub json: JsonOptions,
    pub smile: SmileOptions,
    pub max_depth: usize,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            json: JsonOptions::default(),
            smile: SmileOptions::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Converts between a [`Value`] tree and one encoding.
///
/// Adapters hold configuration only. Every call builds its own encoder or
/// decoder state, so one adapter can serve many threads at once.
pub trait FormatAdapter: Send + Sync {
    fn id(&self) -> &'static str {
        self.format().name()
    }

    fn format(&self) -> EncodingFormat;

    fn encode(&self, value: &Value) -> Result<Vec<u8>, PackError>;

    fn decode(&self, bytes: &[u8]) -> Result<Value, PackError>;
}
