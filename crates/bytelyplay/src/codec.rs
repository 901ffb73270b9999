//! Codec Facade: one entry point that pairs the adapter registry with the
//! type registry.

use std::sync::Arc;

use bytelyplay_pack::{Codecs, EncodingFormat, FormatAdapter, Value, ValueKind};
use tracing::{debug, trace};

use crate::envelope;
use crate::mapper::{read_record, write_record, FieldKind, Mapper, Record, TypeRegistry, TypeSpec};
use crate::{CodecConfig, CodecError, Result};

/// Collects type registrations and settings, then builds a [`Codec`].
#[derive(Debug, Default)]
pub struct CodecBuilder {
    types: TypeRegistry,
    config: CodecConfig,
    formats: Option<Vec<EncodingFormat>>,
}

impl CodecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the field layout of native type `T`.
    pub fn register<T: Record>(mut self, spec: TypeSpec) -> Result<Self> {
        self.types.register::<T>(spec)?;
        Ok(self)
    }

    pub fn config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// Restricts the codec to the listed formats. All formats are enabled
    /// by default.
    pub fn formats(mut self, formats: impl IntoIterator<Item = EncodingFormat>) -> Self {
        self.formats = Some(formats.into_iter().collect());
        self
    }

    /// Validates cross-type references and defaults and freezes both
    /// registries.
    pub fn build(self) -> Result<Codec> {
        self.types.validate()?;
        let mut adapters = Codecs::with_options(self.config.pack_options());
        if let Some(enabled) = &self.formats {
            for format in EncodingFormat::ALL {
                if !enabled.contains(&format) {
                    adapters.remove(format);
                }
            }
        }
        debug!(
            types = self.types.len(),
            formats = ?adapters,
            unknown_fields = ?self.config.unknown_fields,
            "built codec"
        );
        Ok(Codec {
            inner: Arc::new(Inner {
                adapters,
                types: self.types,
                config: self.config,
            }),
        })
    }
}

#[derive(Debug)]
struct Inner {
    adapters: Codecs,
    types: TypeRegistry,
    config: CodecConfig,
}

/// Typed encode/decode across every enabled format.
///
/// Holds no per-call state, so clones are cheap and one codec can serve
/// any number of threads.
///
/// ```
/// use bytelyplay::{Codec, EncodingFormat, FieldKind, FieldReader, FieldWriter, Record, Result, TypeSpec};
///
/// #[derive(Debug, PartialEq)]
/// struct Point { x: f64, y: f64 }
///
/// impl Record for Point {
///     fn write(&self, out: &mut FieldWriter<'_>) -> Result<()> {
///         out.put("x", &self.x)?;
///         out.put("y", &self.y)
///     }
///     fn read(input: &mut FieldReader<'_>) -> Result<Self> {
///         Ok(Point { x: input.take("x")?, y: input.take("y")? })
///     }
/// }
///
/// let codec = Codec::builder()
///     .register::<Point>(TypeSpec::new("Point").required("x", FieldKind::Float).required("y", FieldKind::Float))?
///     .build()?;
/// let bytes = codec.encode(&Point { x: 1.0, y: -2.5 }, EncodingFormat::Json)?;
/// assert_eq!(bytes, br#"{"x":1.0,"y":-2.5}"#);
/// assert_eq!(codec.decode::<Point>(&bytes, EncodingFormat::Json)?, Point { x: 1.0, y: -2.5 });
/// # Ok::<(), bytelyplay::CodecError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Codec {
    inner: Arc<Inner>,
}

impl Codec {
    pub fn builder() -> CodecBuilder {
        CodecBuilder::new()
    }

    pub fn config(&self) -> &CodecConfig {
        &self.inner.config
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.inner.types
    }

    /// Enabled formats.
    pub fn formats(&self) -> impl Iterator<Item = EncodingFormat> + '_ {
        self.inner.adapters.formats()
    }

    pub fn adapter(&self, format: EncodingFormat) -> Result<&Arc<dyn FormatAdapter>> {
        self.inner
            .adapters
            .get(format)
            .ok_or_else(|| CodecError::UnsupportedFormat(format.name().to_owned()))
    }

    /// Resolves a format name (case-insensitive) to an enabled format.
    pub fn format_by_name(&self, name: &str) -> Result<EncodingFormat> {
        match name.parse::<EncodingFormat>() {
            Ok(format) if self.inner.adapters.contains(format) => Ok(format),
            _ => Err(CodecError::UnsupportedFormat(name.to_owned())),
        }
    }

    /// Registered type name of `T`.
    pub fn type_name<T: Record>(&self) -> Result<&str> {
        Ok(self.inner.types.spec_of::<T>()?.name())
    }

    fn mapper(&self) -> Mapper<'_> {
        Mapper::new(&self.inner.types, self.inner.config.unknown_fields)
    }

    pub fn to_value<T: Record>(&self, record: &T) -> Result<Value> {
        write_record(self.mapper(), record, "")
    }

    pub fn from_value<T: Record>(&self, value: Value) -> Result<T> {
        read_record(self.mapper(), value, &FieldKind::Any, "")
    }

    pub fn to_value_seq<T: Record>(&self, records: &[T]) -> Result<Value> {
        let mapper = self.mapper();
        records
            .iter()
            .enumerate()
            .map(|(i, record)| write_record(mapper, record, &format!("[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Sequence)
    }

    pub fn from_value_seq<T: Record>(&self, value: Value) -> Result<Vec<T>> {
        let items = match value {
            Value::Sequence(items) => items,
            other => {
                return Err(CodecError::mismatch(
                    "",
                    ValueKind::Sequence,
                    other.kind(),
                ))
            }
        };
        let mapper = self.mapper();
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| read_record(mapper, item, &FieldKind::Any, &format!("[{i}]")))
            .collect()
    }

    pub fn encode_value(&self, value: &Value, format: EncodingFormat) -> Result<Vec<u8>> {
        let bytes = self
            .adapter(format)?
            .encode(value)
            .map_err(|source| CodecError::Unrepresentable { format, source })?;
        trace!(%format, len = bytes.len(), "encoded");
        Ok(bytes)
    }

    pub fn decode_value(&self, bytes: &[u8], format: EncodingFormat) -> Result<Value> {
        let value = self
            .adapter(format)?
            .decode(bytes)
            .map_err(|source| CodecError::MalformedInput { format, source })?;
        trace!(%format, len = bytes.len(), "decoded");
        Ok(value)
    }

    pub fn encode<T: Record>(&self, record: &T, format: EncodingFormat) -> Result<Vec<u8>> {
        self.adapter(format)?;
        self.encode_value(&self.to_value(record)?, format)
    }

    pub fn decode<T: Record>(&self, bytes: &[u8], format: EncodingFormat) -> Result<T> {
        self.inner.types.spec_of::<T>()?;
        self.from_value(self.decode_value(bytes, format)?)
    }

    pub fn encode_seq<T: Record>(&self, records: &[T], format: EncodingFormat) -> Result<Vec<u8>> {
        self.adapter(format)?;
        self.encode_value(&self.to_value_seq(records)?, format)
    }

    pub fn decode_seq<T: Record>(&self, bytes: &[u8], format: EncodingFormat) -> Result<Vec<T>> {
        self.inner.types.spec_of::<T>()?;
        self.from_value_seq(self.decode_value(bytes, format)?)
    }

    /// Like [`Codec::encode_value`], with the format identifier byte in
    /// front of binary payloads.
    pub fn encode_value_tagged(&self, value: &Value, format: EncodingFormat) -> Result<Vec<u8>> {
        Ok(envelope::tag(format, self.encode_value(value, format)?))
    }

    /// Decodes a payload written by [`Codec::encode_value_tagged`],
    /// detecting the format from its first byte.
    pub fn decode_value_tagged(&self, bytes: &[u8]) -> Result<Value> {
        let (format, payload) = envelope::untag(bytes);
        self.decode_value(payload, format)
    }

    pub fn encode_tagged<T: Record>(&self, record: &T, format: EncodingFormat) -> Result<Vec<u8>> {
        self.adapter(format)?;
        self.encode_value_tagged(&self.to_value(record)?, format)
    }

    pub fn decode_tagged<T: Record>(&self, bytes: &[u8]) -> Result<T> {
        self.inner.types.spec_of::<T>()?;
        self.from_value(self.decode_value_tagged(bytes)?)
    }
}
