//! Typed multi-format codec.
//!
//! Native records describe their fields once with a [`TypeSpec`], then move
//! through one [`Codec`] to and from JSON, CBOR and Smile. The pipeline is
//! native record → [`Value`] (the Type Mapper) → bytes (a format adapter
//! from [`bytelyplay_pack`]), and the reverse on decode.
//!
//! ```
//! use bytelyplay::{Codec, EncodingFormat, FieldKind, FieldReader, FieldWriter, Record, Result, TypeSpec};
//!
//! #[derive(Debug, PartialEq)]
//! struct Widget {
//!     id: i64,
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! impl Record for Widget {
//!     fn write(&self, out: &mut FieldWriter<'_>) -> Result<()> {
//!         out.put("id", &self.id)?;
//!         out.put("name", &self.name)?;
//!         out.put("tags", &self.tags)
//!     }
//!
//!     fn read(input: &mut FieldReader<'_>) -> Result<Self> {
//!         Ok(Widget { id: input.take("id")?, name: input.take("name")?, tags: input.take("tags")? })
//!     }
//! }
//!
//! let codec = Codec::builder()
//!     .register::<Widget>(
//!         TypeSpec::new("Widget")
//!             .required("id", FieldKind::Int)
//!             .required("name", FieldKind::Text)
//!             .required("tags", FieldKind::sequence(FieldKind::Text)),
//!     )?
//!     .build()?;
//!
//! let widget = Widget { id: 7, name: "widget".into(), tags: vec!["a".into(), "b".into()] };
//! for format in EncodingFormat::ALL {
//!     let bytes = codec.encode(&widget, format)?;
//!     assert_eq!(codec.decode::<Widget>(&bytes, format)?, widget);
//! }
//! # Ok::<(), bytelyplay::CodecError>(())
//! ```

mod codec;
mod config;
mod envelope;
mod error;
pub mod mapper;
mod store;

pub use codec::{Codec, CodecBuilder};
pub use config::{CodecConfig, JsonConfig, SmileConfig, UnknownFieldPolicy};
pub use envelope::detect_format;
pub use error::{CodecError, Result};
pub use mapper::{
    ByteBuf, FieldDescriptor, FieldKind, FieldReader, FieldValue, FieldWriter, Record, TypeRegistry,
    TypeSpec,
};
pub use store::{DataStore, DataStoreBuilder, LoadReport};

pub use bytelyplay_pack::{EncodingFormat, Mapping, Value, ValueKind};
