//! Format-neutral value model and interchangeable encodings for bytelyplay.
//!
//! A [`Value`] tree can be written to and read back from three formats:
//!
//! - [`json`] writes UTF-8 text, compact or pretty-printed
//! - [`cbor`] writes RFC 8949 binary
//! - [`smile`] writes Jackson's binary JSON
//!
//! Each format is exposed both as a low-level encoder/decoder pair and as a
//! stateless [`codecs::FormatAdapter`] collected in a [`codecs::Codecs`]
//! registry.
//!
//! ```
//! use bytelyplay_pack::codecs::Codecs;
//! use bytelyplay_pack::{EncodingFormat, Value};
//!
//! let codecs = Codecs::new();
//! let value = Value::mapping([("id", Value::Int(7)), ("blob", Value::Bytes(vec![1, 2]))]);
//! for format in EncodingFormat::ALL {
//!     let adapter = codecs.get(format).unwrap();
//!     let bytes = adapter.encode(&value).unwrap();
//!     assert_eq!(adapter.decode(&bytes).unwrap(), value);
//! }
//! ```

mod constants;
mod value;

pub mod cbor;
pub mod codecs;
pub mod json;
pub mod smile;

pub use constants::{EncodingFormat, UnknownFormatName, DEFAULT_MAX_DEPTH};
pub use value::{Mapping, TypeMismatch, Value, ValueKind};

pub use codecs::{Codecs, FormatAdapter, PackError, PackOptions};
