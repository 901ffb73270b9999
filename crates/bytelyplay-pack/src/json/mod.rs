//! JSON encoder/decoder family.
//!
//! Text is produced and parsed with `serde_json` (key order preserved).
//! Byte sequences have no JSON counterpart, so they travel as data-URI
//! strings; see [`binary`].

pub mod binary;
mod decoder;
mod encoder;
mod error;

pub use decoder::JsonDecoder;
pub use encoder::{JsonEncoder, JsonOptions};
pub use error::JsonError;
