//! CBOR (RFC 8949) encoder/decoder.
//!
//! Byte strings use major type 2, so binary payloads travel without any
//! text inflation. Floats are always written at 64-bit width.

pub mod constants;
mod decoder;
mod encoder;
mod error;
mod shared;

pub use decoder::CborDecoder;
pub use encoder::CborEncoder;
pub use error::CborError;
pub use shared::{decode, encode};
