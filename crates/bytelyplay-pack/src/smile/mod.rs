//! Smile encoder/decoder.
//!
//! Smile is the binary JSON format from the Jackson project. A document
//! starts with the header `:)\n` plus a flags byte, followed by one value.
//! Property names and short string values can be back-referenced by index,
//! and binary data is either 7-bit packed or (when the header allows it)
//! written raw.

pub mod constants;
mod decoder;
mod encoder;
mod error;

pub use decoder::SmileDecoder;
pub use encoder::SmileEncoder;
pub use error::SmileError;

/// Header flags written by [`SmileEncoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmileOptions {
    /// Back-reference repeated property names.
    pub shared_names: bool,
    /// Back-reference repeated short string values.
    pub shared_values: bool,
    /// Write byte sequences raw instead of 7-bit packed.
    pub raw_binary: bool,
}

impl Default for SmileOptions {
    fn default() -> Self {
        Self {
            shared_names: true,
            shared_values: false,
            raw_binary: false,
        }
    }
}

impl SmileOptions {
    /// Fourth header byte: version 0 in the high nibble, feature bits below.
    pub fn header_flags(self) -> u8 {
        let mut flags = 0;
        if self.shared_names {
            flags |= constants::HEADER_BIT_SHARED_NAMES;
        }
        if self.shared_values {
            flags |= constants::HEADER_BIT_SHARED_VALUES;
        }
        if self.raw_binary {
            flags |= constants::HEADER_BIT_RAW_BINARY;
        }
        flags
    }

    pub fn from_header_flags(flags: u8) -> Self {
        Self {
            shared_names: flags & constants::HEADER_BIT_SHARED_NAMES != 0,
            shared_values: flags & constants::HEADER_BIT_SHARED_VALUES != 0,
            raw_binary: flags & constants::HEADER_BIT_RAW_BINARY != 0,
        }
    }
}
