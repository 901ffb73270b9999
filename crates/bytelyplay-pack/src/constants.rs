//! Top-level constants for bytelyplay-pack.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Deepest container nesting accepted by the encoders and decoders.
///
/// JSON parsing is additionally capped by `serde_json` at 127 levels.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Encoding format identifier.
///
/// The discriminants double as the envelope identifier bytes of the binary
/// formats; JSON documents identify themselves by their leading `{`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingFormat {
    Smile = 0,
    Cbor = 1,
    Json = 2,
}

impl EncodingFormat {
    /// Every supported format, text first.
    pub const ALL: [EncodingFormat; 3] = [Self::Json, Self::Cbor, Self::Smile];

    /// Lowercase format name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Smile => "smile",
            Self::Cbor => "cbor",
            Self::Json => "json",
        }
    }

    /// Byte that marks a document of this format inside an envelope.
    pub fn identifier(self) -> u8 {
        match self {
            Self::Smile => 0x00,
            Self::Cbor => 0x01,
            Self::Json => b'{',
        }
    }

    /// Reverse lookup of [`EncodingFormat::identifier`].
    pub fn from_identifier(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Smile),
            0x01 => Some(Self::Cbor),
            b'{' => Some(Self::Json),
            _ => None,
        }
    }

    /// `true` for CBOR and Smile.
    pub fn is_binary(self) -> bool {
        !matches!(self, Self::Json)
    }
}

impl fmt::Display for EncodingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unrecognised format name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown encoding format `{0}`")]
pub struct UnknownFormatName(pub String);

impl FromStr for EncodingFormat {
    type Err = UnknownFormatName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "smile" => Ok(Self::Smile),
            "cbor" => Ok(Self::Cbor),
            "json" => Ok(Self::Json),
            _ => Err(UnknownFormatName(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip_through_from_str() {
        for format in EncodingFormat::ALL {
            assert_eq!(format.name().parse::<EncodingFormat>().unwrap(), format);
        }
        assert_eq!("CBOR".parse::<EncodingFormat>().unwrap(), EncodingFormat::Cbor);
        assert_eq!(
            "yaml".parse::<EncodingFormat>(),
            Err(UnknownFormatName("yaml".into()))
        );
    }

    #[test]
    fn identifier_bytes() {
        assert_eq!(EncodingFormat::Smile.identifier(), 0x00);
        assert_eq!(EncodingFormat::Cbor.identifier(), 0x01);
        assert_eq!(EncodingFormat::Json.identifier(), b'{');
        for format in EncodingFormat::ALL {
            assert_eq!(EncodingFormat::from_identifier(format.identifier()), Some(format));
        }
        assert_eq!(EncodingFormat::from_identifier(0x02), None);
    }
}
