//! CBOR constants.

// MAJOR type values (bits 7-5 of the initial byte)
pub const MAJOR_UIN: u8 = 0b000;
pub const MAJOR_NIN: u8 = 0b001;
pub const MAJOR_BIN: u8 = 0b010;
pub const MAJOR_STR: u8 = 0b011;
pub const MAJOR_ARR: u8 = 0b100;
pub const MAJOR_MAP: u8 = 0b101;
pub const MAJOR_TAG: u8 = 0b110;
pub const MAJOR_TKN: u8 = 0b111;

// MAJOR type overlays (major shifted to bits 7-5)
pub const OVERLAY_UIN: u8 = 0b000_00000;
pub const OVERLAY_NIN: u8 = 0b001_00000;
pub const OVERLAY_BIN: u8 = 0b010_00000;
pub const OVERLAY_STR: u8 = 0b011_00000;
pub const OVERLAY_ARR: u8 = 0b100_00000;
pub const OVERLAY_MAP: u8 = 0b101_00000;

pub const MINOR_MASK: u8 = 0b11111;

/// Additional-info value announcing an indefinite-length item.
pub const MINOR_INDEFINITE: u8 = 31;

// Simple values and floats (major type 7)
pub const FALSE: u8 = 0xf4;
pub const TRUE: u8 = 0xf5;
pub const NULL: u8 = 0xf6;
pub const UNDEFINED: u8 = 0xf7;
pub const FLOAT_16: u8 = 0xf9;
pub const FLOAT_32: u8 = 0xfa;
pub const FLOAT_64: u8 = 0xfb;

/// CBOR "break" stop code.
pub const CBOR_END: u8 = 0xff;
