//! Smile token constants.

pub const HEADER: [u8; 3] = [b':', b')', b'\n'];
pub const HEADER_BIT_SHARED_NAMES: u8 = 0x01;
pub const HEADER_BIT_SHARED_VALUES: u8 = 0x02;
pub const HEADER_BIT_RAW_BINARY: u8 = 0x04;
pub const HEADER_VERSION_MASK: u8 = 0xf0;

// Value-mode tokens
pub const TOKEN_EMPTY_STRING: u8 = 0x20;
pub const TOKEN_NULL: u8 = 0x21;
pub const TOKEN_FALSE: u8 = 0x22;
pub const TOKEN_TRUE: u8 = 0x23;
pub const TOKEN_INT_32: u8 = 0x24;
pub const TOKEN_INT_64: u8 = 0x25;
pub const TOKEN_BIG_INTEGER: u8 = 0x26;
pub const TOKEN_FLOAT_32: u8 = 0x28;
pub const TOKEN_FLOAT_64: u8 = 0x29;
pub const TOKEN_BIG_DECIMAL: u8 = 0x2a;

pub const PREFIX_TINY_ASCII: u8 = 0x40;
pub const PREFIX_SHORT_ASCII: u8 = 0x60;
pub const PREFIX_TINY_UNICODE: u8 = 0x80;
pub const PREFIX_SHORT_UNICODE: u8 = 0xa0;
pub const PREFIX_SMALL_INT: u8 = 0xc0;

pub const TOKEN_LONG_ASCII: u8 = 0xe0;
pub const TOKEN_LONG_UNICODE: u8 = 0xe4;
pub const TOKEN_BINARY_7BIT: u8 = 0xe8;
pub const PREFIX_LONG_SHARED_VALUE: u8 = 0xec;

pub const TOKEN_START_ARRAY: u8 = 0xf8;
pub const TOKEN_END_ARRAY: u8 = 0xf9;
pub const TOKEN_START_OBJECT: u8 = 0xfa;
pub const TOKEN_END_OBJECT: u8 = 0xfb;
pub const TOKEN_END_OF_STRING: u8 = 0xfc;
pub const TOKEN_BINARY_RAW: u8 = 0xfd;
pub const TOKEN_END_OF_CONTENT: u8 = 0xff;

// Key-mode tokens
pub const KEY_EMPTY_STRING: u8 = 0x20;
pub const PREFIX_KEY_LONG_SHARED: u8 = 0x30;
pub const TOKEN_KEY_LONG_NAME: u8 = 0x34;
pub const PREFIX_KEY_SHARED: u8 = 0x40;
pub const PREFIX_KEY_ASCII: u8 = 0x80;
pub const PREFIX_KEY_UNICODE: u8 = 0xc0;

/// Longest ASCII value written with a tiny/short token.
pub const MAX_SHORT_VALUE_ASCII: usize = 64;
/// Longest Unicode value (in bytes) written with a tiny/short token.
pub const MAX_SHORT_VALUE_UNICODE: usize = 65;
/// Longest ASCII name written with a short key token.
pub const MAX_SHORT_NAME_ASCII: usize = 64;
/// Longest Unicode name (in bytes) written with a short key token.
pub const MAX_SHORT_NAME_UNICODE: usize = 57;
/// Longest name (in bytes) eligible for back-referencing.
pub const MAX_SHARED_NAME_BYTES: usize = 64;
/// Shared-name and shared-value tables are wiped once they hold this many entries.
pub const MAX_SHARED_ENTRIES: usize = 1024;

/// Zigzag-encodes a 32-bit integer.
#[inline]
pub fn zigzag32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// Zigzag-encodes a 64-bit integer.
#[inline]
pub fn zigzag64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

#[inline]
pub fn unzigzag32(z: u32) -> i32 {
    ((z >> 1) as i32) ^ -((z & 1) as i32)
}

#[inline]
pub fn unzigzag64(z: u64) -> i64 {
    ((z >> 1) as i64) ^ -((z & 1) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_roundtrip() {
        for n in [0, -1, 1, -16, 15, i32::MIN, i32::MAX] {
            assert_eq!(unzigzag32(zigzag32(n)), n);
        }
        for n in [0, -1, 1, i64::MIN, i64::MAX] {
            assert_eq!(unzigzag64(zigzag64(n)), n);
        }
        assert_eq!(zigzag32(-1), 1);
        assert_eq!(zigzag32(1), 2);
        assert_eq!(zigzag32(-16), 31);
    }
}
