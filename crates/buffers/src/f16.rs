//! Half-precision (16-bit) floating point utilities.

/// Decodes a half-precision (16-bit) floating point value.
///
/// The input is the raw binary representation of an IEEE 754 binary16 float.
///
/// ```
/// use bytelyplay_buffers::decode_f16;
///
/// assert_eq!(decode_f16(0x3C00), 1.0);
/// assert_eq!(decode_f16(0xC000), -2.0);
/// assert!(decode_f16(0x7C00).is_infinite());
/// assert!(decode_f16(0x7E00).is_nan());
/// ```
pub fn decode_f16(half: u16) -> f64 {
    let sign = if half & 0x8000 != 0 { -1.0 } else { 1.0 };
    let exp = (half >> 10) & 0x1f;
    let mant = f64::from(half & 0x03ff);
    let magnitude = match exp {
        // subnormal: mant * 2^-24
        0 => mant * 2f64.powi(-24),
        0x1f if mant == 0.0 => f64::INFINITY,
        0x1f => return f64::NAN,
        _ => (1024.0 + mant) * 2f64.powi(i32::from(exp) - 25),
    };
    sign * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_keeps_sign() {
        assert_eq!(decode_f16(0x0000), 0.0);
        assert!(decode_f16(0x8000).is_sign_negative());
    }

    #[test]
    fn normal_values() {
        assert_eq!(decode_f16(0x3C00), 1.0);
        assert_eq!(decode_f16(0xBC00), -1.0);
        assert_eq!(decode_f16(0x3E00), 1.5);
        assert_eq!(decode_f16(0x7BFF), 65504.0);
    }

    #[test]
    fn smallest_subnormal() {
        assert_eq!(decode_f16(0x0001), 2f64.powi(-24));
    }

    #[test]
    fn infinities_and_nan() {
        assert_eq!(decode_f16(0x7C00), f64::INFINITY);
        assert_eq!(decode_f16(0xFC00), f64::NEG_INFINITY);
        assert!(decode_f16(0x7C01).is_nan());
    }
}
