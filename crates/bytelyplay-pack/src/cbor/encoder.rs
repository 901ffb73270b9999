//! `CborEncoder`: writes a [`Value`] tree as definite-length CBOR.

use bytelyplay_buffers::Writer;

use super::constants::*;
use super::CborError;
use crate::{Mapping, Value, DEFAULT_MAX_DEPTH};

/// CBOR encoder.
///
/// Integers take the shortest header, floats are always `0xfb` doubles so
/// no precision is lost, and every container is definite-length.
pub struct CborEncoder {
    pub writer: Writer,
    max_depth: usize,
}

impl Default for CborEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CborEncoder {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            writer: Writer::new(),
            max_depth,
        }
    }

    /// Encode a value and return the CBOR bytes.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, CborError> {
        self.writer.reset();
        self.write_any(value, 0)?;
        Ok(self.writer.flush())
    }

    pub fn write_any(&mut self, value: &Value, depth: usize) -> Result<(), CborError> {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(b) => self.write_boolean(*b),
            Value::Int(i) => self.write_integer(*i),
            Value::Float(f) => self.write_float(*f),
            Value::Text(s) => self.write_str(s),
            Value::Bytes(b) => self.write_bin(b),
            Value::Sequence(items) => self.write_arr(items, depth + 1)?,
            Value::Mapping(map) => self.write_obj(map, depth + 1)?,
        }
        Ok(())
    }

    pub fn write_null(&mut self) {
        self.writer.u8(NULL);
    }

    pub fn write_boolean(&mut self, b: bool) {
        self.writer.u8(if b { TRUE } else { FALSE });
    }

    pub fn write_integer(&mut self, int: i64) {
        if int >= 0 {
            self.write_hdr(OVERLAY_UIN, int as u64);
        } else {
            // -1 - n never overflows for negative n
            self.write_hdr(OVERLAY_NIN, (-1 - int) as u64);
        }
    }

    pub fn write_float(&mut self, float: f64) {
        self.writer.u8f64(FLOAT_64, float);
    }

    pub fn write_bin(&mut self, buf: &[u8]) {
        self.write_hdr(OVERLAY_BIN, buf.len() as u64);
        self.writer.buf(buf);
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_hdr(OVERLAY_STR, s.len() as u64);
        self.writer.utf8(s);
    }

    fn write_arr(&mut self, items: &[Value], depth: usize) -> Result<(), CborError> {
        self.check_depth(depth)?;
        self.write_hdr(OVERLAY_ARR, items.len() as u64);
        for item in items {
            self.write_any(item, depth)?;
        }
        Ok(())
    }

    fn write_obj(&mut self, map: &Mapping, depth: usize) -> Result<(), CborError> {
        self.check_depth(depth)?;
        self.write_hdr(OVERLAY_MAP, map.len() as u64);
        for (key, value) in map {
            self.write_str(key);
            self.write_any(value, depth)?;
        }
        Ok(())
    }

    fn check_depth(&self, depth: usize) -> Result<(), CborError> {
        if depth > self.max_depth {
            return Err(CborError::DepthExceeded(self.max_depth));
        }
        Ok(())
    }

    /// Writes a major-type header with the shortest argument encoding.
    pub fn write_hdr(&mut self, overlay: u8, arg: u64) {
        let w = &mut self.writer;
        if arg <= 23 {
            w.u8(overlay | arg as u8);
        } else if arg <= 0xff {
            w.u8(overlay | 24);
            w.u8(arg as u8);
        } else if arg <= 0xffff {
            w.u8(overlay | 25);
            w.u16(arg as u16);
        } else if arg <= 0xffff_ffff {
            w.u8(overlay | 26);
            w.u32(arg as u32);
        } else {
            w.u8u64(overlay | 27, arg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(value: &Value) -> Vec<u8> {
        CborEncoder::new().encode(value).unwrap()
    }

    #[test]
    fn integer_headers_pick_shortest_form() {
        assert_eq!(enc(&Value::Int(0)), vec![0x00]);
        assert_eq!(enc(&Value::Int(23)), vec![0x17]);
        assert_eq!(enc(&Value::Int(24)), vec![0x18, 24]);
        assert_eq!(enc(&Value::Int(1000)), vec![0x19, 0x03, 0xe8]);
        assert_eq!(enc(&Value::Int(-1)), vec![0x20]);
        assert_eq!(enc(&Value::Int(-100)), vec![0x38, 99]);
        assert_eq!(
            enc(&Value::Int(i64::MIN)),
            vec![0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn floats_are_always_doubles() {
        let bytes = enc(&Value::Float(1.5));
        assert_eq!(bytes[0], 0xfb);
        assert_eq!(bytes.len(), 9);
    }

    #[test]
    fn bytes_use_major_type_two() {
        assert_eq!(enc(&Value::Bytes(vec![1, 2, 3])), vec![0x43, 1, 2, 3]);
    }

    #[test]
    fn mapping_keeps_insertion_order() {
        let value = Value::mapping([("b", Value::Int(1)), ("a", Value::Null)]);
        assert_eq!(enc(&value), vec![0xa2, 0x61, b'b', 0x01, 0x61, b'a', 0xf6]);
    }

    #[test]
    fn depth_limit_applies() {
        let mut value = Value::Null;
        for _ in 0..3 {
            value = Value::Sequence(vec![value]);
        }
        let mut encoder = CborEncoder::with_max_depth(2);
        assert_eq!(encoder.encode(&value), Err(CborError::DepthExceeded(2)));
        assert!(CborEncoder::with_max_depth(3).encode(&value).is_ok());
    }
}
