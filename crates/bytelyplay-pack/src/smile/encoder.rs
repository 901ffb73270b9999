//! `SmileEncoder`: writes a [`Value`] tree as a Smile document.

use std::collections::HashMap;

use bytelyplay_buffers::Writer;

use super::constants::*;
use super::{SmileError, SmileOptions};
use crate::{Mapping, Value, DEFAULT_MAX_DEPTH};

/// Index of strings already written, for back-references.
#[derive(Default)]
struct SeenTable {
    index: HashMap<String, usize>,
}

impl SeenTable {
    fn find(&self, s: &str) -> Option<usize> {
        self.index.get(s).copied()
    }

    fn add(&mut self, s: &str) {
        if self.index.len() == MAX_SHARED_ENTRIES {
            self.index.clear();
        }
        let ix = self.index.len();
        self.index.insert(s.to_owned(), ix);
    }
}

/// Smile encoder.
///
/// Writes the header, then one value. Every call to [`SmileEncoder::encode`]
/// starts a fresh document with empty back-reference tables.
pub struct SmileEncoder {
    pub writer: Writer,
    options: SmileOptions,
    max_depth: usize,
    names: SeenTable,
    values: SeenTable,
}

impl Default for SmileEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SmileEncoder {
    pub fn new() -> Self {
        Self::with_options(SmileOptions::default(), DEFAULT_MAX_DEPTH)
    }

    pub fn with_options(options: SmileOptions, max_depth: usize) -> Self {
        Self {
            writer: Writer::new(),
            options,
            max_depth,
            names: SeenTable::default(),
            values: SeenTable::default(),
        }
    }

    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, SmileError> {
        self.writer.reset();
        self.names = SeenTable::default();
        self.values = SeenTable::default();
        self.write_header();
        self.write_any(value, 0)?;
        Ok(self.writer.flush())
    }

    fn write_header(&mut self) {
        self.writer.buf(&HEADER);
        self.writer.u8(self.options.header_flags());
    }

    fn write_any(&mut self, value: &Value, depth: usize) -> Result<(), SmileError> {
        match value {
            Value::Null => self.writer.u8(TOKEN_NULL),
            Value::Bool(b) => self.writer.u8(if *b { TOKEN_TRUE } else { TOKEN_FALSE }),
            Value::Int(i) => self.write_integer(*i),
            Value::Float(f) => self.write_float(*f),
            Value::Text(s) => self.write_str(s),
            Value::Bytes(b) => self.write_bin(b),
            Value::Sequence(items) => self.write_arr(items, depth + 1)?,
            Value::Mapping(map) => self.write_obj(map, depth + 1)?,
        }
        Ok(())
    }

    pub fn write_integer(&mut self, int: i64) {
        if (-16..=15).contains(&int) {
            self.writer.u8(PREFIX_SMALL_INT | zigzag32(int as i32) as u8);
        } else if let Ok(int) = i32::try_from(int) {
            self.writer.u8(TOKEN_INT_32);
            self.write_vint(u64::from(zigzag32(int)));
        } else {
            self.writer.u8(TOKEN_INT_64);
            self.write_vint(zigzag64(int));
        }
    }

    /// Writes the raw IEEE bits as ten 7-bit groups, most significant first.
    pub fn write_float(&mut self, float: f64) {
        let bits = float.to_bits();
        self.writer.u8(TOKEN_FLOAT_64);
        for group in (0..10).rev() {
            self.writer.u8(((bits >> (7 * group)) & 0x7f) as u8);
        }
    }

    pub fn write_str(&mut self, s: &str) {
        if s.is_empty() {
            self.writer.u8(TOKEN_EMPTY_STRING);
            return;
        }
        let len = s.len();
        let ascii = s.is_ascii();
        let short = if ascii {
            len <= MAX_SHORT_VALUE_ASCII
        } else {
            len <= MAX_SHORT_VALUE_UNICODE
        };
        if short && self.options.shared_values {
            if let Some(ix) = self.values.find(s) {
                self.write_shared_value_ref(ix);
                return;
            }
            self.values.add(s);
        }
        match (ascii, short) {
            (true, true) if len <= 32 => self.writer.u8(PREFIX_TINY_ASCII | (len - 1) as u8),
            (true, true) => self.writer.u8(PREFIX_SHORT_ASCII | (len - 33) as u8),
            (false, true) if len <= 33 => self.writer.u8(PREFIX_TINY_UNICODE | (len - 2) as u8),
            (false, true) => self.writer.u8(PREFIX_SHORT_UNICODE | (len - 34) as u8),
            (true, false) => self.writer.u8(TOKEN_LONG_ASCII),
            (false, false) => self.writer.u8(TOKEN_LONG_UNICODE),
        }
        self.writer.utf8(s);
        if !short {
            self.writer.u8(TOKEN_END_OF_STRING);
        }
    }

    fn write_shared_value_ref(&mut self, ix: usize) {
        if ix < 31 {
            self.writer.u8((ix + 1) as u8);
        } else {
            self.writer.u8(PREFIX_LONG_SHARED_VALUE | (ix >> 8) as u8);
            self.writer.u8((ix & 0xff) as u8);
        }
    }

    pub fn write_bin(&mut self, buf: &[u8]) {
        if self.options.raw_binary {
            self.writer.u8(TOKEN_BINARY_RAW);
            self.write_vint(buf.len() as u64);
            self.writer.buf(buf);
            return;
        }
        self.writer.u8(TOKEN_BINARY_7BIT);
        self.write_vint(buf.len() as u64);
        let mut chunks = buf.chunks_exact(7);
        for chunk in &mut chunks {
            let bits = chunk.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
            for group in (0..8).rev() {
                self.writer.u8(((bits >> (7 * group)) & 0x7f) as u8);
            }
        }
        // n leftover bytes: n groups of 7 bits, then the final n bits right-aligned
        let rest = chunks.remainder();
        if !rest.is_empty() {
            let n = rest.len();
            let bits = rest.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
            let total = 8 * n;
            for k in 1..=n {
                self.writer.u8(((bits >> (total - 7 * k)) & 0x7f) as u8);
            }
            self.writer.u8((bits & ((1 << n) - 1)) as u8);
        }
    }

    fn write_arr(&mut self, items: &[Value], depth: usize) -> Result<(), SmileError> {
        self.check_depth(depth)?;
        self.writer.u8(TOKEN_START_ARRAY);
        for item in items {
            self.write_any(item, depth)?;
        }
        self.writer.u8(TOKEN_END_ARRAY);
        Ok(())
    }

    fn write_obj(&mut self, map: &Mapping, depth: usize) -> Result<(), SmileError> {
        self.check_depth(depth)?;
        self.writer.u8(TOKEN_START_OBJECT);
        for (key, value) in map {
            self.write_key(key);
            self.write_any(value, depth)?;
        }
        self.writer.u8(TOKEN_END_OBJECT);
        Ok(())
    }

    pub fn write_key(&mut self, key: &str) {
        if key.is_empty() {
            self.writer.u8(KEY_EMPTY_STRING);
            return;
        }
        let len = key.len();
        let shareable = self.options.shared_names && len <= MAX_SHARED_NAME_BYTES;
        if shareable {
            if let Some(ix) = self.names.find(key) {
                if ix < 64 {
                    self.writer.u8(PREFIX_KEY_SHARED | ix as u8);
                } else {
                    self.writer.u8(PREFIX_KEY_LONG_SHARED | (ix >> 8) as u8);
                    self.writer.u8((ix & 0xff) as u8);
                }
                return;
            }
            self.names.add(key);
        }
        let ascii = key.is_ascii();
        if ascii && len <= MAX_SHORT_NAME_ASCII {
            self.writer.u8(PREFIX_KEY_ASCII | (len - 1) as u8);
            self.writer.utf8(key);
        } else if !ascii && len <= MAX_SHORT_NAME_UNICODE {
            self.writer.u8(PREFIX_KEY_UNICODE | (len - 2) as u8);
            self.writer.utf8(key);
        } else {
            self.writer.u8(TOKEN_KEY_LONG_NAME);
            self.writer.utf8(key);
            self.writer.u8(TOKEN_END_OF_STRING);
        }
    }

    /// Smile VInt: 7-bit groups, the last byte carries 6 bits and has 0x80 set.
    pub fn write_vint(&mut self, mut v: u64) {
        let mut tmp = [0u8; 11];
        let mut i = tmp.len() - 1;
        tmp[i] = 0x80 | (v & 0x3f) as u8;
        v >>= 6;
        while v > 0 {
            i -= 1;
            tmp[i] = (v & 0x7f) as u8;
            v >>= 7;
        }
        self.writer.buf(&tmp[i..]);
    }

    fn check_depth(&self, depth: usize) -> Result<(), SmileError> {
        if depth > self.max_depth {
            return Err(SmileError::DepthExceeded(self.max_depth));
        }
        Ok(())
    }
}
