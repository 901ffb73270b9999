//! `SmileDecoder`: reads a Smile document into a [`Value`] tree.

use bytelyplay_buffers::Reader;

use super::constants::*;
use super::{SmileError, SmileOptions};
use crate::{Mapping, Value, DEFAULT_MAX_DEPTH};

/// Smile decoder.
///
/// The header is mandatory and decides whether back-references are legal.
/// One top-level value is read, optionally followed by the `0xff`
/// end-of-content marker. Anything after that is rejected.
pub struct SmileDecoder {
    max_depth: usize,
}

impl Default for SmileDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-document decoding state.
struct Session<'a> {
    r: Reader<'a>,
    flags: SmileOptions,
    max_depth: usize,
    names: Vec<String>,
    values: Vec<String>,
}

impl SmileDecoder {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn decode(&self, data: &[u8]) -> Result<Value, SmileError> {
        let mut r = Reader::new(data);
        if data.len() < 4 || data[..3] != HEADER {
            return Err(SmileError::MissingHeader);
        }
        r.buf(3)?;
        let flags = r.u8()?;
        if flags & HEADER_VERSION_MASK != 0 {
            return Err(SmileError::UnsupportedVersion(flags >> 4));
        }
        let mut session = Session {
            r,
            flags: SmileOptions::from_header_flags(flags),
            max_depth: self.max_depth,
            names: Vec::new(),
            values: Vec::new(),
        };
        let value = session.read_any(0)?;
        if session.r.peek().ok() == Some(TOKEN_END_OF_CONTENT) {
            session.r.u8()?;
        }
        if !session.r.is_empty() {
            return Err(SmileError::TrailingBytes(session.r.size()));
        }
        Ok(value)
    }
}

fn remember(table: &mut Vec<String>, s: &str) {
    if table.len() == MAX_SHARED_ENTRIES {
        table.clear();
    }
    table.push(s.to_owned());
}

impl Session<'_> {
    fn read_any(&mut self, depth: usize) -> Result<Value, SmileError> {
        let offset = self.r.x;
        let token = self.r.u8()?;
        match token {
            0x01..=0x1f => self.shared_value(usize::from(token) - 1, offset),
            TOKEN_EMPTY_STRING => Ok(Value::Text(String::new())),
            TOKEN_NULL => Ok(Value::Null),
            TOKEN_FALSE => Ok(Value::Bool(false)),
            TOKEN_TRUE => Ok(Value::Bool(true)),
            TOKEN_INT_32 => {
                let z = self.read_vint()?;
                let z = u32::try_from(z).map_err(|_| SmileError::IntegerOverflow(offset))?;
                Ok(Value::Int(i64::from(unzigzag32(z))))
            }
            TOKEN_INT_64 => Ok(Value::Int(unzigzag64(self.read_vint()?))),
            TOKEN_BIG_INTEGER => self.read_big_integer(offset),
            TOKEN_FLOAT_32 => {
                let bits = self.read_7bit_groups(5, 0x0f)?;
                Ok(Value::Float(f64::from(f32::from_bits(bits as u32))))
            }
            TOKEN_FLOAT_64 => {
                let bits = self.read_7bit_groups(10, 0x01)?;
                Ok(Value::Float(f64::from_bits(bits)))
            }
            TOKEN_BIG_DECIMAL => Err(SmileError::Unsupported {
                what: "BigDecimal",
                offset,
            }),
            0x40..=0xbf => {
                let len = match token & 0xe0 {
                    PREFIX_TINY_ASCII => usize::from(token & 0x1f) + 1,
                    PREFIX_SHORT_ASCII => usize::from(token & 0x1f) + 33,
                    PREFIX_TINY_UNICODE => usize::from(token & 0x1f) + 2,
                    _ => usize::from(token & 0x1f) + 34,
                };
                let s = self.r.utf8(len)?;
                if self.flags.shared_values {
                    remember(&mut self.values, s);
                }
                Ok(Value::Text(s.to_owned()))
            }
            0xc0..=0xdf => Ok(Value::Int(i64::from(unzigzag32(u32::from(token & 0x1f))))),
            TOKEN_LONG_ASCII | TOKEN_LONG_UNICODE => self.read_terminated(offset).map(Value::Text),
            TOKEN_BINARY_7BIT => self.read_7bit_binary().map(Value::Bytes),
            PREFIX_LONG_SHARED_VALUE..=0xef => {
                let ix = (usize::from(token & 0x03) << 8) | usize::from(self.r.u8()?);
                self.shared_value(ix, offset)
            }
            TOKEN_START_ARRAY => self.read_arr(depth + 1),
            TOKEN_START_OBJECT => self.read_obj(depth + 1),
            TOKEN_BINARY_RAW => {
                let len = self.read_len()?;
                Ok(Value::Bytes(self.r.buf(len)?.to_vec()))
            }
            _ => Err(SmileError::UnknownToken { token, offset }),
        }
    }

    fn shared_value(&self, index: usize, offset: usize) -> Result<Value, SmileError> {
        if !self.flags.shared_values {
            return Err(SmileError::InvalidReference { index, offset });
        }
        self.values
            .get(index)
            .map(|s| Value::Text(s.clone()))
            .ok_or(SmileError::InvalidReference { index, offset })
    }

    fn read_arr(&mut self, depth: usize) -> Result<Value, SmileError> {
        self.check_depth(depth)?;
        let mut items = Vec::new();
        while self.r.peek()? != TOKEN_END_ARRAY {
            items.push(self.read_any(depth)?);
        }
        self.r.u8()?;
        Ok(Value::Sequence(items))
    }

    fn read_obj(&mut self, depth: usize) -> Result<Value, SmileError> {
        self.check_depth(depth)?;
        let mut map = Mapping::new();
        loop {
            let key_offset = self.r.x;
            let token = self.r.u8()?;
            let key = match token {
                TOKEN_END_OBJECT => return Ok(Value::Mapping(map)),
                KEY_EMPTY_STRING => String::new(),
                PREFIX_KEY_LONG_SHARED..=0x33 => {
                    let ix = (usize::from(token & 0x03) << 8) | usize::from(self.r.u8()?);
                    self.shared_name(ix, key_offset)?
                }
                TOKEN_KEY_LONG_NAME => {
                    let name = self.read_terminated(key_offset)?;
                    if self.flags.shared_names && name.len() <= MAX_SHARED_NAME_BYTES {
                        remember(&mut self.names, &name);
                    }
                    name
                }
                0x40..=0x7f => self.shared_name(usize::from(token & 0x3f), key_offset)?,
                0x80..=0xf7 => {
                    let len = if token < PREFIX_KEY_UNICODE {
                        usize::from(token & 0x3f) + 1
                    } else {
                        usize::from(token & 0x3f) + 2
                    };
                    let name = self.r.utf8(len)?.to_owned();
                    if self.flags.shared_names {
                        remember(&mut self.names, &name);
                    }
                    name
                }
                _ => {
                    return Err(SmileError::UnknownToken {
                        token,
                        offset: key_offset,
                    })
                }
            };
            let value = self.read_any(depth)?;
            if map.contains_key(&key) {
                return Err(SmileError::DuplicateKey(key));
            }
            map.insert(key, value);
        }
    }

    fn shared_name(&self, index: usize, offset: usize) -> Result<String, SmileError> {
        if !self.flags.shared_names {
            return Err(SmileError::InvalidReference { index, offset });
        }
        self.names
            .get(index)
            .cloned()
            .ok_or(SmileError::InvalidReference { index, offset })
    }

    /// Reads UTF-8 up to the `0xfc` end-of-string marker.
    fn read_terminated(&mut self, offset: usize) -> Result<String, SmileError> {
        let rest = &self.r.uint8[self.r.x..];
        let len = rest
            .iter()
            .position(|&b| b == TOKEN_END_OF_STRING)
            .ok_or(SmileError::UnterminatedString(offset))?;
        let s = self.r.utf8(len)?.to_owned();
        self.r.u8()?;
        Ok(s)
    }

    fn read_vint(&mut self) -> Result<u64, SmileError> {
        let offset = self.r.x;
        let mut value: u64 = 0;
        for _ in 0..10 {
            let b = self.r.u8()?;
            if b & 0x80 != 0 {
                if value > u64::MAX >> 6 {
                    return Err(SmileError::InvalidVInt(offset));
                }
                return Ok((value << 6) | u64::from(b & 0x3f));
            }
            if value > u64::MAX >> 7 {
                return Err(SmileError::InvalidVInt(offset));
            }
            value = (value << 7) | u64::from(b);
        }
        Err(SmileError::InvalidVInt(offset))
    }

    fn read_len(&mut self) -> Result<usize, SmileError> {
        let offset = self.r.x;
        let len = self.read_vint()?;
        usize::try_from(len).map_err(|_| SmileError::InvalidVInt(offset))
    }

    /// Reads `count` 7-bit groups; the first group may use at most `first_mask` bits.
    fn read_7bit_groups(&mut self, count: usize, first_mask: u8) -> Result<u64, SmileError> {
        let offset = self.r.x;
        let groups = self.r.buf(count)?;
        if groups[0] & !first_mask != 0 || groups.iter().any(|&g| g & 0x80 != 0) {
            return Err(SmileError::Invalid7Bit(offset));
        }
        Ok(groups
            .iter()
            .fold(0u64, |acc, &g| (acc << 7) | u64::from(g)))
    }

    fn read_7bit_binary(&mut self) -> Result<Vec<u8>, SmileError> {
        let len = self.read_len()?;
        let full = len / 7;
        let rest = len % 7;
        let encoded = full
            .checked_mul(8)
            .and_then(|n| n.checked_add(if rest > 0 { rest + 1 } else { 0 }))
            .ok_or(SmileError::InvalidVInt(self.r.x))?;
        self.r.ensure(encoded)?;
        let mut out = Vec::with_capacity(len);
        for _ in 0..full {
            let bits = self.read_7bit_groups(8, 0x7f)?;
            out.extend_from_slice(&bits.to_be_bytes()[1..]);
        }
        if rest > 0 {
            let offset = self.r.x;
            let groups = self.r.buf(rest + 1)?;
            let (last, head) = groups.split_last().ok_or(SmileError::Invalid7Bit(offset))?;
            if head.iter().any(|&g| g & 0x80 != 0) || u32::from(*last) >> rest != 0 {
                return Err(SmileError::Invalid7Bit(offset));
            }
            let bits = head.iter().fold(0u64, |acc, &g| (acc << 7) | u64::from(g));
            let bits = (bits << rest) | u64::from(*last);
            out.extend_from_slice(&bits.to_be_bytes()[8 - rest..]);
        }
        Ok(out)
    }

    /// Two's-complement big-endian magnitude, 7-bit packed; must fit in `i64`.
    fn read_big_integer(&mut self, offset: usize) -> Result<Value, SmileError> {
        let bytes = self.read_7bit_binary()?;
        if bytes.is_empty() || bytes.len() > 8 {
            return Err(SmileError::IntegerOverflow(offset));
        }
        let negative = bytes[0] & 0x80 != 0;
        let mut buf = if negative { [0xff; 8] } else { [0; 8] };
        buf[8 - bytes.len()..].copy_from_slice(&bytes);
        Ok(Value::Int(i64::from_be_bytes(buf)))
    }

    fn check_depth(&self, depth: usize) -> Result<(), SmileError> {
        if depth > self.max_depth {
            return Err(SmileError::DepthExceeded(self.max_depth));
        }
        Ok(())
    }
}
