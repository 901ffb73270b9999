//! `CborDecoder`: reads CBOR into a [`Value`] tree.

use bytelyplay_buffers::{decode_f16, Reader};

use super::constants::*;
use super::CborError;
use crate::{Mapping, Value, DEFAULT_MAX_DEPTH};

/// CBOR decoder.
///
/// Accepts definite and indefinite-length items, half/single/double floats
/// and `undefined` (read as null). Semantic tags are skipped and their inner
/// item is kept. Map keys must be text and unique, integers must fit in
/// `i64`, and the input must hold exactly one top-level item.
pub struct CborDecoder {
    max_depth: usize,
}

impl Default for CborDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CborDecoder {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn decode(&self, data: &[u8]) -> Result<Value, CborError> {
        let mut reader = Reader::new(data);
        let value = self.read_any(&mut reader, 0)?;
        if !reader.is_empty() {
            return Err(CborError::TrailingBytes(reader.size()));
        }
        Ok(value)
    }

    fn read_any(&self, r: &mut Reader<'_>, depth: usize) -> Result<Value, CborError> {
        let offset = r.x;
        let octet = r.u8()?;
        let major = octet >> 5;
        let minor = octet & MINOR_MASK;
        match major {
            MAJOR_UIN => {
                let uint = read_arg(r, minor, offset)?;
                i64::try_from(uint)
                    .map(Value::Int)
                    .map_err(|_| CborError::IntegerOverflow(offset))
            }
            MAJOR_NIN => {
                let uint = read_arg(r, minor, offset)?;
                let n = i64::try_from(uint).map_err(|_| CborError::IntegerOverflow(offset))?;
                Ok(Value::Int(-1 - n))
            }
            MAJOR_BIN => read_chunked(r, MAJOR_BIN, minor, offset).map(Value::Bytes),
            MAJOR_STR => {
                let bytes = read_chunked(r, MAJOR_STR, minor, offset)?;
                String::from_utf8(bytes).map(Value::Text).map_err(|e| {
                    CborError::Buffer(bytelyplay_buffers::BufferError::InvalidUtf8(
                        offset + e.utf8_error().valid_up_to(),
                    ))
                })
            }
            MAJOR_ARR => {
                self.check_depth(depth + 1)?;
                self.read_arr(r, minor, offset, depth + 1)
            }
            MAJOR_MAP => {
                self.check_depth(depth + 1)?;
                self.read_obj(r, minor, offset, depth + 1)
            }
            MAJOR_TAG => {
                read_arg(r, minor, offset)?;
                // tag chains recurse, so they count towards the depth budget
                self.check_depth(depth + 1)?;
                self.read_any(r, depth + 1)
            }
            MAJOR_TKN => self.read_token(r, octet, offset),
            _ => unreachable!("major type is three bits"),
        }
    }

    fn read_token(&self, r: &mut Reader<'_>, octet: u8, offset: usize) -> Result<Value, CborError> {
        match octet {
            FALSE => Ok(Value::Bool(false)),
            TRUE => Ok(Value::Bool(true)),
            NULL | UNDEFINED => Ok(Value::Null),
            FLOAT_16 => Ok(Value::Float(decode_f16(r.u16()?))),
            FLOAT_32 => Ok(Value::Float(f64::from(r.f32()?))),
            FLOAT_64 => Ok(Value::Float(r.f64()?)),
            CBOR_END => Err(CborError::UnexpectedBreak(offset)),
            0xf8 => Err(CborError::UnsupportedSimple {
                value: r.u8()?,
                offset,
            }),
            0xfc..=0xfe => Err(CborError::UnexpectedMinor {
                minor: octet & MINOR_MASK,
                offset,
            }),
            _ => Err(CborError::UnsupportedSimple {
                value: octet & MINOR_MASK,
                offset,
            }),
        }
    }

    fn read_arr(
        &self,
        r: &mut Reader<'_>,
        minor: u8,
        offset: usize,
        depth: usize,
    ) -> Result<Value, CborError> {
        let mut items = Vec::new();
        if minor == MINOR_INDEFINITE {
            while r.peek()? != CBOR_END {
                items.push(self.read_any(r, depth)?);
            }
            r.u8()?;
        } else {
            let len = read_len(r, minor, offset)?;
            items.reserve(len);
            for _ in 0..len {
                items.push(self.read_any(r, depth)?);
            }
        }
        Ok(Value::Sequence(items))
    }

    fn read_obj(
        &self,
        r: &mut Reader<'_>,
        minor: u8,
        offset: usize,
        depth: usize,
    ) -> Result<Value, CborError> {
        let mut map = Mapping::new();
        if minor == MINOR_INDEFINITE {
            while r.peek()? != CBOR_END {
                self.read_entry(r, &mut map, depth)?;
            }
            r.u8()?;
        } else {
            // every entry takes at least two bytes
            let len = read_len(r, minor, offset)?;
            if len > r.size() / 2 {
                return Err(CborError::InvalidSize {
                    size: len as u64,
                    offset,
                });
            }
            map.reserve(len);
            for _ in 0..len {
                self.read_entry(r, &mut map, depth)?;
            }
        }
        Ok(Value::Mapping(map))
    }

    fn read_entry(&self, r: &mut Reader<'_>, map: &mut Mapping, depth: usize) -> Result<(), CborError> {
        let key_offset = r.x;
        if r.peek()? >> 5 != MAJOR_STR {
            return Err(CborError::UnexpectedObjKey(key_offset));
        }
        let key = match self.read_any(r, depth)? {
            Value::Text(key) => key,
            _ => return Err(CborError::UnexpectedObjKey(key_offset)),
        };
        let value = self.read_any(r, depth)?;
        if map.contains_key(&key) {
            return Err(CborError::DuplicateKey(key));
        }
        map.insert(key, value);
        Ok(())
    }

    fn check_depth(&self, depth: usize) -> Result<(), CborError> {
        if depth > self.max_depth {
            return Err(CborError::DepthExceeded(self.max_depth));
        }
        Ok(())
    }
}

/// Reads the argument that follows an initial byte.
fn read_arg(r: &mut Reader<'_>, minor: u8, offset: usize) -> Result<u64, CborError> {
    match minor {
        0..=23 => Ok(u64::from(minor)),
        24 => Ok(u64::from(r.u8()?)),
        25 => Ok(u64::from(r.u16()?)),
        26 => Ok(u64::from(r.u32()?)),
        27 => r.u64().map_err(CborError::from),
        _ => Err(CborError::UnexpectedMinor { minor, offset }),
    }
}

/// Reads a definite length and rejects sizes larger than the remaining input.
fn read_len(r: &mut Reader<'_>, minor: u8, offset: usize) -> Result<usize, CborError> {
    let size = read_arg(r, minor, offset)?;
    match usize::try_from(size) {
        Ok(len) if len <= r.size() => Ok(len),
        _ => Err(CborError::InvalidSize { size, offset }),
    }
}

/// Reads a byte or text string payload, joining indefinite-length chunks.
fn read_chunked(
    r: &mut Reader<'_>,
    major: u8,
    minor: u8,
    offset: usize,
) -> Result<Vec<u8>, CborError> {
    if minor != MINOR_INDEFINITE {
        let len = read_len(r, minor, offset)?;
        return Ok(r.buf(len)?.to_vec());
    }
    let mut out = Vec::new();
    loop {
        let chunk_offset = r.x;
        let octet = r.u8()?;
        if octet == CBOR_END {
            return Ok(out);
        }
        let chunk_minor = octet & MINOR_MASK;
        if octet >> 5 != major || chunk_minor == MINOR_INDEFINITE {
            return Err(CborError::UnexpectedChunk(chunk_offset));
        }
        let len = read_len(r, chunk_minor, chunk_offset)?;
        out.extend_from_slice(r.buf(len)?);
    }
}
