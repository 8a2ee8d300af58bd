//! Wire-level encoding primitives.
//!
//! Base-128 varints, field keys and a cursor-style reader, matching the
//! standard protobuf binary format so that generated code round-trips with
//! any conforming peer. Generated message code is the only intended caller;
//! the binding layer in `protoflect` never touches bytes.

use std::io;

use crate::DecodeError;

/// Maximum number of bytes a varint may occupy.
const MAX_VARINT_LEN: usize = 10;

/// Wire type of a field key, the low three bits of the key varint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireType {
    /// A base-128 varint.
    Varint = 0,
    /// A little-endian 64-bit scalar.
    Fixed64 = 1,
    /// A varint length followed by that many bytes.
    LengthDelimited = 2,
    /// A little-endian 32-bit scalar.
    Fixed32 = 5,
}

impl WireType {
    fn from_value(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            5 => Ok(WireType::Fixed32),
            value => Err(DecodeError::UnknownWireType { value }),
        }
    }
}

/// Appends `value` as a base-128 varint.
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    while value >= 0x80 {
        buf.push((value as u8) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Number of bytes [`encode_varint`] will produce for `value`.
pub fn varint_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Decodes a varint from the front of `buf`, returning the value and the
/// number of bytes consumed.
pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize), DecodeError> {
    let mut value = 0u64;
    for (i, &byte) in buf.iter().take(MAX_VARINT_LEN).enumerate() {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte < 0x80 {
            return Ok((value, i + 1));
        }
    }
    if buf.len() >= MAX_VARINT_LEN {
        Err(DecodeError::VarintOverflow)
    } else {
        Err(DecodeError::UnexpectedEof {
            expected: 1,
            remaining: 0,
        })
    }
}

/// Reads a varint byte-by-byte from a stream.
pub fn read_varint_from(reader: &mut impl io::Read) -> Result<u64, DecodeError> {
    let mut value = 0u64;
    for i in 0..MAX_VARINT_LEN {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte)?;
        value |= u64::from(byte[0] & 0x7f) << (7 * i);
        if byte[0] < 0x80 {
            return Ok(value);
        }
    }
    Err(DecodeError::VarintOverflow)
}

/// Appends the key for `field` with the given wire type.
pub fn encode_key(field: u32, wire_type: WireType, buf: &mut Vec<u8>) {
    encode_varint(u64::from(field) << 3 | wire_type as u64, buf);
}

/// Number of bytes the key for `field` occupies.
pub fn key_len(field: u32) -> usize {
    varint_len(u64::from(field) << 3)
}

/// Appends a string field, omitting it entirely when empty.
pub fn encode_string_field(field: u32, value: &str, buf: &mut Vec<u8>) {
    if value.is_empty() {
        return;
    }
    encode_key(field, WireType::LengthDelimited, buf);
    encode_varint(value.len() as u64, buf);
    buf.extend_from_slice(value.as_bytes());
}

/// Encoded size of a string field, zero when empty.
pub fn string_field_len(field: u32, value: &str) -> usize {
    if value.is_empty() {
        return 0;
    }
    key_len(field) + varint_len(value.len() as u64) + value.len()
}

/// Appends an `int32` field, omitting it entirely when zero.
///
/// Negative values are sign-extended to 64 bits before varint encoding, per
/// the format.
pub fn encode_int32_field(field: u32, value: i32, buf: &mut Vec<u8>) {
    if value == 0 {
        return;
    }
    encode_key(field, WireType::Varint, buf);
    encode_varint(i64::from(value) as u64, buf);
}

/// Encoded size of an `int32` field, zero when zero.
pub fn int32_field_len(field: u32, value: i32) -> usize {
    if value == 0 {
        return 0;
    }
    key_len(field) + varint_len(i64::from(value) as u64)
}

/// Cursor over an encoded message body.
#[derive(Debug)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    /// Creates a reader over `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Whether the whole buffer has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Reads the next field key.
    pub fn read_key(&mut self) -> Result<(u32, WireType), DecodeError> {
        let key = self.read_varint()?;
        let wire_type = WireType::from_value((key & 0x7) as u8)?;
        let field = key >> 3;
        if field == 0 || field > u64::from(u32::MAX) {
            return Err(DecodeError::InvalidFieldNumber { value: field });
        }
        Ok((field as u32, wire_type))
    }

    /// Reads a raw varint.
    pub fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let (value, consumed) = decode_varint(&self.buf[self.pos..])?;
        self.pos += consumed;
        Ok(value)
    }

    /// Reads an `int32` value, checking the wire type first.
    pub fn read_int32(&mut self, field: u32, wire_type: WireType) -> Result<i32, DecodeError> {
        self.expect(field, WireType::Varint, wire_type)?;
        Ok(self.read_varint()? as i32)
    }

    /// Reads a string value, checking the wire type first.
    pub fn read_string(&mut self, field: u32, wire_type: WireType) -> Result<String, DecodeError> {
        self.expect(field, WireType::LengthDelimited, wire_type)?;
        let length = self.read_varint()?;
        let length = usize::try_from(length).map_err(|_| DecodeError::LengthOverflow { length })?;
        let bytes = self.read_bytes(length)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8 { field })
    }

    /// Skips over a field of the given wire type.
    pub fn skip(&mut self, wire_type: WireType) -> Result<(), DecodeError> {
        match wire_type {
            WireType::Varint => {
                self.read_varint()?;
            }
            WireType::Fixed64 => {
                self.read_bytes(8)?;
            }
            WireType::LengthDelimited => {
                let length = self.read_varint()?;
                let length =
                    usize::try_from(length).map_err(|_| DecodeError::LengthOverflow { length })?;
                self.read_bytes(length)?;
            }
            WireType::Fixed32 => {
                self.read_bytes(4)?;
            }
        }
        Ok(())
    }

    fn read_bytes(&mut self, length: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.buf.len() - self.pos;
        if length > remaining {
            return Err(DecodeError::UnexpectedEof {
                expected: length - remaining,
                remaining,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + length];
        self.pos += length;
        Ok(bytes)
    }

    fn expect(
        &self,
        field: u32,
        expected: WireType,
        actual: WireType,
    ) -> Result<(), DecodeError> {
        if expected == actual {
            Ok(())
        } else {
            Err(DecodeError::WireTypeMismatch {
                field,
                expected,
                actual,
            })
        }
    }
}
