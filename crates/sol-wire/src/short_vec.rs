//! Compact-u16 length prefixes.
//!
//! Array lengths on the wire are encoded 7 bits at a time, least-significant
//! group first, with the high bit of each byte flagging a continuation:
//!
//! - Values 0..0x7f       -> 1 byte
//! - Values 0x80..0x3fff  -> 2 bytes
//! - Values 0x4000..      -> 3 bytes (u16 caps at 0xffff)

use crate::buffer::WireBuffer;
use crate::error::SolError;

/// Longest encoding of a `u16`.
pub const MAX_ENCODING_LENGTH: usize = 3;

/// Encode a `u16` value in compact-u16 format.
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(MAX_ENCODING_LENGTH);

    while val >= 0x80 {
        out.push((val & 0x7f) as u8 | 0x80);
        val >>= 7;
    }
    out.push(val as u8);

    out
}

pub fn write_compact_u16(buf: &mut WireBuffer, value: u16) {
    buf.write_bytes(&encode_compact_u16(value));
}

/// Write a collection length, failing if it cannot be represented.
pub fn write_len(buf: &mut WireBuffer, len: usize) -> Result<(), SolError> {
    let value = u16::try_from(len)
        .map_err(|_| SolError::InvalidValue(format!("length {len} exceeds compact-u16 range")))?;
    write_compact_u16(buf, value);
    Ok(())
}

pub fn read_compact_u16(buf: &mut WireBuffer) -> Result<u16, SolError> {
    let mut value: u32 = 0;

    for position in 0..MAX_ENCODING_LENGTH {
        let byte = buf.read_int::<u8>()?;
        let group = (byte & 0x7f) as u32;

        // A zero group after the first byte means a shorter encoding exists.
        if position > 0 && byte == 0 {
            return Err(SolError::InvalidValue(
                "non-canonical compact-u16 encoding".into(),
            ));
        }

        value |= group << (7 * position);

        if byte & 0x80 == 0 {
            return u16::try_from(value)
                .map_err(|_| SolError::InvalidValue("compact-u16 value overflow".into()));
        }
    }

    Err(SolError::InvalidValue(
        "compact-u16 needs more than 3 bytes".into(),
    ))
}

/// Decode a compact-u16 from the front of a slice.
///
/// Returns `(value, bytes_consumed)`.
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), SolError> {
    let window = &data[..data.len().min(MAX_ENCODING_LENGTH)];
    let mut buf = WireBuffer::from_bytes(window);
    let value = read_compact_u16(&mut buf)?;
    Ok((value, window.len() - buf.remaining()))
}
