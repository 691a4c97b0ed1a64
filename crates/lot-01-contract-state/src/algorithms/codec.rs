//! # Binary Codec
//!
//! Little-endian, length-prefixed primitives used by every stored field.
//!
//! Readers are pure functions `(buffer, offset) -> (value, next_offset)` and
//! never mutate the buffer, so calls compose by threading the returned
//! offset. Writers append to a `Vec<u8>` in the same layout.
//!
//! | Field | Layout |
//! |-------|--------|
//! | `u32` / `u64` / `f32` | fixed-width little-endian |
//! | text | `u32` length, then that many UTF-8 bytes |
//! | bytes | `u32` length, then that many raw bytes |

use crate::domain::StateDecodeError;

/// Borrow `len` bytes at `offset`, or fail with `Truncated`.
fn take(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], StateDecodeError> {
    let available = buf.len().saturating_sub(offset);
    match offset.checked_add(len) {
        Some(end) if end <= buf.len() => Ok(&buf[offset..end]),
        _ => Err(StateDecodeError::Truncated {
            offset,
            needed: len,
            available,
        }),
    }
}

fn take_array<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N], StateDecodeError> {
    let mut out = [0u8; N];
    out.copy_from_slice(take(buf, offset, N)?);
    Ok(out)
}

/// Read a little-endian `u32`.
pub fn read_u32_le(buf: &[u8], offset: usize) -> Result<(u32, usize), StateDecodeError> {
    Ok((u32::from_le_bytes(take_array(buf, offset)?), offset + 4))
}

/// Read a little-endian `u64`.
pub fn read_u64_le(buf: &[u8], offset: usize) -> Result<(u64, usize), StateDecodeError> {
    Ok((u64::from_le_bytes(take_array(buf, offset)?), offset + 8))
}

/// Read a little-endian IEEE-754 `f32`.
pub fn read_f32_le(buf: &[u8], offset: usize) -> Result<(f32, usize), StateDecodeError> {
    Ok((f32::from_le_bytes(take_array(buf, offset)?), offset + 4))
}

/// Read a length-prefixed byte blob without interpreting it.
pub fn read_bytes(buf: &[u8], offset: usize) -> Result<(Vec<u8>, usize), StateDecodeError> {
    let (len, start) = read_u32_le(buf, offset)?;
    let len = len as usize;
    let bytes = take(buf, start, len)?;
    Ok((bytes.to_vec(), start + len))
}

/// Read length-prefixed UTF-8 text. A zero length yields an empty string.
pub fn read_text(buf: &[u8], offset: usize) -> Result<(String, usize), StateDecodeError> {
    let (len, start) = read_u32_le(buf, offset)?;
    let len = len as usize;
    let bytes = take(buf, start, len)?;
    let text = std::str::from_utf8(bytes)
        .map_err(|_| StateDecodeError::InvalidText { offset: start })?;
    Ok((text.to_string(), start + len))
}

/// Append a little-endian `u32`.
pub fn write_u32_le(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Append a little-endian `u64`.
pub fn write_u64_le(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Append a little-endian `f32`.
pub fn write_f32_le(out: &mut Vec<u8>, value: f32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Append a length-prefixed byte blob.
///
/// Blobs longer than `u32::MAX` cannot be represented; callers only encode
/// fixtures and keys, which are far below that.
pub fn write_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_u32_le(out, bytes.len() as u32);
    out.extend_from_slice(bytes);
}

/// Append length-prefixed UTF-8 text.
pub fn write_text(out: &mut Vec<u8>, text: &str) {
    write_bytes(out, text.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u32_le() {
        let buf = [0x01, 0x02, 0x03, 0x04, 0xff];
        assert_eq!(read_u32_le(&buf, 0).unwrap(), (0x0403_0201, 4));
    }

    #[test]
    fn test_read_u32_le_truncated() {
        let buf = [0x01, 0x02, 0x03];
        assert_eq!(
            read_u32_le(&buf, 0),
            Err(StateDecodeError::Truncated {
                offset: 0,
                needed: 4,
                available: 3
            })
        );
    }

    #[test]
    fn test_read_u64_le_at_offset() {
        let mut buf = vec![0xaa];
        write_u64_le(&mut buf, u64::MAX - 1);
        assert_eq!(read_u64_le(&buf, 1).unwrap(), (u64::MAX - 1, 9));
    }

    #[test]
    fn test_read_f32_le() {
        let buf = [0x00, 0x00, 0x80, 0x3f];
        assert_eq!(read_f32_le(&buf, 0).unwrap(), (1.0, 4));
    }

    #[test]
    fn test_offset_past_end_is_truncated() {
        let buf = [0u8; 2];
        assert!(matches!(
            read_u32_le(&buf, 10),
            Err(StateDecodeError::Truncated { available: 0, .. })
        ));
    }

    #[test]
    fn test_read_text_empty() {
        let buf = [0, 0, 0, 0];
        assert_eq!(read_text(&buf, 0).unwrap(), (String::new(), 4));
    }

    #[test]
    fn test_read_text_length_overruns_buffer() {
        let mut buf = Vec::new();
        write_u32_le(&mut buf, 10);
        buf.extend_from_slice(b"abc");
        assert_eq!(
            read_text(&buf, 0),
            Err(StateDecodeError::Truncated {
                offset: 4,
                needed: 10,
                available: 3
            })
        );
    }

    #[test]
    fn test_read_text_invalid_utf8() {
        let mut buf = Vec::new();
        write_bytes(&mut buf, &[0xff, 0xfe]);
        assert_eq!(
            read_text(&buf, 0),
            Err(StateDecodeError::InvalidText { offset: 4 })
        );
    }

    #[test]
    fn test_read_bytes_does_not_validate_utf8() {
        let mut buf = Vec::new();
        write_bytes(&mut buf, &[0xff, 0x00]);
        assert_eq!(read_bytes(&buf, 0).unwrap(), (vec![0xff, 0x00], 6));
    }

    #[test]
    fn test_sequential_reads_compose() {
        let mut buf = Vec::new();
        write_text(&mut buf, "deposit");
        write_u64_le(&mut buf, 42);
        write_f32_le(&mut buf, -0.5);

        let (text, next) = read_text(&buf, 0).unwrap();
        let (number, next) = read_u64_le(&buf, next).unwrap();
        let (weight, next) = read_f32_le(&buf, next).unwrap();

        assert_eq!(text, "deposit");
        assert_eq!(number, 42);
        assert_eq!(weight, -0.5);
        assert_eq!(next, buf.len());
    }

    #[test]
    fn test_huge_length_prefix_does_not_overflow() {
        let mut buf = Vec::new();
        write_u32_le(&mut buf, u32::MAX);
        assert!(matches!(
            read_bytes(&buf, 0),
            Err(StateDecodeError::Truncated { .. })
        ));
    }
}
