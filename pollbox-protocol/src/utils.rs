use bytes::{Buf, BufMut, Bytes, BytesMut};
use crate::errors::DeserializeError;

/// Writes `[len: u32][utf-8 bytes]`.
pub fn put_string(buf: &mut BytesMut, value: &str) {
    buf.put_u32(value.len() as u32);
    buf.extend_from_slice(value.as_bytes());
}

/// Reads a string written by [`put_string`]. `field` names the value in errors.
pub fn read_string(buf: &mut Bytes, field: &'static str) -> Result<String, DeserializeError> {
    if buf.remaining() < 4 {
        return Err(DeserializeError::UnexpectedEOF);
    }
    let len = buf.get_u32() as usize;
    if buf.remaining() < len {
        return Err(DeserializeError::UnexpectedEOF);
    }
    let raw = buf.split_to(len);
    String::from_utf8(raw.to_vec()).map_err(|_| DeserializeError::InvalidUtf8(field))
}
