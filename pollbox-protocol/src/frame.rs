/*
[ version: u8 ]
[ frame_type: u8 ]
[ stream_id: u32 ]
[ payload_len: u32 ]
[ checksum : u32 ]   xxh32 of the payload, seed 0
[ payload bytes... ]
*/

use bytes::{Buf, BufMut, BytesMut};
use xxhash_rust::xxh32::xxh32;
use crate::ProtocolError;

pub const PROTOCOL_VERSION: u8 = 1;
const HEADER_LEN: usize = 14;
/// Larger payloads are refused before any of them is buffered.
pub const MAX_PAYLOAD_LEN: usize = 16 * 1024 * 1024;

#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameType {
    Request = 1,
    Response = 2,
    Error = 3,
}

impl TryFrom<u8> for FrameType {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, ProtocolError> {
        match value {
            1 => Ok(FrameType::Request),
            2 => Ok(FrameType::Response),
            3 => Ok(FrameType::Error),
            _ => Err(ProtocolError::UnknownFrameType(value)),
        }
    }
}

#[derive(Debug)]
pub struct Frame {
    pub version: u8,
    pub frame_type: FrameType,
    /// Per-connection sequence number echoed back on the reply. Unrelated to
    /// the broker's request keys.
    pub stream_id: u32,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn request(stream_id: u32, payload: Vec<u8>) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            frame_type: FrameType::Request,
            stream_id,
            payload,
        }
    }

    pub fn response(stream_id: u32, payload: Vec<u8>) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            frame_type: FrameType::Response,
            stream_id,
            payload,
        }
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.reserve(HEADER_LEN + self.payload.len());
        buf.put_u8(self.version);
        buf.put_u8(self.frame_type as u8);
        buf.put_u32(self.stream_id);
        buf.put_u32(self.payload.len() as u32);
        buf.put_u32(xxh32(&self.payload, 0));
        buf.extend_from_slice(&self.payload);
    }

    /// Returns `Ok(None)` until a whole frame is buffered; nothing is consumed
    /// from `buf` in that case.
    pub fn decode(buf: &mut BytesMut) -> Result<Option<Frame>, ProtocolError> {
        if buf.len() < HEADER_LEN {
            return Ok(None);
        }

        let mut cursor = &buf[..];

        let version = cursor.get_u8();
        let frame_type_raw = cursor.get_u8();
        let stream_id = cursor.get_u32();
        let payload_len = cursor.get_u32() as usize;
        let checksum_expected = cursor.get_u32();

        if payload_len > MAX_PAYLOAD_LEN {
            return Err(ProtocolError::FrameTooLarge {
                len: payload_len,
                max: MAX_PAYLOAD_LEN,
            });
        }

        if cursor.remaining() < payload_len {
            return Ok(None);
        }

        buf.advance(HEADER_LEN);
        let payload = buf.split_to(payload_len).to_vec();
        let checksum_actual = xxh32(&payload, 0);

        if checksum_actual != checksum_expected {
            return Err(ProtocolError::ChecksumMismatch {
                expected: checksum_expected,
                found: checksum_actual,
            });
        }

        Ok(Some(Frame {
            version,
            frame_type: FrameType::try_from(frame_type_raw)?,
            stream_id,
            payload,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_frame_waits_for_more_bytes() {
        let frame = Frame::request(7, b"payload".to_vec());
        let mut full = BytesMut::new();
        frame.encode(&mut full);

        let mut partial = BytesMut::from(&full[..full.len() - 3]);
        assert!(Frame::decode(&mut partial).unwrap().is_none());
        assert_eq!(partial.len(), full.len() - 3, "partial input must not be consumed");
    }

    #[test]
    fn two_frames_in_one_buffer_decode_in_order() {
        let mut buf = BytesMut::new();
        Frame::request(1, b"first".to_vec()).encode(&mut buf);
        Frame::request(2, b"second".to_vec()).encode(&mut buf);

        let a = Frame::decode(&mut buf).unwrap().unwrap();
        let b = Frame::decode(&mut buf).unwrap().unwrap();
        assert_eq!((a.stream_id, a.payload), (1, b"first".to_vec()));
        assert_eq!((b.stream_id, b.payload), (2, b"second".to_vec()));
        assert!(buf.is_empty());
    }

    #[test]
    fn corrupted_payload_fails_checksum() {
        let mut buf = BytesMut::new();
        Frame::response(3, b"abc".to_vec()).encode(&mut buf);
        let last = buf.len() - 1;
        buf[last] ^= 0xff;

        assert!(matches!(
            Frame::decode(&mut buf),
            Err(ProtocolError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn unknown_frame_type_is_rejected() {
        let mut buf = BytesMut::new();
        Frame::request(1, Vec::new()).encode(&mut buf);
        buf[1] = 9;

        assert!(matches!(
            Frame::decode(&mut buf),
            Err(ProtocolError::UnknownFrameType(9))
        ));
    }

    #[test]
    fn oversized_length_is_rejected_from_the_header_alone() {
        let mut buf = BytesMut::new();
        Frame::request(1, Vec::new()).encode(&mut buf);
        buf[6..10].copy_from_slice(&u32::MAX.to_be_bytes());

        assert!(matches!(
            Frame::decode(&mut buf),
            Err(ProtocolError::FrameTooLarge { len, .. }) if len == u32::MAX as usize
        ));
    }
}
