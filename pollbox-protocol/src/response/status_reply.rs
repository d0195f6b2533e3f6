/*
[ status_code : u16 ]
[ has_body    : u8  ]   0 or 1
[ body_len    : u32 ]   only when has_body == 1
[ body bytes  : [u8] ]
*/
use bytes::{Buf, BufMut, Bytes, BytesMut};
use crate::errors::{DeserializeError, ProtocolError};
use crate::utils::{put_string, read_string};

pub const STATUS_OK: u16 = 200;
pub const STATUS_NO_CONTENT: u16 = 204;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// HTTP-style outcome of a poll: a status code with an optional body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReply {
    pub status_code: u16,
    pub body: Option<String>,
}

impl StatusReply {
    pub fn status_only(status_code: u16) -> Self {
        Self { status_code, body: None }
    }

    pub fn with_body(status_code: u16, body: impl Into<String>) -> Self {
        Self { status_code, body: Some(body.into()) }
    }

    /// True for the bodiless 204 that means "nothing there yet".
    pub fn is_pending(&self) -> bool {
        self.status_code == STATUS_NO_CONTENT && self.body.is_none()
    }

    pub fn serialize(&self) -> Bytes {
        let body_len = self.body.as_ref().map_or(0, |b| 4 + b.len());
        let mut buf = BytesMut::with_capacity(3 + body_len);
        buf.put_u16(self.status_code);
        match &self.body {
            Some(body) => {
                buf.put_u8(1);
                put_string(&mut buf, body);
            }
            None => buf.put_u8(0),
        }
        buf.freeze()
    }

    pub fn deserialize(mut buf: Bytes) -> Result<Self, ProtocolError> {
        if buf.remaining() < 3 {
            return Err(ProtocolError::PayloadError("Incomplete status reply payload".into()));
        }
        let status_code = buf.get_u16();
        let body = match buf.get_u8() {
            0 => None,
            1 => Some(read_string(&mut buf, "body")?),
            other => {
                return Err(DeserializeError::InvalidFormat(format!(
                    "body flag must be 0 or 1, got {}",
                    other
                ))
                .into())
            }
        };
        Ok(StatusReply { status_code, body })
    }
}
