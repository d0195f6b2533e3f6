use bytes::{Bytes, BytesMut};
use crate::errors::ProtocolError;
use crate::utils::{put_string, read_string};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestKeyReply {
    pub key: String,
}

impl RequestKeyReply {
    pub fn serialize(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(4 + self.key.len());
        put_string(&mut buf, &self.key);
        buf.freeze()
    }

    pub fn deserialize(mut buf: Bytes) -> Result<Self, ProtocolError> {
        let key = read_string(&mut buf, "key")?;
        Ok(RequestKeyReply { key })
    }
}
