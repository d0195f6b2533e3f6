use bytes::{Bytes, BytesMut};
use crate::errors::ProtocolError;
use crate::utils::{put_string, read_string};

/// Registers a unit of work identified by an HTTP-style method and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequestMessage {
    pub method: String,
    pub path: String,
}

impl CreateRequestMessage {
    pub fn serialize(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(8 + self.method.len() + self.path.len());
        put_string(&mut buf, &self.method);
        put_string(&mut buf, &self.path);
        buf.freeze()
    }

    pub fn deserialize(mut buf: Bytes) -> Result<Self, ProtocolError> {
        let method = read_string(&mut buf, "method")?;
        let path = read_string(&mut buf, "path")?;
        Ok(CreateRequestMessage { method, path })
    }
}
