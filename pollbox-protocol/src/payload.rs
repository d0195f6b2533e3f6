use bytes::{Buf, BufMut, Bytes, BytesMut};
use crate::errors::ProtocolError;
use crate::op_code::OpCode;

#[derive(Debug)]
pub struct RequestPayload {
    pub op_code: OpCode,
    pub data: Bytes,
}

impl RequestPayload {
    pub fn serialize(&self) -> Bytes {
        encode_with_op(self.op_code, &self.data)
    }

    pub fn deserialize(mut buf: Bytes) -> Result<Self, ProtocolError> {
        if buf.remaining() < 1 {
            return Err(ProtocolError::PayloadError("Empty request payload".into()));
        }

        let op_code = OpCode::try_from(buf.get_u8())?;
        Ok(RequestPayload { op_code, data: buf })
    }
}

#[derive(Debug)]
pub struct ResponsePayload {
    pub op_code: OpCode,
    pub data: Bytes,
}

impl ResponsePayload {
    pub fn serialize(&self) -> Bytes {
        encode_with_op(self.op_code, &self.data)
    }

    pub fn deserialize(mut buf: Bytes) -> Result<Self, ProtocolError> {
        if buf.remaining() < 1 {
            return Err(ProtocolError::PayloadError("Empty response payload".into()));
        }

        let op_code = OpCode::try_from(buf.get_u8())?;
        Ok(ResponsePayload { op_code, data: buf })
    }

    /// Fails with `UnexpectedOpCode` when the reply answers a different call.
    pub fn expect_op(self, op_code: OpCode) -> Result<Bytes, ProtocolError> {
        if self.op_code != op_code {
            return Err(ProtocolError::UnexpectedOpCode(self.op_code as u8));
        }
        Ok(self.data)
    }
}

fn encode_with_op(op_code: OpCode, data: &Bytes) -> Bytes {
    let mut buf = BytesMut::with_capacity(1 + data.len());
    buf.put_u8(op_code as u8);
    buf.extend_from_slice(data);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_op_code_is_rejected() {
        let err = RequestPayload::deserialize(Bytes::from_static(&[42, 1, 2])).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownOpCode(42)));
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(RequestPayload::deserialize(Bytes::new()).is_err());
        assert!(ResponsePayload::deserialize(Bytes::new()).is_err());
    }

    #[test]
    fn expect_op_rejects_mismatched_reply() {
        let reply = ResponsePayload {
            op_code: OpCode::GetResponse,
            data: Bytes::new(),
        };
        assert!(matches!(
            reply.expect_op(OpCode::CreateRequest),
            Err(ProtocolError::UnexpectedOpCode(2))
        ));
    }
}
