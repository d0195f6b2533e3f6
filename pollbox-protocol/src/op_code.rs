use crate::ProtocolError;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum OpCode {
    CreateRequest = 1,
    GetResponse = 2,
}

impl TryFrom<u8> for OpCode {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(OpCode::CreateRequest),
            2 => Ok(OpCode::GetResponse),
            _ => Err(ProtocolError::UnknownOpCode(value)),
        }
    }
}
