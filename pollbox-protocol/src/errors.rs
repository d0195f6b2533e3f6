use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Unknown opcode: {0}")]
    UnknownOpCode(u8),

    #[error("Unexpected opcode in reply: {0}")]
    UnexpectedOpCode(u8),

    #[error("Incomplete frame")]
    IncompleteFrame,

    #[error("Payload decode error: {0}")]
    PayloadError(String),

    #[error("Unknown frame type: {0}")]
    UnknownFrameType(u8),

    #[error("Frame payload of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },

    #[error("Checksum Mismatch expected: {expected} found: {found} ")]
    ChecksumMismatch { expected: u32, found: u32 },

    #[error("Server rejected the request with status {status_code}: {message}")]
    Rejected { status_code: u16, message: String },

    #[error("IoError :{0} ")]
    IoError(io::Error),

    #[error("Field decode error: {0}")]
    Deserialize(#[from] DeserializeError),
}

#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("Unexpected end of input")]
    UnexpectedEOF,

    #[error("Invalid UTF-8 in field `{0}`")]
    InvalidUtf8(&'static str),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}
