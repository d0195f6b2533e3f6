pub mod errors;
pub mod frame;
pub mod payload;
mod op_code;
mod request;
mod response;
mod utils;

pub use errors::{DeserializeError, ProtocolError};
pub use frame::{Frame, FrameType, MAX_PAYLOAD_LEN, PROTOCOL_VERSION};
pub use op_code::OpCode;
pub use payload::{RequestPayload, ResponsePayload};

pub use request::{CreateRequestMessage, GetResponseMessage};
pub use response::{
    RequestKeyReply, StatusReply, STATUS_BAD_REQUEST, STATUS_INTERNAL_ERROR, STATUS_NO_CONTENT,
    STATUS_OK,
};
