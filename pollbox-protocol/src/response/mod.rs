mod request_key;
mod status_reply;

pub use request_key::RequestKeyReply;
pub use status_reply::{
    StatusReply, STATUS_BAD_REQUEST, STATUS_INTERNAL_ERROR, STATUS_NO_CONTENT, STATUS_OK,
};
