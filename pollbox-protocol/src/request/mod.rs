mod create_request;
mod get_response;

pub use create_request::CreateRequestMessage;
pub use get_response::GetResponseMessage;
