mod client;

pub use client::PollboxClient;
pub use pollbox_protocol::StatusReply;
