pub mod broker;
pub mod error;
pub mod handler;
pub mod key;
pub mod record;
pub mod storage;

pub use broker::{BrokerReply, MessageBroker};
pub use error::BrokerError;
pub use handler::{FileMessageHandler, HandlerOutcome, MessageHandler};
pub use key::{RequestIdentity, RequestKey};
pub use record::ResponseRecord;
