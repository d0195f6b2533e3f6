use std::sync::{Arc, OnceLock};
use tracing::warn;
use crate::core::error::BrokerError;
use crate::core::handler::{HandlerOutcome, MessageHandler};
use crate::core::key::{RequestIdentity, RequestKey};

pub const STATUS_NO_CONTENT: i32 = 204;
pub const STATUS_INTERNAL_SERVER_ERROR: i32 = 500;

/// What a transport adapter should send back for a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerReply {
    /// The backend answered with a non-blank body.
    Content { status_code: i32, body: String },
    /// Status only. Covers "not ready yet" (204), malformed records (500) and
    /// answers whose body is empty or blank.
    Status { status_code: i32 },
}

impl BrokerReply {
    pub fn status_code(&self) -> i32 {
        match self {
            BrokerReply::Content { status_code, .. } | BrokerReply::Status { status_code } => {
                *status_code
            }
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            BrokerReply::Content { body, .. } => Some(body),
            BrokerReply::Status { .. } => None,
        }
    }
}

/// Entry point for transport adapters. Wraps one [`MessageHandler`].
pub struct MessageBroker {
    handler: Arc<dyn MessageHandler>,
}

impl MessageBroker {
    pub fn new(handler: Arc<dyn MessageHandler>) -> Self {
        Self { handler }
    }

    pub fn create_request(&self, identity: &RequestIdentity) -> Result<RequestKey, BrokerError> {
        self.handler.create_request(identity)
    }

    pub fn get_response(&self, key: &RequestKey) -> Result<BrokerReply, BrokerError> {
        let reply = match self.handler.get_response(key)? {
            HandlerOutcome::NotFound => BrokerReply::Status {
                status_code: STATUS_NO_CONTENT,
            },
            HandlerOutcome::Malformed => BrokerReply::Status {
                status_code: STATUS_INTERNAL_SERVER_ERROR,
            },
            HandlerOutcome::Answered(record) if !record.body.trim().is_empty() => {
                BrokerReply::Content {
                    status_code: record.status_code,
                    body: record.body,
                }
            }
            HandlerOutcome::Answered(record) => BrokerReply::Status {
                status_code: record.status_code,
            },
        };
        Ok(reply)
    }
}

static GLOBAL_BROKER: OnceLock<MessageBroker> = OnceLock::new();

/// Process-wide broker for adapters that cannot carry their own state.
///
/// The first call installs `handler`. Later calls return the installed broker
/// and log that their handler was discarded.
pub fn install_global(handler: Arc<dyn MessageHandler>) -> &'static MessageBroker {
    let (broker, installed_now) = install(handler);
    if !installed_now {
        warn!("global broker already installed; ignoring the message handler passed in");
    }
    broker
}

/// Like [`install_global`] but fails instead of discarding the handler.
pub fn try_install_global(
    handler: Arc<dyn MessageHandler>,
) -> Result<&'static MessageBroker, BrokerError> {
    match install(handler) {
        (broker, true) => Ok(broker),
        (_, false) => Err(BrokerError::AlreadyInstalled),
    }
}

pub fn global() -> Option<&'static MessageBroker> {
    GLOBAL_BROKER.get()
}

fn install(handler: Arc<dyn MessageHandler>) -> (&'static MessageBroker, bool) {
    let mut installed_now = false;
    let broker = GLOBAL_BROKER.get_or_init(|| {
        installed_now = true;
        MessageBroker::new(handler)
    });
    (broker, installed_now)
}
