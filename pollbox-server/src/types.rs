use std::sync::Arc;
use crate::core::broker::MessageBroker;

pub type SharedBroker = Arc<MessageBroker>;
