pub mod core;
pub mod runtime;
pub mod server;
mod config;
mod types;

pub use config::BrokerConfig;
pub use types::SharedBroker;
