pub mod listener;
pub mod params;

use anyhow::Result;
use tokio::sync::watch::Receiver;
use tracing::info;
use crate::types::SharedBroker;
use crate::BrokerConfig;

pub fn init_tracing(config: &BrokerConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(config.log_level()?)
        .with_target(false)
        .with_thread_ids(true)
        .compact()
        .init();
    Ok(())
}

pub async fn start(config: &BrokerConfig, broker: SharedBroker, shutdown_rx: Receiver<()>) -> Result<()> {
    info!("Pollbox starting with config: {:?}", config);
    listener::start(config.port, broker, shutdown_rx).await
}
