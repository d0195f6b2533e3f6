use std::sync::Arc;
use anyhow::{Context, Result};
use clap::Parser;
use pollbox::core::broker::MessageBroker;
use pollbox::core::handler::FileMessageHandler;
use pollbox::server::params::Params;
use pollbox::{runtime, server, BrokerConfig, SharedBroker};
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let params = Params::parse();
    let config = params.apply_to(BrokerConfig::load_or_default(params.config.as_ref())?);
    config.validate()?;
    server::init_tracing(&config)?;

    // A missing storage directory is fatal: refuse to start.
    let handler = Arc::new(
        FileMessageHandler::open(&config.storage_dir)
            .with_context(|| format!("opening storage directory {:?}", config.storage_dir))?,
    );
    let broker: SharedBroker = Arc::new(MessageBroker::new(handler.clone()));

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let background = runtime::run(handler, &config, shutdown_rx.clone());

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, shutting down");
                let _ = shutdown_tx.send(());
            }
            Err(e) => {
                // Dropping the sender would stop the listener, keep it alive.
                error!("Failed to listen for shutdown signal: {:?}", e);
                std::future::pending::<()>().await;
            }
        }
    });

    server::start(&config, broker, shutdown_rx).await?;
    background.await.context("background tasks panicked")?;
    Ok(())
}
