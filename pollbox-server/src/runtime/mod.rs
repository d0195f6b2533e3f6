/*
Background behaviour that runs beside the listener.

Currently only the orphan report: pending requests nobody has answered are
surfaced in the log. Nothing here deletes records.
*/
use std::sync::Arc;
use tokio::sync::watch::Receiver;
use tokio::task::JoinHandle;
use crate::core::handler::FileMessageHandler;
use crate::BrokerConfig;

pub mod orphans;

pub fn run(
    handler: Arc<FileMessageHandler>,
    config: &BrokerConfig,
    shutdown_rx: Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(orphans::run_periodic_orphan_report(
        handler,
        shutdown_rx,
        config.orphan_scan_interval(),
        config.orphan_warn_after(),
    ))
}
