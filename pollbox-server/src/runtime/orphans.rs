use std::sync::Arc;
use std::time::{Duration, SystemTime};
use chrono::{DateTime, Utc};
use tokio::sync::watch::Receiver;
use crate::core::handler::FileMessageHandler;
use crate::core::storage::PendingRequest;

/// Pending requests that have waited longer than the warn threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanSummary {
    pub count: usize,
    pub oldest_key: String,
    pub oldest_age: Duration,
    pub oldest_since: SystemTime,
}

pub fn summarize(
    pending: &[PendingRequest],
    warn_after: Duration,
    now: SystemTime,
) -> Option<OrphanSummary> {
    let orphans: Vec<&PendingRequest> = pending
        .iter()
        .filter(|p| age(p, now) >= warn_after)
        .collect();
    let oldest = orphans.iter().copied().min_by_key(|p| p.modified)?;

    Some(OrphanSummary {
        count: orphans.len(),
        oldest_key: oldest.key.clone(),
        oldest_age: age(oldest, now),
        oldest_since: oldest.modified,
    })
}

// Clock skew can put `modified` in the future; that counts as age zero.
fn age(pending: &PendingRequest, now: SystemTime) -> Duration {
    now.duration_since(pending.modified).unwrap_or_default()
}

pub async fn run_periodic_orphan_report(
    handler: Arc<FileMessageHandler>,
    mut shutdown_rx: Receiver<()>,
    interval: Duration,
    warn_after: Duration,
) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => report_once(&handler, warn_after).await,

            _ = shutdown_rx.changed() => {
                tracing::info!("Shutdown signal received. Orphan report stopping.");
                break;
            }
        }
    }
}

async fn report_once(handler: &Arc<FileMessageHandler>, warn_after: Duration) {
    let handler = Arc::clone(handler);
    let scanned = tokio::task::spawn_blocking(move || handler.pending_requests()).await;

    let pending = match scanned {
        Ok(Ok(pending)) => pending,
        Ok(Err(e)) => {
            tracing::error!("Orphan scan failed: {:?}", e);
            return;
        }
        Err(e) => {
            tracing::error!("Orphan scan task failed: {:?}", e);
            return;
        }
    };

    match summarize(&pending, warn_after, SystemTime::now()) {
        Some(summary) => tracing::warn!(
            count = summary.count,
            oldest_key = %summary.oldest_key,
            oldest_since = %DateTime::<Utc>::from(summary.oldest_since).to_rfc3339(),
            oldest_age_secs = summary.oldest_age.as_secs(),
            "pending requests without a response; they are kept until answered"
        ),
        None => tracing::debug!(pending = pending.len(), "Orphan scan completed."),
    }
}
