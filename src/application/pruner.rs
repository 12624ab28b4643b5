//! ProcessedMessagePruner - background retention for redelivery ids.
//!
//! Provider redeliveries happen within hours, so ids older than the
//! retention window are forgotten periodically.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::domain::foundation::Timestamp;
use crate::ports::{ProcessedMessageStore, StoreError};

#[derive(Debug, Clone)]
pub struct PrunerConfig {
    pub retention: Duration,
    pub interval: Duration,
}

impl Default for PrunerConfig {
    fn default() -> Self {
        Self {
            retention: Duration::from_secs(72 * 3600),
            interval: Duration::from_secs(3600),
        }
    }
}

impl PrunerConfig {
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

pub struct ProcessedMessagePruner {
    store: Arc<dyn ProcessedMessageStore>,
    config: PrunerConfig,
}

impl ProcessedMessagePruner {
    pub fn new(store: Arc<dyn ProcessedMessageStore>, config: PrunerConfig) -> Self {
        Self { store, config }
    }

    /// Runs until `shutdown` turns true. Failures are logged and retried
    /// on the next tick.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        return;
                    }
                }
                _ = interval.tick() => {
                    if let Err(e) = self.prune_once().await {
                        tracing::warn!("Pruning processed message ids failed: {}", e);
                    }
                }
            }
        }
    }

    /// Deletes ids older than the retention window.
    pub async fn prune_once(&self) -> Result<u64, StoreError> {
        const MAX_RETENTION_SECS: u64 = 10 * 365 * 24 * 3600;
        let retention = self.config.retention.as_secs().min(MAX_RETENTION_SECS) as i64;
        let cutoff = Timestamp::now().plus_secs(-retention);
        let removed = self.store.delete_before(cutoff).await?;
        if removed > 0 {
            tracing::debug!(removed, "pruned processed message ids");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryProcessedMessageStore;

    #[tokio::test]
    async fn prune_once_keeps_recent_ids() {
        let store = InMemoryProcessedMessageStore::new();
        store.mark_processed("wamid.1").await.unwrap();
        let pruner = ProcessedMessagePruner::new(Arc::new(store.clone()), PrunerConfig::default());

        assert_eq!(pruner.prune_once().await.unwrap(), 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn zero_retention_prunes_everything_older_than_now() {
        let store = InMemoryProcessedMessageStore::new();
        store.mark_processed("wamid.1").await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let pruner = ProcessedMessagePruner::new(
            Arc::new(store.clone()),
            PrunerConfig::default().with_retention(Duration::ZERO),
        );

        assert_eq!(pruner.prune_once().await.unwrap(), 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_signal() {
        let store = InMemoryProcessedMessageStore::new();
        let pruner = ProcessedMessagePruner::new(
            Arc::new(store),
            PrunerConfig::default().with_interval(Duration::from_millis(10)),
        );
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move { pruner.run(rx).await });
        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("pruner should stop")
            .unwrap();
    }
}
