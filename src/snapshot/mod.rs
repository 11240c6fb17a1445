use crate::models::{ResultTable, Snapshot};
use crate::views;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;

/// Creates the store: the publishing half goes to the refresh task, the
/// reading half is handed (and cloned) to consumers.
pub fn channel() -> (SnapshotPublisher, SnapshotReader) {
    let (tx, rx) = watch::channel(Arc::new(Snapshot::empty()));
    (SnapshotPublisher { tx }, SnapshotReader { rx })
}

/// Write access to the store. Publishing swaps in a fully built snapshot in
/// one step, so readers see either the old table or the new one.
pub struct SnapshotPublisher {
    tx: watch::Sender<Arc<Snapshot>>,
}

impl SnapshotPublisher {
    /// Publishes `table` under the next version and returns that snapshot.
    /// Timestamps never go backwards even if the wall clock does.
    pub fn publish(&self, table: Arc<ResultTable>) -> Arc<Snapshot> {
        let previous = self.current();
        let now = Utc::now();
        let published_at = match previous.published_at {
            Some(prev) if prev > now => prev,
            _ => now,
        };

        let snapshot = Arc::new(Snapshot {
            table,
            version: previous.version + 1,
            published_at: Some(published_at),
        });
        self.tx.send_replace(Arc::clone(&snapshot));
        snapshot
    }

    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.tx.borrow())
    }

    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read-only view of the store for the presentation layer.
#[derive(Clone)]
pub struct SnapshotReader {
    rx: watch::Receiver<Arc<Snapshot>>,
}

impl SnapshotReader {
    /// The latest published snapshot. Never blocks on the refresh task.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.rx.borrow())
    }

    /// Sorted constituency names of the latest snapshot.
    pub fn available_constituencies(&self) -> Vec<String> {
        views::available_constituencies(&self.snapshot().table)
    }

    /// Waits until a snapshot newer than the last one seen by this reader is
    /// published. Errors once the refresh task has finished.
    pub async fn changed(&mut self) -> Result<Arc<Snapshot>, watch::error::RecvError> {
        self.rx.changed().await?;
        Ok(Arc::clone(&self.rx.borrow_and_update()))
    }
}
