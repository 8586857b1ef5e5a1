//! Background settings writer.
//!
//! The tick loop hands snapshots to a [`PersistenceSink`] and moves on; a
//! tokio task owns the [`JsonFileStore`] and performs the file I/O on the
//! blocking pool. When writes queue up faster than they complete only the
//! newest snapshot is written, since every snapshot is a full record.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::{JsonFileStore, SettingsSink, SettingsSnapshot};

/// Cloneable handle the engine submits snapshots through
#[derive(Debug, Clone)]
pub struct PersistenceSink {
    tx: UnboundedSender<SettingsSnapshot>,
}

impl SettingsSink for PersistenceSink {
    fn submit(&self, snapshot: SettingsSnapshot) {
        if self.tx.send(snapshot).is_err() {
            warn!("Persistence worker has stopped, settings change not saved");
        }
    }
}

/// Owner of the writer task
#[derive(Debug)]
pub struct PersistenceWorker {
    tx: UnboundedSender<SettingsSnapshot>,
    handle: JoinHandle<()>,
}

impl PersistenceWorker {
    /// Spawns the writer task on the current tokio runtime.
    pub fn spawn(store: JsonFileStore) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(write_loop(store, rx));
        Self { tx, handle }
    }

    #[must_use]
    pub fn sink(&self) -> PersistenceSink {
        PersistenceSink {
            tx: self.tx.clone(),
        }
    }

    /// Stops accepting snapshots and waits for pending writes.
    ///
    /// Sinks handed out earlier must be dropped first, otherwise the task
    /// keeps waiting for them.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.handle.await {
            error!("Persistence worker panicked: {}", e);
        }
    }
}

async fn write_loop(store: JsonFileStore, mut rx: UnboundedReceiver<SettingsSnapshot>) {
    while let Some(mut snapshot) = rx.recv().await {
        let mut skipped = 0usize;
        while let Ok(newer) = rx.try_recv() {
            snapshot = newer;
            skipped += 1;
        }
        if skipped > 0 {
            debug!("Coalesced {} queued settings write(s)", skipped);
        }

        let store = store.clone();
        let result = tokio::task::spawn_blocking(move || store.save(&snapshot)).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to save settings: {}", e),
            Err(e) => error!("Settings write task failed: {}", e),
        }
    }
    debug!("Persistence worker stopped");
}
