//! Persisted version history.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::model::{VersionEntry, VersionHistory};
use crate::error::Result;
use crate::storage::{KeyValueStore, VERSIONS_KEY};

/// Version history backed by a key-value store.
///
/// The in-memory list is the source of truth; every mutation is written
/// through to the store under [`VERSIONS_KEY`]. The store never touches
/// editing session state: `restore` only hands the snapshot back.
#[derive(Clone)]
pub struct VersionHistoryStore {
    history: Arc<Mutex<VersionHistory>>,
    storage: Arc<dyn KeyValueStore>,
}

impl VersionHistoryStore {
    /// Loads the persisted history.
    ///
    /// Never fails: a corrupted record is removed and the history starts
    /// empty, and an unreadable store also yields an empty history.
    pub async fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let history = match storage.get(VERSIONS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<VersionEntry>>(&raw) {
                Ok(entries) => {
                    tracing::debug!("[VersionHistory] Loaded {} versions", entries.len());
                    VersionHistory::from_entries(entries)
                }
                Err(e) => {
                    tracing::warn!("[VersionHistory] Discarding corrupted history: {}", e);
                    if let Err(e) = storage.remove(VERSIONS_KEY).await {
                        tracing::warn!("[VersionHistory] Failed to clear corrupted history: {}", e);
                    }
                    VersionHistory::new()
                }
            },
            Ok(None) => VersionHistory::new(),
            Err(e) => {
                tracing::warn!("[VersionHistory] Failed to read history: {}", e);
                VersionHistory::new()
            }
        };

        Self {
            history: Arc::new(Mutex::new(history)),
            storage,
        }
    }

    /// Prepends a version and writes the bounded list through.
    ///
    /// The lock is held across the write, so concurrent records reach the
    /// store in the same order they were applied in memory.
    pub async fn record(&self, entry: VersionEntry) -> Result<()> {
        let mut history = self.history.lock().await;
        history.record(entry);
        self.write(history.entries()).await
    }

    /// Newest-first copy of the history.
    pub async fn entries(&self) -> Vec<VersionEntry> {
        self.history.lock().await.entries().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.history.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.history.lock().await.is_empty()
    }

    /// Snapshot at `index` (0 is the newest) for the caller to apply.
    pub async fn restore(&self, index: usize) -> Option<VersionEntry> {
        self.history.lock().await.get(index).cloned()
    }

    /// Writes the current list to the store.
    pub async fn persist(&self) -> Result<()> {
        let history = self.history.lock().await;
        self.write(history.entries()).await
    }

    /// Empties the history and removes the persisted record.
    pub async fn clear(&self) -> Result<()> {
        let mut history = self.history.lock().await;
        history.clear();
        self.storage.remove(VERSIONS_KEY).await
    }

    async fn write(&self, entries: &[VersionEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        self.storage.set(VERSIONS_KEY, raw).await
    }
}
