//! Persisted multi-document store.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::collection::{DocumentCollection, DocumentPolicy};
use super::model::{Document, DocumentId};
use super::stats::DraftSummary;
use crate::error::{HexakinError, Result};
use crate::storage::{CHAPTERS_KEY, KeyValueStore};

/// The writer's chapters, written through to a key-value store on every change.
#[derive(Clone)]
pub struct MultiDocumentStore {
    collection: Arc<Mutex<DocumentCollection>>,
    storage: Arc<dyn KeyValueStore>,
}

impl MultiDocumentStore {
    /// Loads persisted documents; a corrupted record is cleared and ignored.
    pub async fn load(storage: Arc<dyn KeyValueStore>, policy: DocumentPolicy) -> Self {
        let documents = match storage.get(CHAPTERS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Document>>(&raw) {
                Ok(documents) => documents,
                Err(e) => {
                    tracing::warn!("[DocumentStore] Discarding corrupted chapters: {}", e);
                    if let Err(e) = storage.remove(CHAPTERS_KEY).await {
                        tracing::warn!("[DocumentStore] Failed to clear corrupted chapters: {}", e);
                    }
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("[DocumentStore] Failed to read chapters: {}", e);
                Vec::new()
            }
        };
        tracing::debug!("[DocumentStore] Loaded {} chapters", documents.len());

        Self {
            collection: Arc::new(Mutex::new(DocumentCollection::from_documents(
                documents, policy,
            ))),
            storage,
        }
    }

    pub async fn add_document(
        &self,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<DocumentId> {
        let mut collection = self.collection.lock().await;
        let id = collection.add(title, content);
        self.write(collection.documents()).await?;
        Ok(id)
    }

    /// No-op (returning `false`) if the id is unknown.
    pub async fn rename(&self, id: &DocumentId, title: &str) -> Result<bool> {
        self.mutate(|c| c.rename(id, title)).await
    }

    /// No-op (returning `false`) if the id is unknown.
    pub async fn set_content(&self, id: &DocumentId, content: &str) -> Result<bool> {
        self.mutate(|c| c.set_content(id, content)).await
    }

    pub async fn delete(&self, id: &DocumentId) -> Result<bool> {
        self.mutate(|c| c.delete(id)).await
    }

    /// Selection is not persisted.
    pub async fn select(&self, id: &DocumentId) -> bool {
        self.collection.lock().await.select(id)
    }

    pub async fn get(&self, id: &DocumentId) -> Option<Document> {
        self.collection.lock().await.get(id).cloned()
    }

    /// Document at a 0-based position.
    pub async fn at(&self, index: usize) -> Option<Document> {
        self.collection.lock().await.at(index).cloned()
    }

    pub async fn active(&self) -> Option<Document> {
        self.collection.lock().await.active().cloned()
    }

    pub async fn active_id(&self) -> Option<DocumentId> {
        self.collection.lock().await.active_id().cloned()
    }

    pub async fn documents(&self) -> Vec<Document> {
        self.collection.lock().await.documents().to_vec()
    }

    pub async fn export_one(&self, id: &DocumentId) -> Result<String> {
        self.collection
            .lock()
            .await
            .export_one(id)
            .ok_or_else(|| HexakinError::not_found("Document", id.as_str()))
    }

    pub async fn export_all(&self) -> String {
        self.collection.lock().await.export_all()
    }

    pub async fn summary(&self) -> DraftSummary {
        DraftSummary::from_documents(self.collection.lock().await.documents())
    }

    /// Writes the full collection to the store.
    pub async fn persist(&self) -> Result<()> {
        let collection = self.collection.lock().await;
        self.write(collection.documents()).await
    }

    async fn mutate<F>(&self, f: F) -> Result<bool>
    where
        F: FnOnce(&mut DocumentCollection) -> bool,
    {
        let mut collection = self.collection.lock().await;
        if !f(&mut collection) {
            return Ok(false);
        }
        self.write(collection.documents()).await?;
        Ok(true)
    }

    /// Called with the collection lock held, so writes land in mutation order.
    async fn write(&self, documents: &[Document]) -> Result<()> {
        let raw = serde_json::to_string(documents)?;
        self.storage.set(CHAPTERS_KEY, raw).await
    }
}
