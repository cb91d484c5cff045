//! In-memory document collection.

use serde::{Deserialize, Serialize};

use super::model::{Document, DocumentId};

/// Divider placed between exported documents.
pub const EXPORT_DIVIDER: &str = "\n\n---\n\n";

/// What happens when the last document is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentPolicy {
    /// Create a fresh blank document instead of leaving the collection empty.
    pub recreate_blank_when_empty: bool,
}

/// Ordered documents with at most one active.
///
/// Insertion order is kept. The active id is always either `None` or the id
/// of a document in the collection.
#[derive(Debug, Clone, Default)]
pub struct DocumentCollection {
    documents: Vec<Document>,
    active_id: Option<DocumentId>,
    policy: DocumentPolicy,
}

impl DocumentCollection {
    pub fn new(policy: DocumentPolicy) -> Self {
        Self {
            documents: Vec::new(),
            active_id: None,
            policy,
        }
    }

    /// Rebuilds a collection from persisted documents; the first becomes active.
    pub fn from_documents(documents: Vec<Document>, policy: DocumentPolicy) -> Self {
        let active_id = documents.first().map(|doc| doc.id.clone());
        Self {
            documents,
            active_id,
            policy,
        }
    }

    /// Appends a document and makes it active.
    ///
    /// A missing or blank title becomes `Chapter <n>`, `n` being the
    /// collection length after insertion.
    pub fn add(&mut self, title: Option<&str>, content: Option<&str>) -> DocumentId {
        let title = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => title.to_string(),
            None => format!("Chapter {}", self.documents.len() + 1),
        };
        let document = Document::new(title, content.unwrap_or_default());
        let id = document.id.clone();
        self.documents.push(document);
        self.active_id = Some(id.clone());
        id
    }

    /// Returns `false` if no document has this id.
    pub fn rename(&mut self, id: &DocumentId, title: &str) -> bool {
        match self.get_mut(id) {
            Some(doc) => {
                doc.title = title.to_string();
                true
            }
            None => false,
        }
    }

    /// Returns `false` if no document has this id.
    pub fn set_content(&mut self, id: &DocumentId, content: &str) -> bool {
        match self.get_mut(id) {
            Some(doc) => {
                doc.content = content.to_string();
                true
            }
            None => false,
        }
    }

    /// Removes a document, reassigning the active id if it pointed there.
    pub fn delete(&mut self, id: &DocumentId) -> bool {
        let Some(position) = self.documents.iter().position(|doc| &doc.id == id) else {
            return false;
        };
        self.documents.remove(position);

        if self.active_id.as_ref() == Some(id) {
            self.active_id = self.documents.first().map(|doc| doc.id.clone());
        }
        if self.documents.is_empty() && self.policy.recreate_blank_when_empty {
            self.add(None, None);
        }
        true
    }

    /// Makes a document active. Returns `false` if no document has this id.
    pub fn select(&mut self, id: &DocumentId) -> bool {
        if self.get(id).is_some() {
            self.active_id = Some(id.clone());
            true
        } else {
            false
        }
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|doc| &doc.id == id)
    }

    fn get_mut(&mut self, id: &DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|doc| &doc.id == id)
    }

    /// Document at a 0-based position.
    pub fn at(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn active_id(&self) -> Option<&DocumentId> {
        self.active_id.as_ref()
    }

    pub fn active(&self) -> Option<&Document> {
        self.active_id.as_ref().and_then(|id| self.get(id))
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn export_one(&self, id: &DocumentId) -> Option<String> {
        self.get(id).map(Document::export)
    }

    /// All documents, in order, separated by a visible divider.
    pub fn export_all(&self) -> String {
        self.documents
            .iter()
            .map(Document::export)
            .collect::<Vec<_>>()
            .join(EXPORT_DIVIDER)
    }
}
