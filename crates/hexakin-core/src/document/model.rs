//! Document domain model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named document ("chapter").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl Document {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: DocumentId::generate(),
            title: title.into(),
            content: content.into(),
        }
    }

    /// Renders the document as a markdown block: a title heading, then the content.
    pub fn export(&self) -> String {
        format!("# {}\n\n{}", self.title, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(DocumentId::generate(), DocumentId::generate());
    }

    #[test]
    fn test_id_is_a_plain_string_on_the_wire() {
        let doc = Document {
            id: DocumentId::from("1700000000000"),
            title: "Chapter 1".into(),
            content: "It begins.".into(),
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["id"], "1700000000000");
    }

    #[test]
    fn test_export_block() {
        let doc = Document::new("Prologue", "It begins.");
        assert_eq!(doc.export(), "# Prologue\n\nIt begins.");
    }
}
