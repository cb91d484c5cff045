//! Version history domain model.

use serde::{Deserialize, Serialize};

use crate::editing::{EditingParameters, EditorType, Purpose, Style};

/// One completed edit: the text sent, the text received, and the parameters used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub input: String,
    pub output: String,
    pub purpose: Purpose,
    pub style: Style,
    pub editor_type: EditorType,
}

impl VersionEntry {
    pub fn new(
        input: impl Into<String>,
        output: impl Into<String>,
        parameters: EditingParameters,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            purpose: parameters.purpose,
            style: parameters.style,
            editor_type: parameters.editor_type,
        }
    }

    pub fn parameters(&self) -> EditingParameters {
        EditingParameters::new(self.purpose, self.style, self.editor_type)
    }
}

/// Bounded, newest-first list of versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionHistory {
    entries: Vec<VersionEntry>,
    capacity: usize,
}

impl VersionHistory {
    /// Number of versions kept.
    pub const CAPACITY: usize = 5;

    pub fn new() -> Self {
        Self::with_capacity(Self::CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuilds a history from persisted entries, keeping the newest ones.
    pub fn from_entries(mut entries: Vec<VersionEntry>) -> Self {
        entries.truncate(Self::CAPACITY);
        Self {
            entries,
            capacity: Self::CAPACITY,
        }
    }

    /// Prepends an entry, evicting the oldest beyond capacity.
    pub fn record(&mut self, entry: VersionEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> &[VersionEntry] {
        &self.entries
    }

    /// Entry at `index` (0 is the newest).
    pub fn get(&self, index: usize) -> Option<&VersionEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for VersionHistory {
    fn default() -> Self {
        Self::new()
    }
}
