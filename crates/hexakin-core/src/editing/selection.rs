//! Passive tracking of the writer's text selection.

use crate::document::DocumentId;

/// The most recent non-empty selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub text: String,
    /// Document the selection was made in, when the surface knows it.
    pub source_document_id: Option<DocumentId>,
}

/// Remembers the last non-empty selection made on an editable surface.
///
/// Selection-end events only update stored state; they never trigger
/// transforms. A collapsed selection (caret only) leaves the stored value in
/// place, so actions triggered by a click still see what the writer had
/// highlighted before the click.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    state: Option<SelectionState>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a selection-end event. Returns `true` if the stored selection changed.
    pub fn observe(&mut self, raw: &str, source_document_id: Option<DocumentId>) -> bool {
        let text = raw.trim();
        if text.is_empty() {
            return false;
        }
        let unchanged = self.state.as_ref().is_some_and(|state| {
            state.text == text && state.source_document_id == source_document_id
        });
        if unchanged {
            return false;
        }
        self.state = Some(SelectionState {
            text: text.to_string(),
            source_document_id,
        });
        true
    }

    /// Last captured selection, or the empty string.
    pub fn current_selection(&self) -> &str {
        self.state.as_ref().map_or("", |state| state.text.as_str())
    }

    pub fn state(&self) -> Option<&SelectionState> {
        self.state.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_none()
    }

    /// Hands the selection to an inject/send action and forgets it.
    pub fn take(&mut self) -> Option<SelectionState> {
        self.state.take()
    }

    pub fn clear(&mut self) {
        self.state = None;
    }
}
