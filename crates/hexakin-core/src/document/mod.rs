//! Named documents ("chapters"): model, collection logic, persistence and counts.

mod collection;
mod model;
mod stats;
mod store;

pub use collection::{DocumentCollection, DocumentPolicy, EXPORT_DIVIDER};
pub use model::{Document, DocumentId};
pub use stats::{ChapterCount, DraftSummary, char_count, word_count};
pub use store::MultiDocumentStore;
