//! Bounded version history of completed edits.

mod model;
mod store;

pub use model::{VersionEntry, VersionHistory};
pub use store::VersionHistoryStore;
