pub mod config;
pub mod diff;
pub mod document;
pub mod editing;
pub mod error;
pub mod history;
pub mod message;
pub mod session;
pub mod storage;
pub mod transform;

// Re-export common error type
pub use error::{HexakinError, Result};
