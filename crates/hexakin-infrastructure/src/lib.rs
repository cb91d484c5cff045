pub mod importer;
pub mod logging;
pub mod paths;
pub mod storage;

pub use crate::paths::{HexakinPaths, PathError};
pub use crate::storage::{ConfigStorage, JsonFileStore, SecretStorage};
