//! Storage layer for configuration, secrets and key-value files.

mod config_storage;
mod json_file_store;
mod secret_storage;

pub use config_storage::{ConfigStorage, ConfigStorageError};
pub use json_file_store::{JsonFileStore, JsonStoreError};
pub use secret_storage::{SecretStorage, SecretStorageError};
