//! File-backed key-value store.
//!
//! Each key lives in its own `<key>.json` file. Writes go to a temporary
//! file that is fsynced and then renamed over the target, so a crash never
//! leaves a half-written record.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hexakin_core::HexakinError;
use hexakin_core::storage::KeyValueStore;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Errors that can occur during file store operations.
#[derive(Debug)]
pub enum JsonStoreError {
    /// File I/O error.
    IoError(std::io::Error),
    /// Key cannot be used as a file name.
    InvalidKey(String),
}

impl std::fmt::Display for JsonStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonStoreError::IoError(e) => write!(f, "I/O error: {}", e),
            JsonStoreError::InvalidKey(key) => write!(f, "Invalid store key: {:?}", key),
        }
    }
}

impl std::error::Error for JsonStoreError {}

impl From<std::io::Error> for JsonStoreError {
    fn from(e: std::io::Error) -> Self {
        JsonStoreError::IoError(e)
    }
}

impl From<JsonStoreError> for HexakinError {
    fn from(e: JsonStoreError) -> Self {
        match e {
            JsonStoreError::IoError(e) => HexakinError::data_access(e.to_string()),
            JsonStoreError::InvalidKey(key) => {
                HexakinError::validation(format!("Invalid store key: {key:?}"))
            }
        }
    }
}

/// Key-value store keeping one JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, key: &str) -> Result<PathBuf, JsonStoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(JsonStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    async fn read(&self, key: &str) -> Result<Option<String>, JsonStoreError> {
        let path = self.file_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), JsonStoreError> {
        let path = self.file_path(key)?;
        fs::create_dir_all(&self.dir).await?;

        // Unique per write so concurrent sets of one key never share a temp file.
        let tmp_path = self
            .dir
            .join(format!(".{key}.json.{}.tmp", uuid::Uuid::new_v4()));
        let result = Self::write_and_rename(&tmp_path, &path, value).await;
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path).await;
        }
        result
    }

    async fn write_and_rename(
        tmp_path: &Path,
        path: &Path,
        value: &str,
    ) -> Result<(), JsonStoreError> {
        let mut tmp_file = fs::File::create(tmp_path).await?;
        tmp_file.write_all(value.as_bytes()).await?;
        tmp_file.sync_all().await?;
        drop(tmp_file);

        fs::rename(tmp_path, path).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), JsonStoreError> {
        let path = self.file_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> hexakin_core::Result<Option<String>> {
        Ok(self.read(key).await?)
    }

    async fn set(&self, key: &str, value: String) -> hexakin_core::Result<()> {
        tracing::debug!("[JsonFileStore] Writing {} ({} bytes)", key, value.len());
        Ok(self.write(key, &value).await?)
    }

    async fn remove(&self, key: &str) -> hexakin_core::Result<()> {
        Ok(self.delete(key).await?)
    }
}
