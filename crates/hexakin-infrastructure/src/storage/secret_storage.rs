//! Secret configuration file storage.
//!
//! Provides loading of secret configuration from ~/.config/hexakin/secret.json.

use std::fs;
use std::path::PathBuf;

use hexakin_core::config::SecretConfig;

use crate::paths::HexakinPaths;

/// Errors that can occur during secret storage operations.
#[derive(Debug)]
pub enum SecretStorageError {
    /// Configuration file not found.
    NotFound(PathBuf),
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
}

impl std::fmt::Display for SecretStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretStorageError::NotFound(path) => {
                write!(f, "Secret file not found at: {}", path.display())
            }
            SecretStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            SecretStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
        }
    }
}

impl std::error::Error for SecretStorageError {}

impl From<std::io::Error> for SecretStorageError {
    fn from(e: std::io::Error) -> Self {
        SecretStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for SecretStorageError {
    fn from(e: serde_json::Error) -> Self {
        SecretStorageError::ParseError(e)
    }
}

/// Read-only storage for `secret.json`.
///
/// The file holds plaintext API keys and should have restrictive
/// permissions (e.g., 600). Its contents are never logged.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    pub fn new(paths: &HexakinPaths) -> Self {
        Self {
            path: paths.secret_file(),
        }
    }

    /// Creates a new SecretStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads and parses the secret file.
    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Err(SecretStorageError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing or unreadable file yields `None`.
    pub fn load_optional(&self) -> Option<SecretConfig> {
        match self.load() {
            Ok(config) => Some(config),
            Err(SecretStorageError::NotFound(_)) => None,
            Err(e) => {
                tracing::warn!("[SecretStorage] Ignoring unreadable secret file: {}", e);
                None
            }
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
