//! Unified path management for hexakin files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/hexakin/           # Root (overridable with --data-dir)
//! ├── config.toml              # Application configuration
//! ├── secret.json              # API keys
//! ├── store/                   # Key-value files (JsonFileStore)
//! │   ├── hexakin_chapters.json
//! │   └── hexakin_versions.json
//! └── logs/                    # Application logs
//!     └── hexakin.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
    /// A directory could not be created.
    CreateDir(PathBuf, std::io::Error),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
            PathError::CreateDir(path, e) => {
                write!(f, "Cannot create directory {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for hexakin_core::HexakinError {
    fn from(e: PathError) -> Self {
        hexakin_core::HexakinError::io(e.to_string())
    }
}

/// Resolved locations of every hexakin file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexakinPaths {
    root: PathBuf,
}

impl HexakinPaths {
    /// Uses `root` when given, otherwise `~/.config/hexakin/`.
    pub fn resolve(root: Option<PathBuf>) -> Result<Self, PathError> {
        match root {
            Some(root) => Ok(Self::with_root(root)),
            None => Ok(Self::with_root(Self::default_root()?)),
        }
    }

    /// Creates paths under a custom root (for tests and `--data-dir`).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the default root: `~/.config/hexakin/`.
    pub fn default_root() -> Result<PathBuf, PathError> {
        dirs::home_dir()
            .map(|home| home.join(".config").join("hexakin"))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Path to `secret.json`.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600).
    pub fn secret_file(&self) -> PathBuf {
        self.root.join("secret.json")
    }

    pub fn store_dir(&self) -> PathBuf {
        self.root.join("store")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Creates the store and logs directories if missing.
    pub fn ensure_dirs(&self) -> Result<(), PathError> {
        for dir in [self.store_dir(), self.logs_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| PathError::CreateDir(dir.clone(), e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_under_custom_root() {
        let paths = HexakinPaths::with_root("/tmp/hexakin-test");
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/hexakin-test/config.toml"));
        assert_eq!(paths.secret_file(), PathBuf::from("/tmp/hexakin-test/secret.json"));
        assert_eq!(paths.store_dir(), PathBuf::from("/tmp/hexakin-test/store"));
        assert_eq!(paths.logs_dir(), PathBuf::from("/tmp/hexakin-test/logs"));
    }

    #[test]
    fn test_resolve_prefers_explicit_root() {
        let paths = HexakinPaths::resolve(Some(PathBuf::from("/srv/hexakin"))).unwrap();
        assert_eq!(paths.root(), Path::new("/srv/hexakin"));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HexakinPaths::with_root(temp_dir.path().join("nested"));
        paths.ensure_dirs().unwrap();
        assert!(paths.store_dir().is_dir());
        assert!(paths.logs_dir().is_dir());
    }
}
