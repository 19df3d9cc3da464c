//! Location of the wallet database on disk
//!
//! The database lives in a per-user data directory chosen by operating system:
//!
//! * **Linux / BSD**: `~/.<app_name>/`
//! * **macOS**: `~/Library/Application Support/<app_name>`
//! * **Windows**: `%LOCALAPPDATA%\<vendor>\<app_name>`
//!
//! A configured base directory replaces the platform location; the data
//! directory is then `<base_dir>/<app_name>`. The directory is created on
//! first use.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{WalletStoreError, WalletStoreResult};

pub const DEFAULT_APP_NAME: &str = "bitshares";
pub const DEFAULT_VENDOR: &str = "Fabian Shuch";
pub const DEFAULT_DATABASE_FILE: &str = "bitshares.sqlite";

/// Application identity used to resolve the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataDir {
    pub app_name: String,
    pub vendor: String,
    pub database_file: String,
    /// Overrides the per-user platform location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
}

impl Default for DataDir {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            vendor: DEFAULT_VENDOR.to_string(),
            database_file: DEFAULT_DATABASE_FILE.to_string(),
            base_dir: None,
        }
    }
}

impl DataDir {
    pub fn new(app_name: impl Into<String>, vendor: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            vendor: vendor.into(),
            ..Self::default()
        }
    }

    /// Use a different database file name inside the data directory
    pub fn with_database_file(mut self, database_file: impl Into<String>) -> Self {
        self.database_file = database_file.into();
        self
    }

    /// Keep the data directory under `base_dir` instead of the platform location
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Resolve the data directory without touching the filesystem
    pub fn resolve(&self) -> WalletStoreResult<PathBuf> {
        match &self.base_dir {
            Some(base) => Ok(base.join(&self.app_name)),
            None => platform_dir(&self.app_name, &self.vendor),
        }
    }

    /// Resolve the data directory, creating it if it does not exist yet
    pub fn directory(&self) -> WalletStoreResult<PathBuf> {
        let dir = self.resolve()?;
        if !dir.is_dir() {
            debug!(path = %dir.display(), "creating data directory");
            fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }

    /// Full path of the database file, creating the containing directory
    pub fn database_path(&self) -> WalletStoreResult<PathBuf> {
        Ok(self.directory()?.join(&self.database_file))
    }
}

#[cfg(any(
    target_os = "linux",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
))]
fn platform_dir(app_name: &str, _vendor: &str) -> WalletStoreResult<PathBuf> {
    let home = dirs_next::home_dir()
        .ok_or_else(|| WalletStoreError::DataDirectory("home directory not found".into()))?;
    Ok(home.join(format!(".{app_name}")))
}

#[cfg(target_os = "windows")]
fn platform_dir(app_name: &str, vendor: &str) -> WalletStoreResult<PathBuf> {
    let base = dirs_next::data_local_dir()
        .ok_or_else(|| WalletStoreError::DataDirectory("local app data not found".into()))?;
    Ok(base.join(vendor).join(app_name))
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly",
    target_os = "windows"
)))]
fn platform_dir(app_name: &str, _vendor: &str) -> WalletStoreResult<PathBuf> {
    // macOS: ~/Library/Application Support
    let base = dirs_next::data_dir()
        .ok_or_else(|| WalletStoreError::DataDirectory("data directory not found".into()))?;
    Ok(base.join(app_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_identity() {
        let dir = DataDir::default();
        assert_eq!(dir.app_name, "bitshares");
        assert_eq!(dir.database_file, "bitshares.sqlite");
    }

    #[test]
    fn test_resolve_is_stable() {
        let dir = DataDir::new("walletstoretest", "Vendor");
        let first = dir.resolve().unwrap();
        let second = dir.resolve().unwrap();
        assert_eq!(first, second);
        assert!(first.is_absolute());
        assert!(first.to_string_lossy().contains("walletstoretest"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_prefers_dotfile_directory() {
        let dir = DataDir::new("walletstoretest", "Vendor").resolve().unwrap();
        assert_eq!(dir.file_name().unwrap(), ".walletstoretest");
    }

    #[test]
    fn test_database_file_override() {
        let dir = DataDir::default().with_database_file("other.sqlite");
        let path = dir.resolve().unwrap().join(&dir.database_file);
        assert!(path.ends_with("other.sqlite"));
    }

    #[test]
    fn test_directory_is_created_under_base_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let data_dir = DataDir::new("walletstoretest", "Vendor").with_base_dir(temp_dir.path());
        let expected = temp_dir.path().join("walletstoretest");
        assert!(!expected.exists());

        let path = data_dir.database_path().unwrap();
        assert!(expected.is_dir());
        assert_eq!(path, expected.join(DEFAULT_DATABASE_FILE));
        assert!(path.ends_with(&data_dir.database_file));

        // existing directory is reused
        assert_eq!(data_dir.directory().unwrap(), expected);
    }

    #[test]
    fn test_directory_blocked_by_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(temp_dir.path().join("walletstoretest"), b"not a directory").unwrap();
        let data_dir = DataDir::new("walletstoretest", "Vendor").with_base_dir(temp_dir.path());

        assert!(matches!(data_dir.directory(), Err(WalletStoreError::Io(_))));
        assert!(matches!(data_dir.database_path(), Err(WalletStoreError::Io(_))));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let dir: DataDir = serde_json::from_str(r#"{"app_name": "custom"}"#).unwrap();
        assert_eq!(dir.app_name, "custom");
        assert_eq!(dir.vendor, DEFAULT_VENDOR);
        assert!(dir.base_dir.is_none());

        let dir: DataDir = serde_json::from_str(r#"{"base_dir": "/srv/wallet"}"#).unwrap();
        assert_eq!(dir.resolve().unwrap(), PathBuf::from("/srv/wallet/bitshares"));
    }
}
