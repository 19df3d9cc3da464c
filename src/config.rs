//! Store configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data_dir::DataDir;
use crate::errors::WalletStoreResult;

/// How to open the wallet database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database file path
    pub path: PathBuf,
    /// Create the file and any missing tables on open
    #[serde(default = "default_create")]
    pub create: bool,
}

fn default_create() -> bool {
    true
}

impl StoreConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            create: true,
        }
    }

    /// Config pointing at the database inside the given data directory
    pub fn from_data_dir(data_dir: &DataDir) -> WalletStoreResult<Self> {
        Ok(Self::new(data_dir.database_path()?))
    }

    /// Open an existing database only; never create the file or tables
    pub fn must_exist(mut self) -> Self {
        self.create = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_to_create() {
        let config = StoreConfig::new("/tmp/wallet.sqlite");
        assert!(config.create);
        assert!(!config.must_exist().create);
    }

    #[test]
    fn test_deserialize_without_create_flag() {
        let config: StoreConfig = serde_json::from_str(r#"{"path": "/tmp/w.sqlite"}"#).unwrap();
        assert_eq!(config.path, PathBuf::from("/tmp/w.sqlite"));
        assert!(config.create);
    }
}
