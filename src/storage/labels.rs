//! Label storage: human readable labels with an optional cached public key

use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::errors::{WalletStoreError, WalletStoreResult};
use crate::storage::database::{Database, FromRow};
use crate::storage::schema::{Column, TableSchema};
use crate::storage::store::EntityStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub label: String,
    pub public_key: Option<String>,
}

impl FromRow for Label {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            label: row.get("label")?,
            public_key: row.get("pub")?,
        })
    }
}

/// Store for the `labels` table
pub struct Labels<'a> {
    db: &'a Database,
}

impl EntityStore for Labels<'_> {
    const SCHEMA: TableSchema = TableSchema {
        name: "labels",
        columns: &[Column::new("label", "TEXT"), Column::new("pub", "TEXT")],
    };

    fn database(&self) -> &Database {
        self.db
    }
}

impl<'a> Labels<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn get_labels(&self) -> WalletStoreResult<Vec<String>> {
        self.db.fetch_column("SELECT label FROM labels ORDER BY id", [])
    }

    pub fn get_label(&self, label: &str) -> WalletStoreResult<Option<Label>> {
        self.db
            .fetch_one("SELECT id, label, pub FROM labels WHERE label = ?1", [label])
    }

    pub fn add(&self, label: &str, public_key: Option<&str>) -> WalletStoreResult<i64> {
        if self.get_label(label)?.is_some() {
            return Err(WalletStoreError::duplicate("label", label));
        }
        self.db.insert(
            "INSERT INTO labels (label, pub) VALUES (?1, ?2)",
            params![label, public_key],
        )
    }

    /// Replace the public key cached for a label
    pub fn update_key(&self, label: &str, public_key: &str) -> WalletStoreResult<()> {
        self.db.execute(
            "UPDATE labels SET pub = ?1 WHERE label = ?2",
            params![public_key, label],
        )?;
        Ok(())
    }

    pub fn delete(&self, label: &str) -> WalletStoreResult<()> {
        self.db.execute("DELETE FROM labels WHERE label = ?1", [label])?;
        Ok(())
    }
}
