//! Operations shared by every table-backed store

use tracing::debug;

use crate::errors::WalletStoreResult;
use crate::storage::database::Database;
use crate::storage::schema::TableSchema;

/// A store owning exactly one table
pub trait EntityStore {
    /// Schema of the owned table
    const SCHEMA: TableSchema;

    /// Connection the store issues its statements on
    fn database(&self) -> &Database;

    /// Create the table. Not idempotent: fails when the table already exists.
    fn create_table(&self) -> WalletStoreResult<()> {
        self.database().create_table(&Self::SCHEMA)
    }

    fn exists_table(&self) -> WalletStoreResult<bool> {
        self.database().table_exists(Self::SCHEMA.name)
    }

    /// Create the table unless it is already present; returns whether it was created
    fn ensure_table(&self) -> WalletStoreResult<bool> {
        if self.exists_table()? {
            return Ok(false);
        }
        self.create_table()?;
        Ok(true)
    }

    fn count_entries(&self) -> WalletStoreResult<u64> {
        let sql = format!("SELECT COUNT(id) FROM {}", Self::SCHEMA.name);
        let count: Option<i64> = self.database().fetch_value(&sql, [])?;
        Ok(count.unwrap_or(0) as u64)
    }

    /// Delete ALL rows
    fn wipe(&self) -> WalletStoreResult<()> {
        debug!(table = Self::SCHEMA.name, "wiping table");
        let sql = format!("DELETE FROM {}", Self::SCHEMA.name);
        self.database().execute(&sql, [])?;
        Ok(())
    }
}
