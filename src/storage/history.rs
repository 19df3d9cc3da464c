//! Per-account operation history
//!
//! Operation indices are chain object ids such as `1.11.4096`: a fixed
//! five-character lead-in followed by a decimal sequence number. Ordering is
//! always by that number, never by the string, so `1.11.20` sorts above
//! `1.11.3`.

use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{WalletStoreError, WalletStoreResult};
use crate::storage::database::{Database, FromRow};
use crate::storage::schema::{Column, TableSchema};
use crate::storage::store::EntityStore;

/// Length of the lead-in before the numeric part of an operation index
pub const OP_INDEX_PREFIX_LEN: usize = 5;

/// Newest operation first, by the number after the lead-in
fn order_by_op_index() -> String {
    // substr() is 1-based
    format!(
        "ORDER BY CAST(substr(op_index, {}) AS INTEGER) DESC",
        OP_INDEX_PREFIX_LEN + 1
    )
}

/// Stored history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub account: String,
    pub description: Option<String>,
    pub op_index: String,
    /// Serialized operation payload
    pub operation: Option<String>,
    pub memo: Option<String>,
    pub block_num: i64,
    pub trx_in_block: i64,
    pub op_in_trx: i64,
    pub virtual_op: bool,
    pub trxid: Option<String>,
    /// Serialized full transaction
    pub trxfull: Option<String>,
    pub details: Option<String>,
    /// Insertion time, set by the database
    pub date: Option<String>,
}

impl FromRow for HistoryEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            account: row.get("account")?,
            description: row.get("description")?,
            op_index: row.get("op_index")?,
            operation: row.get("operation")?,
            memo: row.get("memo")?,
            block_num: row.get::<_, Option<i64>>("block_num")?.unwrap_or_default(),
            trx_in_block: row.get::<_, Option<i64>>("trx_in_block")?.unwrap_or_default(),
            op_in_trx: row.get::<_, Option<i64>>("op_in_trx")?.unwrap_or_default(),
            virtual_op: row.get::<_, Option<i64>>("virtual_op")?.unwrap_or_default() != 0,
            trxid: row.get("trxid")?,
            trxfull: row.get("trxfull")?,
            details: row.get("details")?,
            date: row.get("date")?,
        })
    }
}

/// Values for a new history entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHistoryEntry {
    pub account: String,
    pub description: Option<String>,
    pub op_index: String,
    pub operation: Option<String>,
    pub memo: Option<String>,
    pub block_num: i64,
    pub trx_in_block: i64,
    pub op_in_trx: i64,
    pub virtual_op: bool,
    pub trxid: Option<String>,
    pub trxfull: Option<String>,
    pub details: Option<String>,
}

impl NewHistoryEntry {
    pub fn new(account: impl Into<String>, op_index: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            op_index: op_index.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Block number, transaction-in-block and operation-in-transaction
    pub fn with_location(mut self, block_num: i64, trx_in_block: i64, op_in_trx: i64) -> Self {
        self.block_num = block_num;
        self.trx_in_block = trx_in_block;
        self.op_in_trx = op_in_trx;
        self
    }

    pub fn with_transaction(mut self, trxid: impl Into<String>, trxfull: impl Into<String>) -> Self {
        self.trxid = Some(trxid.into());
        self.trxfull = Some(trxfull.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn virtual_op(mut self, virtual_op: bool) -> Self {
        self.virtual_op = virtual_op;
        self
    }
}

/// Store for the `history` table
pub struct History<'a> {
    db: &'a Database,
}

impl EntityStore for History<'_> {
    const SCHEMA: TableSchema = TableSchema {
        name: "history",
        columns: &[
            Column::new("account", "TEXT"),
            Column::new("description", "TEXT"),
            Column::new("op_index", "TEXT"),
            Column::new("operation", "TEXT"),
            Column::new("memo", "TEXT"),
            Column::new("block_num", "INTEGER"),
            Column::new("trx_in_block", "INTEGER"),
            Column::new("op_in_trx", "INTEGER"),
            Column::new("virtual_op", "INTEGER"),
            Column::new("trxid", "TEXT"),
            Column::new("trxfull", "TEXT"),
            Column::new("details", "TEXT"),
            Column::new("date", "TEXT"),
        ],
    };

    fn database(&self) -> &Database {
        self.db
    }
}

impl<'a> History<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All entries of an account, newest operation first
    pub fn get_entries(&self, account: &str) -> WalletStoreResult<Vec<HistoryEntry>> {
        let sql = format!(
            "SELECT {} FROM history WHERE account = ?1 {}",
            Self::SCHEMA.select_list(),
            order_by_op_index()
        );
        self.db.fetch_all(&sql, [account])
    }

    /// Operation index of the newest entry of an account
    pub fn get_last_operation(&self, account: &str) -> WalletStoreResult<Option<String>> {
        let sql = format!(
            "SELECT op_index FROM history WHERE account = ?1 {} LIMIT 1",
            order_by_op_index()
        );
        self.db.fetch_value(&sql, [account])
    }

    pub fn get_entry(&self, op_index: &str, account: &str) -> WalletStoreResult<Option<HistoryEntry>> {
        let sql = format!(
            "SELECT {} FROM history WHERE op_index = ?1 AND account = ?2",
            Self::SCHEMA.select_list()
        );
        self.db.fetch_one(&sql, [op_index, account])
    }

    /// Insert an entry; (op_index, account) must not be stored yet
    pub fn add(&self, entry: &NewHistoryEntry) -> WalletStoreResult<i64> {
        if self.get_entry(&entry.op_index, &entry.account)?.is_some() {
            return Err(WalletStoreError::duplicate(
                "history entry",
                format!("{}/{}", entry.account, entry.op_index),
            ));
        }
        debug!(account = %entry.account, op_index = %entry.op_index, "adding history entry");
        self.db.insert(
            "INSERT INTO history (account, description, op_index, operation, memo, \
             block_num, trx_in_block, op_in_trx, virtual_op, trxid, trxfull, details, date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, datetime(CURRENT_TIMESTAMP))",
            params![
                entry.account,
                entry.description,
                entry.op_index,
                entry.operation,
                entry.memo,
                entry.block_num,
                entry.trx_in_block,
                entry.op_in_trx,
                entry.virtual_op as i64,
                entry.trxid,
                entry.trxfull,
                entry.details,
            ],
        )
    }

    pub fn update_entry_memo(&self, id: i64, memo: &str) -> WalletStoreResult<()> {
        self.db
            .execute("UPDATE history SET memo = ?1 WHERE id = ?2", params![memo, id])?;
        Ok(())
    }

    /// Overwrite the date of every entry with this operation index
    pub fn update_date(&self, op_index: &str, date: &str) -> WalletStoreResult<()> {
        self.db.execute(
            "UPDATE history SET date = ?1 WHERE op_index = ?2",
            params![date, op_index],
        )?;
        Ok(())
    }

    pub fn delete(&self, id: i64) -> WalletStoreResult<()> {
        self.db.execute("DELETE FROM history WHERE id = ?1", [id])?;
        Ok(())
    }
}
