//! Asset storage
//!
//! Stores asset symbols, chain ids, issuer ids and the chain-side asset
//! snapshot in the `assets` table. Symbols are always stored upper-cased.

use rusqlite::types::ToSql;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::{WalletStoreError, WalletStoreResult};
use crate::storage::database::{json_column, Database, FromRow};
use crate::storage::schema::{Column, TableSchema};
use crate::storage::store::EntityStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub symbol: String,
    pub asset_id: String,
    pub issuer_id: Option<String>,
    pub snapshot: Value,
}

impl FromRow for Asset {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            symbol: row.get("symbol")?,
            asset_id: row.get("asset_id")?,
            issuer_id: row.get("issuer_id")?,
            snapshot: json_column(row, "graphene_json")?.unwrap_or(Value::Null),
        })
    }
}

/// Snapshot-only projection used by the listing queries
struct Snapshot(Value);

impl FromRow for Snapshot {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self(json_column(row, "graphene_json")?.unwrap_or(Value::Null)))
    }
}

/// Store for the `assets` table
pub struct Assets<'a> {
    db: &'a Database,
}

impl EntityStore for Assets<'_> {
    const SCHEMA: TableSchema = TableSchema {
        name: "assets",
        columns: &[
            Column::new("symbol", "TEXT"),
            Column::new("asset_id", "TEXT"),
            Column::new("issuer_id", "TEXT"),
            Column::new("graphene_json", "TEXT"),
        ],
    };

    fn database(&self) -> &Database {
        self.db
    }
}

impl<'a> Assets<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Every stored asset, read fresh from the table
    pub fn get_assets(&self) -> WalletStoreResult<Vec<Asset>> {
        let sql = format!("SELECT {} FROM assets ORDER BY id", Self::SCHEMA.select_list());
        self.db.fetch_all(&sql, [])
    }

    /// Snapshots of assets whose symbol starts with `name`, or which are
    /// sub-assets of `name` (`PARENT.NAME` with the dots of `name` removed)
    pub fn get_assets_like(&self, name: &str, ordered: bool, limit: Option<u32>) -> WalletStoreResult<Vec<Value>> {
        let mut sql =
            String::from("SELECT graphene_json FROM assets WHERE symbol LIKE ?1 OR symbol LIKE ?2");
        if ordered {
            sql.push_str(" ORDER BY symbol");
        }
        if limit.is_some() {
            sql.push_str(" LIMIT ?3");
        }
        let prefix = format!("{name}%");
        let sub_asset = format!("%.{}", name.replace('.', ""));

        let rows: Vec<Snapshot> = match limit {
            Some(limit) => self
                .db
                .fetch_all(&sql, params![prefix, sub_asset, limit])?,
            None => self.db.fetch_all(&sql, params![prefix, sub_asset])?,
        };
        Ok(rows.into_iter().map(|s| s.0).collect())
    }

    pub fn get_by_issuer(&self, issuer_id: &str) -> WalletStoreResult<Vec<Value>> {
        let rows: Vec<Snapshot> = self.db.fetch_all(
            "SELECT graphene_json FROM assets WHERE issuer_id = ?1 ORDER BY id",
            [issuer_id],
        )?;
        Ok(rows.into_iter().map(|s| s.0).collect())
    }

    /// Snapshot of the asset with this symbol (case-insensitive)
    pub fn get_by_symbol(&self, symbol: &str) -> WalletStoreResult<Option<Value>> {
        self.snapshot_where("symbol", symbol.to_uppercase())
    }

    /// Snapshot of the asset with this chain id
    pub fn get_by_id(&self, asset_id: &str) -> WalletStoreResult<Option<Value>> {
        self.snapshot_where("asset_id", asset_id)
    }

    fn snapshot_where<V: ToSql>(&self, column: &'static str, value: V) -> WalletStoreResult<Option<Value>> {
        let sql = format!("SELECT graphene_json FROM assets WHERE {column} = ?1");
        let row: Option<Snapshot> = self.db.fetch_one(&sql, [value])?;
        Ok(row.map(|s| s.0))
    }

    /// Add an asset; the issuer id is taken from the snapshot's `issuer` field
    pub fn add(&self, asset_id: &str, symbol: &str, snapshot: &Value) -> WalletStoreResult<i64> {
        if self.get_by_id(asset_id)?.is_some() {
            return Err(WalletStoreError::duplicate("asset", asset_id));
        }
        let issuer_id = match snapshot.get("issuer") {
            Some(Value::String(issuer)) => issuer.clone(),
            Some(Value::Null) | None => return Err(WalletStoreError::missing_field("issuer")),
            Some(other) => other.to_string(),
        };
        debug!(asset_id, symbol, "adding asset");
        self.db.insert(
            "INSERT INTO assets (symbol, asset_id, issuer_id, graphene_json) VALUES (?1, ?2, ?3, ?4)",
            params![
                symbol.to_uppercase(),
                asset_id,
                issuer_id,
                serde_json::to_string(snapshot)?
            ],
        )
    }

    /// Replace the stored snapshot. The issuer id column is left as is.
    pub fn update(&self, asset_id: &str, snapshot: &Value) -> WalletStoreResult<()> {
        self.db.execute(
            "UPDATE assets SET graphene_json = ?1 WHERE asset_id = ?2",
            params![serde_json::to_string(snapshot)?, asset_id],
        )?;
        Ok(())
    }

    pub fn delete_by_symbol(&self, symbol: &str) -> WalletStoreResult<()> {
        self.db
            .execute("DELETE FROM assets WHERE symbol = ?1", [symbol.to_uppercase()])?;
        Ok(())
    }

    pub fn delete_by_id(&self, asset_id: &str) -> WalletStoreResult<()> {
        self.db.execute("DELETE FROM assets WHERE asset_id = ?1", [asset_id])?;
        Ok(())
    }
}
