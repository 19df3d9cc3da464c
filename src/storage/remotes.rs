//! Remote endpoints known to the wallet (chain nodes, seeds, gateways)

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::errors::WalletStoreResult;
use crate::storage::database::{Database, FromRow};
use crate::storage::schema::{column_enum, Column, TableSchema, ValueKind};
use crate::storage::store::EntityStore;

/// Category discriminant of a remote endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteType(pub i64);

impl RemoteType {
    pub const NODE: RemoteType = RemoteType(0);
    pub const SEED: RemoteType = RemoteType(1);
    pub const GATEWAY: RemoteType = RemoteType(2);
}

impl ToSql for RemoteType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for RemoteType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(RemoteType)
    }
}

column_enum! {
    /// Columns writable through [`Remotes::update`]
    pub enum RemoteColumn: invalid_field {
        Label => "label",
        Url => "url",
        Rtype => "rtype",
        Ctype => "ctype",
    }
}

impl RemoteColumn {
    /// Values the column accepts on update
    pub fn kind(&self) -> ValueKind {
        match self {
            RemoteColumn::Label | RemoteColumn::Url => ValueKind::Text,
            RemoteColumn::Rtype => ValueKind::Integer,
            RemoteColumn::Ctype => ValueKind::OptionalText,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEndpoint {
    pub id: i64,
    pub label: String,
    pub url: String,
    pub rtype: RemoteType,
    /// Connection type, e.g. `websocket`
    pub ctype: Option<String>,
}

impl FromRow for RemoteEndpoint {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            label: row.get("label")?,
            url: row.get("url")?,
            rtype: row.get("rtype")?,
            ctype: row.get("ctype")?,
        })
    }
}

/// Store for the `remotes` table
pub struct Remotes<'a> {
    db: &'a Database,
}

impl EntityStore for Remotes<'_> {
    const SCHEMA: TableSchema = TableSchema {
        name: "remotes",
        columns: &[
            Column::new("label", "TEXT"),
            Column::new("url", "TEXT"),
            Column::new("rtype", "INTEGER"),
            Column::new("ctype", "TEXT"),
        ],
    };

    fn database(&self) -> &Database {
        self.db
    }
}

impl<'a> Remotes<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Endpoints of one category, in no particular order
    pub fn get_remotes(&self, rtype: RemoteType) -> WalletStoreResult<Vec<RemoteEndpoint>> {
        self.db.fetch_all(
            "SELECT id, label, url, rtype, ctype FROM remotes WHERE rtype = ?1",
            [rtype],
        )
    }

    pub fn get_remote(&self, id: i64) -> WalletStoreResult<Option<RemoteEndpoint>> {
        self.db.fetch_one(
            "SELECT id, label, url, rtype, ctype FROM remotes WHERE id = ?1",
            [id],
        )
    }

    pub fn add(&self, rtype: RemoteType, label: &str, url: &str, ctype: &str) -> WalletStoreResult<i64> {
        self.db.insert(
            "INSERT INTO remotes (label, url, ctype, rtype) VALUES (?1, ?2, ?3, ?4)",
            params![label, url, ctype, rtype],
        )
    }

    /// Set a single column; `InvalidValue` when `value` does not fit it
    pub fn update<V: ToSql>(&self, id: i64, column: RemoteColumn, value: V) -> WalletStoreResult<()> {
        column.kind().check(column.as_str(), &value)?;
        let sql = format!("UPDATE remotes SET {} = ?1 WHERE id = ?2", column.as_str());
        self.db.execute(&sql, params![value, id])?;
        Ok(())
    }

    /// Like [`Remotes::update`] with the column given by name
    pub fn update_by_name<V: ToSql>(&self, id: i64, column: &str, value: V) -> WalletStoreResult<()> {
        self.update(id, column.parse()?, value)
    }

    pub fn delete(&self, id: i64) -> WalletStoreResult<()> {
        self.db.execute("DELETE FROM remotes WHERE id = ?1", [id])?;
        Ok(())
    }
}
