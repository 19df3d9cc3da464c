//! Account storage
//!
//! Stores account names, chain ids, the full chain-side account snapshot and a
//! separately maintained balances document in the `accounts` table.

use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{WalletStoreError, WalletStoreResult};
use crate::storage::database::{json_column, Database, FromRow};
use crate::storage::schema::{column_enum, Column, TableSchema};
use crate::storage::store::EntityStore;

/// Key count recorded for accounts added without an explicit value
pub const DEFAULT_KEY_COUNT: i64 = 2;

column_enum! {
    /// Natural keys an account can be looked up by
    pub enum AccountKey: invalid_key {
        Account => "account",
        AccountId => "account_id",
    }
}

column_enum! {
    /// Columns writable through [`Accounts::update`]
    pub enum AccountField: invalid_field {
        GrapheneJson => "graphene_json",
        BalancesJson => "balances_json",
    }
}

/// Raw row of the `accounts` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAccount {
    pub id: i64,
    pub account: String,
    pub account_id: Option<String>,
    pub graphene_json: Option<Value>,
    pub balances_json: Option<Value>,
    pub keys: Option<i64>,
}

impl FromRow for StoredAccount {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            account: row.get("account")?,
            account_id: row.get("account_id")?,
            graphene_json: json_column(row, "graphene_json")?,
            balances_json: json_column(row, "balances_json")?,
            keys: row.get("keys")?,
        })
    }
}

/// Account as seen by the wallet: snapshot, balances and identity merged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub name: String,
    pub id: Option<String>,
    /// Chain-side snapshot; empty until one is written
    pub snapshot: Map<String, Value>,
    /// Balances document; empty object until one is written
    pub balances: Value,
}

impl AccountRecord {
    fn from_stored(stored: StoredAccount) -> WalletStoreResult<Self> {
        let snapshot = match stored.graphene_json {
            None | Some(Value::Null) => Map::new(),
            Some(other) => serde_json::from_value(other)?,
        };
        Ok(Self {
            name: stored.account,
            id: stored.account_id,
            snapshot,
            balances: stored
                .balances_json
                .unwrap_or_else(|| Value::Object(Map::new())),
        })
    }

    /// Snapshot with `balances`, `name` and `id` merged in
    pub fn to_json(&self) -> Value {
        let mut body = self.snapshot.clone();
        body.insert("balances".into(), self.balances.clone());
        body.insert("name".into(), Value::String(self.name.clone()));
        body.insert(
            "id".into(),
            self.id.clone().map(Value::String).unwrap_or(Value::Null),
        );
        Value::Object(body)
    }
}

/// Store for the `accounts` table
pub struct Accounts<'a> {
    db: &'a Database,
}

impl EntityStore for Accounts<'_> {
    const SCHEMA: TableSchema = TableSchema {
        name: "accounts",
        columns: &[
            Column::new("account", "TEXT"),
            Column::new("account_id", "TEXT"),
            Column::new("graphene_json", "TEXT"),
            Column::new("balances_json", "TEXT"),
            Column::new("keys", "INTEGER"),
        ],
    };

    fn database(&self) -> &Database {
        self.db
    }
}

impl<'a> Accounts<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Names of all stored accounts
    pub fn get_accounts(&self) -> WalletStoreResult<Vec<String>> {
        self.db.fetch_column("SELECT account FROM accounts ORDER BY id", [])
    }

    /// Raw row lookup
    pub fn get_stored(&self, key: AccountKey, value: &str) -> WalletStoreResult<Option<StoredAccount>> {
        let sql = format!(
            "SELECT {} FROM accounts WHERE {} = ?1",
            Self::SCHEMA.select_list(),
            key.as_str()
        );
        self.db.fetch_one(&sql, [value])
    }

    pub fn get_by(&self, key: AccountKey, value: &str) -> WalletStoreResult<Option<AccountRecord>> {
        self.get_stored(key, value)?
            .map(AccountRecord::from_stored)
            .transpose()
    }

    pub fn get_by_id(&self, account_id: &str) -> WalletStoreResult<Option<AccountRecord>> {
        self.get_by(AccountKey::AccountId, account_id)
    }

    pub fn get_by_name(&self, account_name: &str) -> WalletStoreResult<Option<AccountRecord>> {
        self.get_by(AccountKey::Account, account_name)
    }

    /// Replace the snapshot or the balances document of an account.
    ///
    /// A `balances` key inside a new snapshot is dropped; balances only live in
    /// `balances_json`.
    pub fn update(&self, account_name: &str, field: AccountField, mut value: Value) -> WalletStoreResult<()> {
        if field == AccountField::GrapheneJson {
            if let Value::Object(map) = &mut value {
                map.remove("balances");
            }
        }
        let sql = format!("UPDATE accounts SET {} = ?1 WHERE account = ?2", field.as_str());
        let body = serde_json::to_string(&value)?;
        self.db.execute(&sql, params![body, account_name])?;
        Ok(())
    }

    /// Add an account, failing if the name is already stored
    pub fn add(&self, account_name: &str, account_id: Option<&str>, keys: i64) -> WalletStoreResult<i64> {
        if self.get_stored(AccountKey::Account, account_name)?.is_some() {
            return Err(WalletStoreError::duplicate("account", account_name));
        }
        debug!(account = account_name, "adding account");
        self.db.insert(
            "INSERT INTO accounts (account, account_id, keys) VALUES (?1, ?2, ?3)",
            params![account_name, account_id, keys],
        )
    }

    pub fn delete(&self, account_name: &str) -> WalletStoreResult<()> {
        self.db.execute("DELETE FROM accounts WHERE account = ?1", [account_name])?;
        Ok(())
    }
}
