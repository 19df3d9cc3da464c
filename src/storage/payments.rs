//! External gateway payment records
//!
//! Each row is one directed leg through a gateway (deposit into the chain or
//! withdrawal out of it). Receipt, remote, coin and wallet data are kept as the
//! serialized documents the gateway client hands over.

use rusqlite::types::ToSql;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::WalletStoreResult;
use crate::storage::database::{Database, FromRow};
use crate::storage::schema::{column_enum, Column, TableSchema, ValueKind};
use crate::storage::store::EntityStore;

column_enum! {
    /// Every column of the `payments` table
    pub enum PaymentColumn: invalid_field {
        Id => "id",
        Account => "account",
        Gateway => "gateway",
        IoFlag => "ioflag",
        InputCoinType => "inputcointype",
        OutputCoinType => "outputcointype",
        OutputAddress => "outputaddress",
        ReceiptJson => "receipt_json",
        RemoteJson => "remote_json",
        CoinDataJson => "coindata_json",
        WalletDataJson => "walletdata_json",
        CreationDate => "creationdate",
    }
}

impl PaymentColumn {
    /// Values the column accepts on update
    pub fn kind(&self) -> ValueKind {
        match self {
            PaymentColumn::Id => ValueKind::Integer,
            PaymentColumn::IoFlag => ValueKind::OptionalInteger,
            _ => ValueKind::OptionalText,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: i64,
    pub account: Option<String>,
    pub gateway: Option<String>,
    /// Direction of the leg through the gateway
    pub ioflag: Option<i64>,
    pub inputcointype: Option<String>,
    pub outputcointype: Option<String>,
    pub outputaddress: Option<String>,
    pub receipt_json: Option<String>,
    pub remote_json: Option<String>,
    pub coindata_json: Option<String>,
    pub walletdata_json: Option<String>,
    pub creationdate: Option<String>,
}

impl FromRow for PaymentRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            account: row.get("account")?,
            gateway: row.get("gateway")?,
            ioflag: row.get("ioflag")?,
            inputcointype: row.get("inputcointype")?,
            outputcointype: row.get("outputcointype")?,
            outputaddress: row.get("outputaddress")?,
            receipt_json: row.get("receipt_json")?,
            remote_json: row.get("remote_json")?,
            coindata_json: row.get("coindata_json")?,
            walletdata_json: row.get("walletdata_json")?,
            creationdate: row.get("creationdate")?,
        })
    }
}

/// Values for a new payment record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayment {
    pub account: String,
    pub gateway: String,
    pub ioflag: i64,
    pub inputcointype: String,
    pub outputcointype: String,
    pub outputaddress: String,
    pub receipt_json: Option<String>,
    pub coindata_json: Option<String>,
    pub walletdata_json: Option<String>,
}

/// Store for the `payments` table
pub struct Payments<'a> {
    db: &'a Database,
}

impl EntityStore for Payments<'_> {
    const SCHEMA: TableSchema = TableSchema {
        name: "payments",
        columns: &[
            Column::new("account", "TEXT"),
            Column::new("gateway", "TEXT"),
            Column::new("ioflag", "INTEGER"),
            Column::new("inputcointype", "TEXT"),
            Column::new("outputcointype", "TEXT"),
            Column::new("outputaddress", "TEXT"),
            Column::new("receipt_json", "TEXT"),
            Column::new("remote_json", "TEXT"),
            Column::new("coindata_json", "TEXT"),
            Column::new("walletdata_json", "TEXT"),
            Column::new("creationdate", "TEXT"),
        ],
    };

    fn database(&self) -> &Database {
        self.db
    }
}

impl<'a> Payments<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn get_all_entries(&self) -> WalletStoreResult<Vec<PaymentRecord>> {
        let sql = format!("SELECT {} FROM payments", Self::SCHEMA.select_list());
        self.db.fetch_all(&sql, [])
    }

    pub fn get_entries(&self, account: &str) -> WalletStoreResult<Vec<PaymentRecord>> {
        let sql = format!(
            "SELECT {} FROM payments WHERE account = ?1",
            Self::SCHEMA.select_list()
        );
        self.db.fetch_all(&sql, [account])
    }

    /// First record whose `column` equals `value`
    pub fn get_entry<V: ToSql>(&self, column: PaymentColumn, value: V) -> WalletStoreResult<Option<PaymentRecord>> {
        let sql = format!(
            "SELECT {} FROM payments WHERE {} = ?1",
            Self::SCHEMA.select_list(),
            column.as_str()
        );
        self.db.fetch_one(&sql, [value])
    }

    /// Like [`Payments::get_entry`] with the column given by name
    pub fn get_entry_by_name<V: ToSql>(&self, column: &str, value: V) -> WalletStoreResult<Option<PaymentRecord>> {
        let column: PaymentColumn = column.parse()?;
        self.get_entry(column, value)
    }

    pub fn get_entry_by_id(&self, id: i64) -> WalletStoreResult<Option<PaymentRecord>> {
        self.get_entry(PaymentColumn::Id, id)
    }

    /// Set a single column of the record with the given id.
    ///
    /// Fails with `InvalidValue` when `value` does not fit the column.
    pub fn update_entry<V: ToSql>(&self, id: i64, column: PaymentColumn, value: V) -> WalletStoreResult<()> {
        column.kind().check(column.as_str(), &value)?;
        let sql = format!("UPDATE payments SET {} = ?1 WHERE id = ?2", column.as_str());
        self.db.execute(&sql, params![value, id])?;
        Ok(())
    }

    /// Like [`Payments::update_entry`] with the column given by name
    pub fn update_entry_by_name<V: ToSql>(&self, id: i64, column: &str, value: V) -> WalletStoreResult<()> {
        let column: PaymentColumn = column.parse()?;
        self.update_entry(id, column, value)
    }

    /// Refresh cached coin and wallet data on every record of a gateway/input-coin pair
    pub fn update_coin_data(
        &self,
        gateway: &str,
        input_coin_type: &str,
        coindata_json: &str,
        walletdata_json: &str,
    ) -> WalletStoreResult<usize> {
        self.db.execute(
            "UPDATE payments SET coindata_json = ?1, walletdata_json = ?2 \
             WHERE gateway = ?3 AND inputcointype = ?4",
            params![coindata_json, walletdata_json, gateway, input_coin_type],
        )
    }

    /// Insert a payment record, returning its id
    pub fn add(&self, payment: &NewPayment) -> WalletStoreResult<i64> {
        debug!(account = %payment.account, gateway = %payment.gateway, "adding payment");
        self.db.insert(
            "INSERT INTO payments (account, gateway, ioflag, inputcointype, outputcointype, \
             outputaddress, receipt_json, coindata_json, walletdata_json, creationdate) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, datetime(CURRENT_TIMESTAMP))",
            params![
                payment.account,
                payment.gateway,
                payment.ioflag,
                payment.inputcointype,
                payment.outputcointype,
                payment.outputaddress,
                payment.receipt_json,
                payment.coindata_json,
                payment.walletdata_json,
            ],
        )
    }

    pub fn delete(&self, id: i64) -> WalletStoreResult<()> {
        self.db.execute("DELETE FROM payments WHERE id = ?1", [id])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WalletStoreError;
    use tracing::Span;

    fn database() -> Database {
        let db = Database::open_in_memory(Span::none()).unwrap();
        Payments::new(&db).create_table().unwrap();
        db
    }

    fn deposit(account: &str, coin: &str) -> NewPayment {
        NewPayment {
            account: account.into(),
            gateway: "rudex".into(),
            ioflag: 1,
            inputcointype: coin.into(),
            outputcointype: format!("rudex.{coin}"),
            outputaddress: "alice".into(),
            receipt_json: Some(r#"{"inputAddress": "0xabc"}"#.into()),
            ..NewPayment::default()
        }
    }

    #[test]
    fn test_add_returns_id() {
        let db = database();
        let payments = Payments::new(&db);
        let first = payments.add(&deposit("alice", "eth")).unwrap();
        let second = payments.add(&deposit("alice", "eth")).unwrap();
        assert_ne!(first, second);

        let record = payments.get_entry_by_id(second).unwrap().unwrap();
        assert_eq!(record.gateway.as_deref(), Some("rudex"));
        assert_eq!(record.ioflag, Some(1));
        assert!(record.creationdate.is_some());
        assert_eq!(payments.get_all_entries().unwrap().len(), 2);
    }

    #[test]
    fn test_get_entry_by_column() {
        let db = database();
        let payments = Payments::new(&db);
        payments.add(&deposit("alice", "eth")).unwrap();
        payments.add(&deposit("bob", "btc")).unwrap();

        let record = payments
            .get_entry(PaymentColumn::InputCoinType, "btc")
            .unwrap()
            .unwrap();
        assert_eq!(record.account.as_deref(), Some("bob"));
        assert!(payments.get_entry(PaymentColumn::Account, "carol").unwrap().is_none());
        assert_eq!(payments.get_entries("alice").unwrap().len(), 1);
    }

    #[test]
    fn test_update_entry_rejects_unknown_column() {
        let db = database();
        let payments = Payments::new(&db);
        let id = payments.add(&deposit("alice", "eth")).unwrap();
        let before = payments.get_entry_by_id(id).unwrap();

        let err = payments
            .update_entry_by_name(id, "gatewayid", "x")
            .unwrap_err();
        assert!(matches!(err, WalletStoreError::InvalidField { .. }));
        assert_eq!(payments.get_entry_by_id(id).unwrap(), before);

        payments
            .update_entry_by_name(id, "remote_json", r#"{"state": "done"}"#)
            .unwrap();
        let after = payments.get_entry_by_id(id).unwrap().unwrap();
        assert_eq!(after.remote_json.as_deref(), Some(r#"{"state": "done"}"#));
    }

    #[test]
    fn test_mistyped_update_keeps_table_readable() {
        let db = database();
        let payments = Payments::new(&db);
        let first = payments.add(&deposit("alice", "eth")).unwrap();
        payments.add(&deposit("bob", "btc")).unwrap();

        let err = payments.update_entry_by_name(first, "ioflag", "out").unwrap_err();
        assert!(matches!(err, WalletStoreError::InvalidValue { column: "ioflag", .. }));
        assert!(payments.update_entry(first, PaymentColumn::Account, 5).is_err());

        let all = payments.get_all_entries().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.iter().find(|p| p.id == first).unwrap().ioflag, Some(1));

        payments.update_entry(first, PaymentColumn::IoFlag, 0).unwrap();
        payments
            .update_entry(first, PaymentColumn::ReceiptJson, None::<String>)
            .unwrap();
        let record = payments.get_entry_by_id(first).unwrap().unwrap();
        assert_eq!(record.ioflag, Some(0));
        assert!(record.receipt_json.is_none());
    }

    #[test]
    fn test_get_entry_by_column_name() {
        let db = database();
        let payments = Payments::new(&db);
        payments.add(&deposit("alice", "eth")).unwrap();

        let record = payments.get_entry_by_name("outputcointype", "rudex.eth").unwrap();
        assert_eq!(record.unwrap().account.as_deref(), Some("alice"));
        assert!(payments.get_entry_by_name("gateway", "other").unwrap().is_none());

        let err = payments.get_entry_by_name("coin", "eth").unwrap_err();
        assert!(matches!(err, WalletStoreError::InvalidField { .. }));
    }

    #[test]
    fn test_update_coin_data_by_gateway_and_coin() {
        let db = database();
        let payments = Payments::new(&db);
        let eth_a = payments.add(&deposit("alice", "eth")).unwrap();
        let eth_b = payments.add(&deposit("bob", "eth")).unwrap();
        let btc = payments.add(&deposit("alice", "btc")).unwrap();

        let changed = payments
            .update_coin_data("rudex", "eth", r#"{"rate": 2}"#, r#"{"online": true}"#)
            .unwrap();
        assert_eq!(changed, 2);

        for id in [eth_a, eth_b] {
            let record = payments.get_entry_by_id(id).unwrap().unwrap();
            assert_eq!(record.coindata_json.as_deref(), Some(r#"{"rate": 2}"#));
        }
        let untouched = payments.get_entry_by_id(btc).unwrap().unwrap();
        assert!(untouched.coindata_json.is_none());
    }

    #[test]
    fn test_delete_and_wipe() {
        let db = database();
        let payments = Payments::new(&db);
        let id = payments.add(&deposit("alice", "eth")).unwrap();
        payments.add(&deposit("alice", "btc")).unwrap();
        payments.delete(id).unwrap();
        payments.delete(id).unwrap();
        assert_eq!(payments.count_entries().unwrap(), 1);
        payments.wipe().unwrap();
        assert!(payments.get_all_entries().unwrap().is_empty());
    }
}
