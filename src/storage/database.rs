//! SQLite connection shared by every entity store
//!
//! `Database` owns the single `rusqlite::Connection` and exposes the handful of
//! parameterized-query primitives the stores are written against. Stores hold
//! a `&Database`; nothing else touches the connection.

use std::path::{Path, PathBuf};

use rusqlite::types::{FromSql, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Params, Row};
use serde_json::Value;
use tracing::{debug, trace, Span};

use crate::errors::WalletStoreResult;
use crate::storage::schema::TableSchema;

/// Decode a record from a result row by column name
pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// SQLite database handle
pub struct Database {
    connection: Connection,
    path: Option<PathBuf>,
    span: Span,
}

impl Database {
    /// Open a database file.
    ///
    /// With `create` unset the file must already exist; SQLite's open error is
    /// returned otherwise.
    pub fn open<P: AsRef<Path>>(path: P, create: bool, span: Span) -> WalletStoreResult<Self> {
        let path = path.as_ref();
        let mut flags = OpenFlags::default();
        if !create {
            flags = flags.difference(OpenFlags::SQLITE_OPEN_CREATE);
        }
        let connection = {
            let _guard = span.enter();
            debug!(path = %path.display(), create, "opening wallet database");
            Connection::open_with_flags(path, flags)?
        };

        Ok(Self {
            connection,
            path: Some(path.to_path_buf()),
            span,
        })
    }

    /// Open a private in-memory database (useful for testing)
    pub fn open_in_memory(span: Span) -> WalletStoreResult<Self> {
        let connection = Connection::open_in_memory()?;
        Ok(Self {
            connection,
            path: None,
            span,
        })
    }

    /// Database file path, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Span every statement is executed in
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Execute a write statement, returning the number of affected rows
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> WalletStoreResult<usize> {
        let _guard = self.span.enter();
        trace!(sql, "execute");
        Ok(self.connection.execute(sql, params)?)
    }

    /// Execute an `INSERT`, returning the generated row id
    pub fn insert<P: Params>(&self, sql: &str, params: P) -> WalletStoreResult<i64> {
        let _guard = self.span.enter();
        trace!(sql, "insert");
        self.connection.execute(sql, params)?;
        Ok(self.connection.last_insert_rowid())
    }

    /// First matching row, or `None`
    pub fn fetch_one<T: FromRow, P: Params>(&self, sql: &str, params: P) -> WalletStoreResult<Option<T>> {
        let _guard = self.span.enter();
        trace!(sql, "fetch one");
        let mut stmt = self.connection.prepare(sql)?;
        let record = stmt.query_row(params, T::from_row).optional()?;
        Ok(record)
    }

    /// All matching rows in query order
    pub fn fetch_all<T: FromRow, P: Params>(&self, sql: &str, params: P) -> WalletStoreResult<Vec<T>> {
        let _guard = self.span.enter();
        trace!(sql, "fetch all");
        let mut stmt = self.connection.prepare(sql)?;
        let records = stmt
            .query_map(params, T::from_row)?
            .collect::<rusqlite::Result<Vec<T>>>()?;
        Ok(records)
    }

    /// First column of the first matching row, or `None`
    pub fn fetch_value<T: FromSql, P: Params>(&self, sql: &str, params: P) -> WalletStoreResult<Option<T>> {
        let _guard = self.span.enter();
        trace!(sql, "fetch value");
        let value = self
            .connection
            .query_row(sql, params, |row| row.get::<_, T>(0))
            .optional()?;
        Ok(value)
    }

    /// First column of every matching row
    pub fn fetch_column<T: FromSql, P: Params>(&self, sql: &str, params: P) -> WalletStoreResult<Vec<T>> {
        let _guard = self.span.enter();
        trace!(sql, "fetch column");
        let mut stmt = self.connection.prepare(sql)?;
        let values = stmt
            .query_map(params, |row| row.get::<_, T>(0))?
            .collect::<rusqlite::Result<Vec<T>>>()?;
        Ok(values)
    }

    pub fn table_exists(&self, table: &str) -> WalletStoreResult<bool> {
        let _guard = self.span.enter();
        let mut stmt = self
            .connection
            .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
        Ok(stmt.exists([table])?)
    }

    /// Create a table from its schema; fails if it already exists
    pub fn create_table(&self, schema: &TableSchema) -> WalletStoreResult<()> {
        let _guard = self.span.enter();
        debug!(table = schema.name, "creating table");
        self.connection.execute_batch(&schema.create_sql())?;
        Ok(())
    }
}

/// Storage class `value` is bound with
pub(crate) fn bound_type<V: ToSql + ?Sized>(value: &V) -> rusqlite::Result<Type> {
    let output = value.to_sql()?;
    let found = match &output {
        ToSqlOutput::Borrowed(value) => value.data_type(),
        ToSqlOutput::Owned(value) => ValueRef::from(value).data_type(),
        _ => Type::Blob,
    };
    Ok(found)
}

/// Parse a nullable TEXT column holding a JSON document
pub(crate) fn json_column(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<Value>> {
    let text: Option<String> = row.get(column)?;
    match text {
        None => Ok(None),
        Some(text) => serde_json::from_str(&text).map(Some).map_err(|e| {
            let index = row.as_ref().column_index(column).unwrap_or_default();
            rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
        }),
    }
}
