//! Compile-time table descriptions
//!
//! Every table owned by this crate is described by a `TableSchema` constant.
//! DDL and column lists are generated from it, so the SQL a store issues and
//! the columns its record type decodes cannot drift apart.

use rusqlite::types::{ToSql, Type};

use crate::errors::{WalletStoreError, WalletStoreResult};
use crate::storage::database::bound_type;

/// A single non-key column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
}

impl Column {
    pub const fn new(name: &'static str, sql_type: &'static str) -> Self {
        Self { name, sql_type }
    }
}

/// Table name plus its columns in declaration order.
///
/// The surrogate `id INTEGER PRIMARY KEY AUTOINCREMENT` key is implicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl TableSchema {
    /// `CREATE TABLE` statement (fails if the table already exists)
    pub fn create_sql(&self) -> String {
        let mut defs = vec!["id INTEGER PRIMARY KEY AUTOINCREMENT".to_string()];
        defs.extend(self.columns.iter().map(|c| format!("{} {}", c.name, c.sql_type)));
        format!("CREATE TABLE {} ({})", self.name, defs.join(", "))
    }

    /// `id` followed by every column, comma separated
    pub fn select_list(&self) -> String {
        let mut names = vec!["id"];
        names.extend(self.columns.iter().map(|c| c.name));
        names.join(", ")
    }

    pub fn has_column(&self, name: &str) -> bool {
        name == "id" || self.columns.iter().any(|c| c.name == name)
    }
}

/// Values a writable column can hold.
///
/// Checked before single-column updates so a row never ends up with a value
/// its record type cannot decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    OptionalInteger,
    Text,
    OptionalText,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Integer => "integer",
            ValueKind::OptionalInteger => "integer or null",
            ValueKind::Text => "text",
            ValueKind::OptionalText => "text or null",
        }
    }

    pub fn accepts(&self, found: Type) -> bool {
        matches!(
            (self, found),
            (ValueKind::Integer | ValueKind::OptionalInteger, Type::Integer)
                | (ValueKind::Text | ValueKind::OptionalText, Type::Text)
                | (ValueKind::OptionalInteger | ValueKind::OptionalText, Type::Null)
        )
    }

    /// `InvalidValue` unless `value` binds as this kind
    pub fn check<V: ToSql + ?Sized>(&self, column: &'static str, value: &V) -> WalletStoreResult<()> {
        let found = bound_type(value)?;
        if self.accepts(found) {
            Ok(())
        } else {
            Err(WalletStoreError::invalid_value(column, self.as_str(), found))
        }
    }
}

/// Declare a closed set of column (or lookup key) names.
///
/// Generates the enum, `as_str`, `NAMES`, `Display` and a `FromStr` that maps
/// anything outside the set to the given `WalletStoreError` constructor.
macro_rules! column_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $err:ident {
            $($variant:ident => $column:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const NAMES: &'static [&'static str] = &[$($column),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $column),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::WalletStoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($column => Ok($name::$variant),)+
                    other => Err($crate::errors::WalletStoreError::$err(other, Self::NAMES)),
                }
            }
        }
    };
}

pub(crate) use column_enum;

#[cfg(test)]
mod tests {
    use super::*;

    column_enum! {
        enum Colour: invalid_field {
            Red => "red",
            Blue => "blue",
        }
    }

    #[test]
    fn test_column_enum_parsing() {
        assert_eq!("red".parse::<Colour>().unwrap(), Colour::Red);
        assert_eq!(Colour::Blue.to_string(), "blue");
        assert_eq!(Colour::NAMES, &["red", "blue"]);
        match "green".parse::<Colour>() {
            Err(WalletStoreError::InvalidField { field, allowed }) => {
                assert_eq!(field, "green");
                assert_eq!(allowed, Colour::NAMES);
            }
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_value_kind_check() {
        assert!(ValueKind::OptionalInteger.check("ioflag", &None::<i64>).is_ok());
        assert!(ValueKind::Integer.check("rtype", &2_i64).is_ok());
        assert!(ValueKind::OptionalText.check("memo", "rent").is_ok());
        match ValueKind::Text.check("label", &None::<String>) {
            Err(WalletStoreError::InvalidValue { column, found, .. }) => {
                assert_eq!(column, "label");
                assert_eq!(found, Type::Null);
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
        assert!(ValueKind::OptionalInteger.check("ioflag", "out").is_err());
    }

    const SAMPLE: TableSchema = TableSchema {
        name: "sample",
        columns: &[Column::new("label", "TEXT"), Column::new("pub", "TEXT")],
    };

    #[test]
    fn test_create_sql() {
        assert_eq!(
            SAMPLE.create_sql(),
            "CREATE TABLE sample (id INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT, pub TEXT)"
        );
    }

    #[test]
    fn test_select_list_and_lookup() {
        assert_eq!(SAMPLE.select_list(), "id, label, pub");
        assert!(SAMPLE.has_column("id"));
        assert!(SAMPLE.has_column("pub"));
        assert!(!SAMPLE.has_column("secret"));
    }
}
