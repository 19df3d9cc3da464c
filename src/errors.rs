use thiserror::Error;

/// Main error type for the wallet store
#[derive(Debug, Error)]
pub enum WalletStoreError {
    #[error("Duplicate {entity}: {key} already in storage")]
    DuplicateEntity { entity: &'static str, key: String },

    #[error("Invalid key '{key}', expected one of: {}", .allowed.join(", "))]
    InvalidKey {
        key: String,
        allowed: &'static [&'static str],
    },

    #[error("Invalid field '{field}', expected one of: {}", .allowed.join(", "))]
    InvalidField {
        field: String,
        allowed: &'static [&'static str],
    },

    #[error("Invalid value for '{column}': expected {expected}, got {found}")]
    InvalidValue {
        column: &'static str,
        expected: &'static str,
        found: rusqlite::types::Type,
    },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Data directory error: {0}")]
    DataDirectory(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the crate
pub type WalletStoreResult<T> = Result<T, WalletStoreError>;

impl WalletStoreError {
    /// Create a duplicate entity error
    pub fn duplicate(entity: &'static str, key: impl Into<String>) -> Self {
        Self::DuplicateEntity {
            entity,
            key: key.into(),
        }
    }

    /// Create an invalid key error
    pub fn invalid_key(key: &str, allowed: &'static [&'static str]) -> Self {
        Self::InvalidKey {
            key: key.to_string(),
            allowed,
        }
    }

    /// Create an invalid field error
    pub fn invalid_field(field: &str, allowed: &'static [&'static str]) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            allowed,
        }
    }

    /// Create an invalid value error for a column that cannot store `found`
    pub fn invalid_value(column: &'static str, expected: &'static str, found: rusqlite::types::Type) -> Self {
        Self::InvalidValue {
            column,
            expected,
            found,
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: &str) -> Self {
        Self::MissingField(field.to_string())
    }

    /// True when a uniqueness pre-check rejected the write
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateEntity { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_allowed_names() {
        let err = WalletStoreError::invalid_field("bogus", &["label", "url"]);
        assert_eq!(
            err.to_string(),
            "Invalid field 'bogus', expected one of: label, url"
        );
    }

    #[test]
    fn test_duplicate_helper() {
        let err = WalletStoreError::duplicate("account", "init0");
        assert!(err.is_duplicate());
        assert_eq!(err.to_string(), "Duplicate account: init0 already in storage");
    }

    #[test]
    fn test_invalid_value_display() {
        let err = WalletStoreError::invalid_value("ioflag", "integer or null", rusqlite::types::Type::Text);
        assert_eq!(err.to_string(), "Invalid value for 'ioflag': expected integer or null, got Text");
    }

    #[test]
    fn test_rusqlite_error_converts() {
        let err: WalletStoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, WalletStoreError::Database(_)));
    }
}
