//! Stored temporal column identity and value.
//!
//! # Responsibility
//! - Identify one temporal field on one record.
//! - Carry the connector-encoded value between service and repository.
//!
//! # Invariants
//! - `(table, primary_key, column)` is unique; all three parts are non-blank.
//! - A stored value is replaced whole on update, never patched.

use crate::connector::StorageValue;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Address of one temporal field: `(table, primary key, column name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: String,
    pub primary_key: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(
        table: impl Into<String>,
        primary_key: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            primary_key: primary_key.into(),
            column: column.into(),
        }
    }

    /// Validates that every identity part is present.
    pub fn validate(&self) -> Result<(), ColumnRefError> {
        if self.table.trim().is_empty() {
            return Err(ColumnRefError::EmptyTable);
        }
        if self.primary_key.trim().is_empty() {
            return Err(ColumnRefError::EmptyPrimaryKey);
        }
        if self.column.trim().is_empty() {
            return Err(ColumnRefError::EmptyColumn);
        }
        Ok(())
    }
}

impl Display for ColumnRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}].{}", self.table, self.primary_key, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRefError {
    EmptyTable,
    EmptyPrimaryKey,
    EmptyColumn,
}

impl Display for ColumnRefError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTable => write!(f, "table name must not be empty"),
            Self::EmptyPrimaryKey => write!(f, "primary key must not be empty"),
            Self::EmptyColumn => write!(f, "column name must not be empty"),
        }
    }
}

impl Error for ColumnRefError {}

/// Persisted temporal field: identity, encoding connector and storage value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredColumn {
    pub column: ColumnRef,
    /// Name of the connector that produced `value`.
    pub connector: String,
    pub value: StorageValue,
}

#[cfg(test)]
mod tests {
    use super::{ColumnRef, ColumnRefError};

    #[test]
    fn validate_rejects_blank_parts() {
        assert_eq!(
            ColumnRef::new(" ", "1", "born_at").validate(),
            Err(ColumnRefError::EmptyTable)
        );
        assert_eq!(
            ColumnRef::new("person", "", "born_at").validate(),
            Err(ColumnRefError::EmptyPrimaryKey)
        );
        assert_eq!(
            ColumnRef::new("person", "1", "\t").validate(),
            Err(ColumnRefError::EmptyColumn)
        );
        assert!(ColumnRef::new("person", "1", "born_at").validate().is_ok());
    }

    #[test]
    fn display_is_table_key_column() {
        let column = ColumnRef::new("person", "42", "born_at");
        assert_eq!(column.to_string(), "person[42].born_at");
    }
}
