//! Stored temporal column repository and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/overwrite/read/delete APIs over `temporal_columns`.
//! - Keep SQL details inside the record-store boundary.
//!
//! # Invariants
//! - Write paths validate `ColumnRef` before SQL mutations.
//! - A column is created once; later writes overwrite the whole value.
//! - Read paths reject inconsistent persisted rows instead of masking them.

use crate::connector::{StorageKind, StorageValue};
use crate::db::DbError;
use crate::model::column::{ColumnRef, ColumnRefError, StoredColumn};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const COLUMN_SELECT_SQL: &str = "SELECT
    table_name,
    primary_key,
    column_name,
    connector,
    storage_kind,
    value_integer,
    value_text
FROM temporal_columns";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for stored column persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(ColumnRefError),
    Db(DbError),
    NotFound(ColumnRef),
    AlreadyExists(ColumnRef),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(column) => write!(f, "stored column not found: {column}"),
            Self::AlreadyExists(column) => write!(f, "stored column already exists: {column}"),
            Self::InvalidData(message) => write!(f, "invalid persisted column data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::AlreadyExists(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ColumnRefError> for RepoError {
    fn from(value: ColumnRefError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for stored temporal columns.
pub trait ColumnRepository {
    /// Creates a column; fails with `AlreadyExists` if it is present.
    fn insert_column(&self, column: &StoredColumn) -> RepoResult<()>;
    /// Overwrites an existing column; fails with `NotFound` if absent.
    fn update_column(&self, column: &StoredColumn) -> RepoResult<()>;
    fn get_column(&self, column: &ColumnRef) -> RepoResult<Option<StoredColumn>>;
    /// Lists every temporal column of one record, ordered by column name.
    fn list_record_columns(&self, table: &str, primary_key: &str) -> RepoResult<Vec<StoredColumn>>;
    fn delete_column(&self, column: &ColumnRef) -> RepoResult<()>;
}

/// SQLite-backed column repository.
pub struct SqliteColumnRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteColumnRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ColumnRepository for SqliteColumnRepository<'_> {
    fn insert_column(&self, column: &StoredColumn) -> RepoResult<()> {
        column.column.validate()?;
        let (value_integer, value_text) = split_value(&column.value);

        let changed = self.conn.execute(
            "INSERT INTO temporal_columns (
                table_name,
                primary_key,
                column_name,
                connector,
                storage_kind,
                value_integer,
                value_text
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT (table_name, primary_key, column_name) DO NOTHING;",
            params![
                column.column.table.as_str(),
                column.column.primary_key.as_str(),
                column.column.column.as_str(),
                column.connector.as_str(),
                column.value.kind().as_str(),
                value_integer,
                value_text,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::AlreadyExists(column.column.clone()));
        }
        Ok(())
    }

    fn update_column(&self, column: &StoredColumn) -> RepoResult<()> {
        column.column.validate()?;
        let (value_integer, value_text) = split_value(&column.value);

        let changed = self.conn.execute(
            "UPDATE temporal_columns
             SET
                connector = ?1,
                storage_kind = ?2,
                value_integer = ?3,
                value_text = ?4,
                updated_at = (CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             WHERE table_name = ?5 AND primary_key = ?6 AND column_name = ?7;",
            params![
                column.connector.as_str(),
                column.value.kind().as_str(),
                value_integer,
                value_text,
                column.column.table.as_str(),
                column.column.primary_key.as_str(),
                column.column.column.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(column.column.clone()));
        }
        Ok(())
    }

    fn get_column(&self, column: &ColumnRef) -> RepoResult<Option<StoredColumn>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COLUMN_SELECT_SQL}
             WHERE table_name = ?1 AND primary_key = ?2 AND column_name = ?3;"
        ))?;

        let mut rows = stmt.query(params![
            column.table.as_str(),
            column.primary_key.as_str(),
            column.column.as_str(),
        ])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_column_row(row)?));
        }
        Ok(None)
    }

    fn list_record_columns(&self, table: &str, primary_key: &str) -> RepoResult<Vec<StoredColumn>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COLUMN_SELECT_SQL}
             WHERE table_name = ?1 AND primary_key = ?2
             ORDER BY column_name ASC;"
        ))?;

        let mut rows = stmt.query(params![table, primary_key])?;
        let mut columns = Vec::new();
        while let Some(row) = rows.next()? {
            columns.push(parse_column_row(row)?);
        }
        Ok(columns)
    }

    fn delete_column(&self, column: &ColumnRef) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM temporal_columns
             WHERE table_name = ?1 AND primary_key = ?2 AND column_name = ?3;",
            params![
                column.table.as_str(),
                column.primary_key.as_str(),
                column.column.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(column.clone()));
        }
        Ok(())
    }
}

fn split_value(value: &StorageValue) -> (Option<i64>, Option<&str>) {
    match value {
        StorageValue::Integer(integer) => (Some(*integer), None),
        StorageValue::Text(text) => (None, Some(text.as_str())),
    }
}

fn parse_column_row(row: &Row<'_>) -> RepoResult<StoredColumn> {
    let column = ColumnRef {
        table: row.get("table_name")?,
        primary_key: row.get("primary_key")?,
        column: row.get("column_name")?,
    };

    let kind_text: String = row.get("storage_kind")?;
    let kind = StorageKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid storage kind `{kind_text}` in temporal_columns.storage_kind"
        ))
    })?;

    let value = match kind {
        StorageKind::Integer => row
            .get::<_, Option<i64>>("value_integer")?
            .map(StorageValue::Integer),
        StorageKind::Text => row
            .get::<_, Option<String>>("value_text")?
            .map(StorageValue::Text),
    }
    .ok_or_else(|| {
        RepoError::InvalidData(format!(
            "missing {} value for {column}",
            kind.as_str()
        ))
    })?;

    Ok(StoredColumn {
        column,
        connector: row.get("connector")?,
        value,
    })
}
