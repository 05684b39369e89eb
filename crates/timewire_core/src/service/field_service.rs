//! Temporal field use-case service.
//!
//! # Responsibility
//! - Run the write path (parse -> encode -> persist) for create and update
//!   mutations.
//! - Run the read path (load -> decode -> format) for queries.
//!
//! # Invariants
//! - A write touches storage only after parsing and encoding both succeeded.
//! - Values are decoded by the connector that encoded them; a mismatch is an
//!   error, not a best-effort decode.
//! - Service layer remains storage-agnostic.

use crate::connector::Connector;
use crate::error::TemporalError;
use crate::logging::sanitize_for_log;
use crate::model::column::{ColumnRef, StoredColumn};
use crate::model::instant::Instant;
use crate::repo::column_repo::{ColumnRepository, RepoError};
use crate::temporal::{format, parse_with, ParseOptions};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

const MAX_LOGGED_NAME_CHARS: usize = 64;

pub type FieldResult<T> = Result<T, FieldServiceError>;

/// Service error for temporal field mutations and queries.
#[derive(Debug)]
pub enum FieldServiceError {
    /// Literal, codec or capability failure for the field value.
    Temporal(TemporalError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Stored value was written by a different connector.
    ConnectorMismatch {
        column: ColumnRef,
        stored: String,
        active: String,
    },
}

impl Display for FieldServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Temporal(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::ConnectorMismatch {
                column,
                stored,
                active,
            } => write!(
                f,
                "{column} was written by connector `{stored}`, cannot read it with `{active}`"
            ),
        }
    }
}

impl Error for FieldServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Temporal(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::ConnectorMismatch { .. } => None,
        }
    }
}

impl From<TemporalError> for FieldServiceError {
    fn from(value: TemporalError) -> Self {
        Self::Temporal(value)
    }
}

impl From<RepoError> for FieldServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl FieldServiceError {
    fn code(&self) -> &'static str {
        match self {
            Self::Temporal(err) => err.code(),
            Self::Repo(RepoError::NotFound(_)) => "not_found",
            Self::Repo(RepoError::AlreadyExists(_)) => "already_exists",
            Self::Repo(_) => "repo_error",
            Self::ConnectorMismatch { .. } => "connector_mismatch",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum WriteMode {
    Create,
    Update,
}

impl WriteMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

/// Temporal field service bound to one connector.
pub struct FieldService<R: ColumnRepository> {
    repo: R,
    connector: Arc<dyn Connector>,
    options: ParseOptions,
}

impl<R: ColumnRepository> FieldService<R> {
    /// Creates a service with default parse options.
    pub fn new(repo: R, connector: Arc<dyn Connector>) -> Self {
        Self {
            repo,
            connector,
            options: ParseOptions::default(),
        }
    }

    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn connector(&self) -> &dyn Connector {
        self.connector.as_ref()
    }

    /// Capability query for the bound connector.
    pub fn supports_negative_epoch(&self) -> bool {
        self.connector.supports_negative_epoch()
    }

    /// Creates one temporal field from a literal.
    ///
    /// # Errors
    /// - `Temporal` when the literal is rejected or the connector cannot
    ///   encode it; nothing is written in that case.
    /// - `Repo(AlreadyExists)` when the field is already stored.
    pub fn create_field(&self, column: &ColumnRef, literal: &str) -> FieldResult<Instant> {
        self.write(WriteMode::Create, column, literal)
    }

    /// Creates a new record with a generated primary key holding one field.
    pub fn create_record(
        &self,
        table: &str,
        column: &str,
        literal: &str,
    ) -> FieldResult<(ColumnRef, Instant)> {
        let column = ColumnRef::new(table, Uuid::new_v4().to_string(), column);
        let instant = self.create_field(&column, literal)?;
        Ok((column, instant))
    }

    /// Overwrites an existing temporal field with a new literal.
    pub fn update_field(&self, column: &ColumnRef, literal: &str) -> FieldResult<Instant> {
        self.write(WriteMode::Update, column, literal)
    }

    /// Reads one temporal field back as an `Instant`.
    pub fn read_field(&self, column: &ColumnRef) -> FieldResult<Option<Instant>> {
        let result = self
            .repo
            .get_column(column)
            .map_err(FieldServiceError::from)
            .and_then(|stored| stored.map(|stored| self.decode_stored(&stored)).transpose());

        if let Err(err) = &result {
            self.log_failure("read", column, err);
        }
        result
    }

    /// Reads one temporal field in canonical output form.
    pub fn read_field_literal(&self, column: &ColumnRef) -> FieldResult<Option<String>> {
        Ok(self.read_field(column)?.map(|instant| format(&instant)))
    }

    /// Reads every temporal field of a record as `(column name, instant)`.
    pub fn read_record(&self, table: &str, primary_key: &str) -> FieldResult<Vec<(String, Instant)>> {
        self.repo
            .list_record_columns(table, primary_key)?
            .into_iter()
            .map(|stored| {
                let instant = self.decode_stored(&stored)?;
                Ok((stored.column.column, instant))
            })
            .collect()
    }

    pub fn delete_field(&self, column: &ColumnRef) -> FieldResult<()> {
        Ok(self.repo.delete_column(column)?)
    }

    fn write(&self, mode: WriteMode, column: &ColumnRef, literal: &str) -> FieldResult<Instant> {
        let result = self.write_inner(mode, column, literal);
        match &result {
            Ok(instant) => info!(
                "event=field_write module=service status=ok op={} connector={} table={} column={} pre_epoch={}",
                mode.as_str(),
                self.connector.name(),
                sanitize_for_log(&column.table, MAX_LOGGED_NAME_CHARS),
                sanitize_for_log(&column.column, MAX_LOGGED_NAME_CHARS),
                instant.is_before_epoch()
            ),
            Err(err) => self.log_failure(mode.as_str(), column, err),
        }
        result
    }

    fn write_inner(&self, mode: WriteMode, column: &ColumnRef, literal: &str) -> FieldResult<Instant> {
        let instant = parse_with(literal, &self.options)?;
        let value = self.connector.encode(&instant)?;
        let stored = StoredColumn {
            column: column.clone(),
            connector: self.connector.name().to_string(),
            value,
        };

        match mode {
            WriteMode::Create => self.repo.insert_column(&stored)?,
            WriteMode::Update => self.repo.update_column(&stored)?,
        }
        Ok(instant)
    }

    fn decode_stored(&self, stored: &StoredColumn) -> FieldResult<Instant> {
        if stored.connector != self.connector.name() {
            return Err(FieldServiceError::ConnectorMismatch {
                column: stored.column.clone(),
                stored: stored.connector.clone(),
                active: self.connector.name().to_string(),
            });
        }
        Ok(self.connector.decode(&stored.value)?)
    }

    fn log_failure(&self, op: &str, column: &ColumnRef, err: &FieldServiceError) {
        warn!(
            "event=field_{} module=service status=error connector={} table={} column={} error_code={}",
            op,
            self.connector.name(),
            sanitize_for_log(&column.table, MAX_LOGGED_NAME_CHARS),
            sanitize_for_log(&column.column, MAX_LOGGED_NAME_CHARS),
            err.code()
        );
    }
}
