//! Core engine for timewire.
//! Parses ISO-8601 UTC literals, round-trips them through storage connectors
//! and formats them back in canonical millisecond form.

pub mod config;
pub mod connector;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod temporal;

pub use config::{ConfigError, ConnectorConfig, EngineConfig, LoggingConfig, ParseConfig};
pub use connector::capability::{ColumnPrecision, ConnectorCapability, SchemaError};
pub use connector::registry::{ConnectorRegistry, ConnectorRegistryError};
pub use connector::{build_connector, Connector, Provider, StorageValue};
pub use db::{open_db, open_db_in_memory, DbError};
pub use error::{MalformedReason, TemporalError, TemporalResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::column::ColumnRef;
pub use model::instant::Instant;
pub use repo::column_repo::{ColumnRepository, RepoError, RepoResult, SqliteColumnRepository};
pub use service::field_service::{FieldResult, FieldService, FieldServiceError};
pub use temporal::{format, parse, parse_with, FractionOverflow, ParseOptions};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
