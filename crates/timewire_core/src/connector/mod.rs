//! Storage connector codecs.
//!
//! # Responsibility
//! - Map `Instant` values to and from each backend's native column encoding.
//! - Expose per-connector capabilities so callers branch on declared support
//!   instead of assuming symmetric round-trips.
//!
//! # Invariants
//! - Encode and decode are pure and all-or-nothing.
//! - A connector without negative-epoch support fails with
//!   `CapabilityViolation` rather than returning a wrong date.
//! - Millisecond precision is preserved exactly; finer stored data is a
//!   decode error, never silently dropped.

pub mod capability;
mod datetime_text;
pub mod mongodb;
pub mod mysql;
pub mod postgres;
pub mod registry;
pub mod sqlite;
pub mod sqlserver;

use crate::error::{TemporalError, TemporalResult};
use crate::model::instant::Instant;
use capability::{ColumnPrecision, ConnectorCapabilities, ConnectorCapability, SchemaError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub use mongodb::MongoDbConnector;
pub use mysql::MySqlConnector;
pub use postgres::PostgresConnector;
pub use sqlite::SqliteConnector;
pub use sqlserver::SqlServerConnector;

/// Connector-defined persisted representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageValue {
    Integer(i64),
    Text(String),
}

impl StorageValue {
    pub fn kind(&self) -> StorageKind {
        match self {
            Self::Integer(_) => StorageKind::Integer,
            Self::Text(_) => StorageKind::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Integer,
    Text,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Text => "text",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "integer" => Some(Self::Integer),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Storage backend family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Provider {
    Postgres,
    MySql,
    Sqlite,
    MongoDb,
    SqlServer,
}

pub const PROVIDER_POSTGRES: &str = "postgresql";
pub const PROVIDER_POSTGRES_ALIAS: &str = "postgres";
pub const PROVIDER_MYSQL: &str = "mysql";
pub const PROVIDER_SQLITE: &str = "sqlite";
pub const PROVIDER_MONGODB: &str = "mongodb";
pub const PROVIDER_SQLSERVER: &str = "sqlserver";

impl Provider {
    /// Parses a datasource provider string.
    pub fn parse(value: &str) -> Result<Self, ProviderError> {
        match value.trim() {
            "" => Err(ProviderError::EmptyProvider),
            PROVIDER_POSTGRES | PROVIDER_POSTGRES_ALIAS => Ok(Self::Postgres),
            PROVIDER_MYSQL => Ok(Self::MySql),
            PROVIDER_SQLITE => Ok(Self::Sqlite),
            PROVIDER_MONGODB => Ok(Self::MongoDb),
            PROVIDER_SQLSERVER => Ok(Self::SqlServer),
            other => Err(ProviderError::UnknownProvider(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => PROVIDER_POSTGRES,
            Self::MySql => PROVIDER_MYSQL,
            Self::Sqlite => PROVIDER_SQLITE,
            Self::MongoDb => PROVIDER_MONGODB,
            Self::SqlServer => PROVIDER_SQLSERVER,
        }
    }

    /// Finest fractional-second precision the native column type offers.
    pub fn max_precision(self) -> u8 {
        match self {
            Self::Postgres | Self::MySql => 6,
            Self::Sqlite | Self::MongoDb => 3,
            Self::SqlServer => 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    EmptyProvider,
    UnknownProvider(String),
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyProvider => write!(f, "provider must not be empty"),
            Self::UnknownProvider(value) => write!(
                f,
                "provider `{value}` is not supported; expected postgresql|mysql|sqlite|mongodb|sqlserver"
            ),
        }
    }
}

impl Error for ProviderError {}

/// Codec between `Instant` and one backend's temporal column.
pub trait Connector: Send + Sync {
    /// Configured connector name, unique within a registry.
    fn name(&self) -> &str;
    fn provider(&self) -> Provider;
    fn capabilities(&self) -> ConnectorCapabilities;

    /// Whether pre-1970 instants round-trip through this connector.
    fn supports_negative_epoch(&self) -> bool {
        self.capabilities()
            .supports(ConnectorCapability::NegativeEpoch)
    }

    fn encode(&self, instant: &Instant) -> TemporalResult<StorageValue>;
    fn decode(&self, value: &StorageValue) -> TemporalResult<Instant>;
}

/// Builds a built-in connector for `provider` with a validated column precision.
pub fn build_connector(
    name: impl Into<String>,
    provider: Provider,
    precision_digits: u8,
) -> Result<Arc<dyn Connector>, SchemaError> {
    let precision = ColumnPrecision::for_provider(provider, precision_digits)?;
    let name = name.into();
    let connector: Arc<dyn Connector> = match provider {
        Provider::Postgres => Arc::new(PostgresConnector::new(name, precision)),
        Provider::MySql => Arc::new(MySqlConnector::new(name, precision)),
        Provider::Sqlite => Arc::new(SqliteConnector::new(name, precision)),
        Provider::MongoDb => Arc::new(MongoDbConnector::new(name, precision)),
        Provider::SqlServer => Arc::new(SqlServerConnector::new(name, precision)),
    };
    Ok(connector)
}

/// Checks an instant against a connector's declared capabilities.
///
/// Called before encoding and after decoding so both directions fail the
/// same way.
pub(crate) fn ensure_supported<C: Connector + ?Sized>(
    connector: &C,
    instant: &Instant,
) -> TemporalResult<()> {
    let capabilities = connector.capabilities();
    if instant.is_before_epoch() && !capabilities.supports(ConnectorCapability::NegativeEpoch) {
        return Err(TemporalError::CapabilityViolation {
            connector: connector.name().to_string(),
            capability: ConnectorCapability::NegativeEpoch,
        });
    }

    let year = instant.year();
    if !capabilities.supports_year(year) {
        return Err(TemporalError::OutOfBackendRange {
            connector: connector.name().to_string(),
            year,
        });
    }
    Ok(())
}

/// Rebuilds an instant from decoded epoch milliseconds, reporting range
/// failures as decode errors of `connector`.
pub(crate) fn instant_from_stored_millis<C: Connector + ?Sized>(
    connector: &C,
    epoch_millis: i64,
) -> TemporalResult<Instant> {
    Instant::from_epoch_millis(epoch_millis).map_err(|err| {
        TemporalError::decode(
            connector.name(),
            format!("stored value {epoch_millis}ms is not representable: {err}"),
        )
    })
}
