//! Engine configuration loaded from JSON.
//!
//! # Responsibility
//! - Describe logging, parse and connector settings in one document.
//! - Turn connector entries into a ready `ConnectorRegistry`.
//!
//! # Invariants
//! - Unknown keys are rejected at every level.
//! - A config that names an active connector only builds if that connector
//!   is declared.

use crate::connector::capability::{SchemaError, MILLISECOND_DIGITS};
use crate::connector::registry::{ConnectorRegistry, ConnectorRegistryError};
use crate::connector::{build_connector, Provider, ProviderError};
use crate::logging::default_log_level;
use crate::temporal::{FractionOverflow, ParseOptions};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Configuration load and build failures.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, message: String },
    Json(serde_json::Error),
    Provider { connector: String, source: ProviderError },
    Schema { connector: String, source: SchemaError },
    Registry(ConnectorRegistryError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "failed to read config `{}`: {message}", path.display())
            }
            Self::Json(err) => write!(f, "invalid config document: {err}"),
            Self::Provider { connector, source } => {
                write!(f, "connector `{connector}`: {source}")
            }
            Self::Schema { connector, source } => write!(f, "connector `{connector}`: {source}"),
            Self::Registry(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { .. } => None,
            Self::Json(err) => Some(err),
            Self::Provider { source, .. } => Some(source),
            Self::Schema { source, .. } => Some(source),
            Self::Registry(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ConnectorRegistryError> for ConfigError {
    fn from(value: ConnectorRegistryError) -> Self {
        Self::Registry(value)
    }
}

/// Logging bootstrap settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Absolute log directory; logging stays off when absent.
    #[serde(default)]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParseConfig {
    #[serde(default)]
    pub fraction_overflow: FractionOverflow,
}

/// One storage backend declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectorConfig {
    pub name: String,
    /// Provider id: `postgresql`, `mysql`, `sqlite`, `mongodb` or `sqlserver`.
    pub provider: String,
    /// Fractional-second digits of the target column.
    #[serde(default = "default_precision")]
    pub precision: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub parse: ParseConfig,
    #[serde(default)]
    pub connectors: Vec<ConnectorConfig>,
    #[serde(default)]
    pub active_connector: Option<String>,
}

impl EngineConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            fraction_overflow: self.parse.fraction_overflow,
        }
    }

    /// Builds every declared connector and selects the active one.
    ///
    /// # Errors
    /// - `Provider` / `Schema` for an unknown provider or a column precision
    ///   that cannot hold milliseconds.
    /// - `Registry` for invalid or duplicate names and an undeclared active
    ///   connector.
    pub fn build_registry(&self) -> Result<ConnectorRegistry, ConfigError> {
        let mut registry = ConnectorRegistry::new();
        for entry in &self.connectors {
            let provider =
                Provider::parse(&entry.provider).map_err(|source| ConfigError::Provider {
                    connector: entry.name.clone(),
                    source,
                })?;
            let connector = build_connector(entry.name.as_str(), provider, entry.precision)
                .map_err(|source| ConfigError::Schema {
                    connector: entry.name.clone(),
                    source,
                })?;
            registry.register(connector)?;
        }

        if let Some(active) = &self.active_connector {
            registry.select_active(active)?;
        }
        Ok(registry)
    }
}

fn default_level() -> String {
    default_log_level().to_string()
}

fn default_precision() -> u8 {
    MILLISECOND_DIGITS
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig};
    use crate::connector::capability::SchemaError;
    use crate::connector::registry::ConnectorRegistryError;
    use crate::temporal::FractionOverflow;

    #[test]
    fn empty_document_uses_defaults() {
        let config = EngineConfig::from_json_str("{}").expect("empty config");
        assert!(config.connectors.is_empty());
        assert_eq!(config.parse.fraction_overflow, FractionOverflow::Reject);
        assert!(config.logging.dir.is_none());
        assert!(config.build_registry().expect("registry").is_empty());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = EngineConfig::from_json_str(r#"{"parse":{"fraction":"truncate"}}"#)
            .expect_err("unknown key");
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn precision_defaults_to_milliseconds() {
        let config = EngineConfig::from_json_str(
            r#"{"connectors":[{"name":"pg","provider":"postgresql"}],"active_connector":"pg"}"#,
        )
        .expect("config");
        assert_eq!(config.connectors[0].precision, 3);

        let registry = config.build_registry().expect("registry");
        assert_eq!(registry.active_name(), Some("pg"));
    }

    #[test]
    fn low_precision_column_fails_at_build() {
        let config = EngineConfig::from_json_str(
            r#"{"connectors":[{"name":"legacy","provider":"mysql","precision":0}]}"#,
        )
        .expect("config");
        assert!(matches!(
            config.build_registry(),
            Err(ConfigError::Schema {
                source: SchemaError::InsufficientPrecision { digits: 0, .. },
                ..
            })
        ));
    }

    #[test]
    fn undeclared_active_connector_fails() {
        let config = EngineConfig::from_json_str(
            r#"{"connectors":[{"name":"pg","provider":"postgres"}],"active_connector":"mongo"}"#,
        )
        .expect("config");
        assert!(matches!(
            config.build_registry(),
            Err(ConfigError::Registry(ConnectorRegistryError::NotFound(_)))
        ));
    }

    #[test]
    fn padded_connector_name_is_refused() {
        let config = EngineConfig::from_json_str(
            r#"{"connectors":[{"name":" pg ","provider":"postgresql"}]}"#,
        )
        .expect("config");
        assert!(matches!(
            config.build_registry(),
            Err(ConfigError::Registry(ConnectorRegistryError::InvalidName(name))) if name == " pg "
        ));
    }

    #[test]
    fn unknown_provider_fails() {
        let config = EngineConfig::from_json_str(
            r#"{"connectors":[{"name":"ora","provider":"oracle"}]}"#,
        )
        .expect("config");
        assert!(matches!(
            config.build_registry(),
            Err(ConfigError::Provider { .. })
        ));
    }
}
