//! In-process connector registry and active-connector selection.

use crate::connector::{Connector, StorageValue};
use crate::error::TemporalError;
use crate::model::instant::Instant;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Connector registration/selection errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorRegistryError {
    InvalidName(String),
    DuplicateName(String),
    NotFound(String),
    NoActiveConnector,
    Temporal(TemporalError),
}

impl Display for ConnectorRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(value) => write!(f, "connector name is invalid: `{value}`"),
            Self::DuplicateName(value) => write!(f, "connector already registered: `{value}`"),
            Self::NotFound(value) => write!(f, "connector not found: `{value}`"),
            Self::NoActiveConnector => write!(f, "no active connector selected"),
            Self::Temporal(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConnectorRegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Temporal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TemporalError> for ConnectorRegistryError {
    fn from(value: TemporalError) -> Self {
        Self::Temporal(value)
    }
}

/// Named connectors available to the engine.
#[derive(Default)]
pub struct ConnectorRegistry {
    connectors: BTreeMap<String, Arc<dyn Connector>>,
    active_name: Option<String>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one connector under its own name.
    ///
    /// The name is stored exactly as `Connector::name` reports it, so names
    /// with surrounding whitespace are refused rather than normalized.
    pub fn register(&mut self, connector: Arc<dyn Connector>) -> Result<(), ConnectorRegistryError> {
        let name = connector.name().to_string();
        if !is_valid_connector_name(&name) {
            return Err(ConnectorRegistryError::InvalidName(name));
        }
        if self.connectors.contains_key(name.as_str()) {
            return Err(ConnectorRegistryError::DuplicateName(name));
        }

        self.connectors.insert(name, connector);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    /// Returns sorted connector names.
    pub fn names(&self) -> Vec<String> {
        self.connectors.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Connector>> {
        self.connectors.get(name.trim()).cloned()
    }

    pub fn select_active(&mut self, name: &str) -> Result<(), ConnectorRegistryError> {
        let normalized = name.trim();
        if !self.connectors.contains_key(normalized) {
            return Err(ConnectorRegistryError::NotFound(normalized.to_string()));
        }
        self.active_name = Some(normalized.to_string());
        Ok(())
    }

    pub fn clear_active(&mut self) {
        self.active_name = None;
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active_name.as_deref()
    }

    pub fn active(&self) -> Option<Arc<dyn Connector>> {
        let name = self.active_name()?;
        self.get(name)
    }

    /// Capability query against the active connector.
    pub fn active_supports_negative_epoch(&self) -> Result<bool, ConnectorRegistryError> {
        Ok(self.require_active()?.supports_negative_epoch())
    }

    pub fn encode_active(&self, instant: &Instant) -> Result<StorageValue, ConnectorRegistryError> {
        Ok(self.require_active()?.encode(instant)?)
    }

    pub fn decode_active(&self, value: &StorageValue) -> Result<Instant, ConnectorRegistryError> {
        Ok(self.require_active()?.decode(value)?)
    }

    fn require_active(&self) -> Result<Arc<dyn Connector>, ConnectorRegistryError> {
        self.active()
            .ok_or(ConnectorRegistryError::NoActiveConnector)
    }
}

fn is_valid_connector_name(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}
