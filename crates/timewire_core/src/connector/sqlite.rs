//! SQLite `DATETIME` codec.
//!
//! Writes Unix epoch milliseconds as INTEGER. Reads INTEGER milliseconds or
//! the text form SQLite itself produces with `strftime('%Y-%m-%dT%H:%M:%fZ')`.
//!
//! The backend family cannot round-trip instants before 1970-01-01, so this
//! connector declares no negative-epoch support and refuses such values in
//! both directions.

use crate::connector::capability::{ColumnPrecision, ConnectorCapabilities};
use crate::connector::{
    ensure_supported, instant_from_stored_millis, Connector, Provider, StorageValue,
};
use crate::error::{TemporalError, TemporalResult};
use crate::model::civil::MAX_YEAR;
use crate::model::instant::Instant;
use crate::temporal::parse;

const SQLITE_MIN_YEAR: i32 = 1970;

pub struct SqliteConnector {
    name: String,
    precision: ColumnPrecision,
}

impl SqliteConnector {
    pub fn new(name: impl Into<String>, precision: ColumnPrecision) -> Self {
        Self {
            name: name.into(),
            precision,
        }
    }
}

impl Connector for SqliteConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn provider(&self) -> Provider {
        Provider::Sqlite
    }

    fn capabilities(&self) -> ConnectorCapabilities {
        ConnectorCapabilities {
            negative_epoch: false,
            min_year: SQLITE_MIN_YEAR,
            max_year: MAX_YEAR,
            precision: self.precision,
        }
    }

    fn encode(&self, instant: &Instant) -> TemporalResult<StorageValue> {
        ensure_supported(self, instant)?;
        Ok(StorageValue::Integer(instant.epoch_millis()))
    }

    fn decode(&self, value: &StorageValue) -> TemporalResult<Instant> {
        let instant = match value {
            StorageValue::Integer(epoch_millis) => instant_from_stored_millis(self, *epoch_millis)?,
            StorageValue::Text(text) if text.contains(':') => parse(text)
                .map_err(|err| TemporalError::decode(&self.name, err.to_string()))?,
            StorageValue::Text(_) => {
                return Err(TemporalError::decode(
                    &self.name,
                    "text value is not a date-time",
                ));
            }
        };
        ensure_supported(self, &instant)?;
        Ok(instant)
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteConnector;
    use crate::connector::capability::{ColumnPrecision, ConnectorCapability};
    use crate::connector::{Connector, StorageValue};
    use crate::error::TemporalError;
    use crate::temporal::parse;

    fn connector() -> SqliteConnector {
        SqliteConnector::new("sqlite", ColumnPrecision::MILLIS)
    }

    #[test]
    fn encodes_epoch_millis() {
        let instant = parse("1979-01-01T10:33:59.828Z").expect("valid");
        assert_eq!(
            connector().encode(&instant),
            Ok(StorageValue::Integer(284_034_839_828))
        );
    }

    #[test]
    fn refuses_to_encode_pre_epoch_values() {
        let instant = parse("1969-01-01T10:33:59Z").expect("valid");
        assert_eq!(
            connector().encode(&instant),
            Err(TemporalError::CapabilityViolation {
                connector: "sqlite".to_string(),
                capability: ConnectorCapability::NegativeEpoch,
            })
        );
    }

    #[test]
    fn refuses_to_decode_pre_epoch_values() {
        let err = connector()
            .decode(&StorageValue::Integer(-31_497_961_000))
            .expect_err("negative stored value");
        assert!(matches!(err, TemporalError::CapabilityViolation { .. }));

        let err = connector()
            .decode(&StorageValue::Text("1969-01-01T10:33:59.000Z".to_string()))
            .expect_err("pre-epoch text value");
        assert!(matches!(err, TemporalError::CapabilityViolation { .. }));
    }

    #[test]
    fn decodes_sqlite_strftime_text() {
        let decoded = connector()
            .decode(&StorageValue::Text("1979-01-01T10:33:59.828Z".to_string()))
            .expect("text form");
        assert_eq!(decoded.epoch_millis(), 284_034_839_828);

        assert!(matches!(
            connector().decode(&StorageValue::Text("2440587.5".to_string())),
            Err(TemporalError::DecodeError { .. })
        ));
    }

    #[test]
    fn epoch_itself_is_supported() {
        let instant = parse("1970-01-01T00:00:00Z").expect("valid");
        let encoded = connector().encode(&instant).expect("epoch encodes");
        assert_eq!(connector().decode(&encoded), Ok(instant));
    }
}
