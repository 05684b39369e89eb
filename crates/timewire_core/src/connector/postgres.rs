//! PostgreSQL `TIMESTAMP(p)` codec.
//!
//! Values travel as the binary wire form: signed microseconds relative to
//! 2000-01-01T00:00:00Z.

use crate::connector::capability::{ColumnPrecision, ConnectorCapabilities};
use crate::connector::{
    ensure_supported, instant_from_stored_millis, Connector, Provider, StorageValue,
};
use crate::error::{TemporalError, TemporalResult};
use crate::model::instant::Instant;

/// 2000-01-01T00:00:00Z in Unix seconds.
const POSTGRES_EPOCH_UNIX_SECONDS: i64 = 946_684_800;
const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_MILLI: i64 = 1_000;

pub struct PostgresConnector {
    name: String,
    precision: ColumnPrecision,
}

impl PostgresConnector {
    pub fn new(name: impl Into<String>, precision: ColumnPrecision) -> Self {
        Self {
            name: name.into(),
            precision,
        }
    }
}

impl Connector for PostgresConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn provider(&self) -> Provider {
        Provider::Postgres
    }

    fn capabilities(&self) -> ConnectorCapabilities {
        ConnectorCapabilities {
            precision: self.precision,
            ..ConnectorCapabilities::default()
        }
    }

    fn encode(&self, instant: &Instant) -> TemporalResult<StorageValue> {
        ensure_supported(self, instant)?;
        let micros = (instant.epoch_seconds() - POSTGRES_EPOCH_UNIX_SECONDS) * MICROS_PER_SECOND
            + i64::from(instant.millis()) * MICROS_PER_MILLI;
        Ok(StorageValue::Integer(micros))
    }

    fn decode(&self, value: &StorageValue) -> TemporalResult<Instant> {
        let micros = match value {
            StorageValue::Integer(micros) => *micros,
            StorageValue::Text(_) => {
                return Err(TemporalError::decode(
                    &self.name,
                    "expected integer microseconds, found text",
                ));
            }
        };

        if micros.rem_euclid(MICROS_PER_MILLI) != 0 {
            return Err(TemporalError::decode(
                &self.name,
                format!("{micros}us carries sub-millisecond data"),
            ));
        }

        let epoch_millis = micros
            .div_euclid(MICROS_PER_MILLI)
            .checked_add(POSTGRES_EPOCH_UNIX_SECONDS * 1_000)
            .ok_or_else(|| TemporalError::decode(&self.name, format!("{micros}us overflows")))?;
        let instant = instant_from_stored_millis(self, epoch_millis)?;
        ensure_supported(self, &instant)?;
        Ok(instant)
    }
}

#[cfg(test)]
mod tests {
    use super::PostgresConnector;
    use crate::connector::capability::ColumnPrecision;
    use crate::connector::{Connector, StorageValue};
    use crate::error::TemporalError;
    use crate::temporal::parse;

    fn connector() -> PostgresConnector {
        PostgresConnector::new("pg", ColumnPrecision::MILLIS)
    }

    #[test]
    fn encodes_relative_to_2000() {
        let instant = parse("2000-01-01T00:00:00.001Z").expect("valid");
        assert_eq!(connector().encode(&instant), Ok(StorageValue::Integer(1_000)));
    }

    #[test]
    fn pre_1970_values_keep_sign_and_magnitude() {
        let instant = parse("1969-01-01T10:33:59.828Z").expect("valid");
        let encoded = connector().encode(&instant).expect("encode");
        let expected_micros = (-31_497_961 - 946_684_800) * 1_000_000 + 828_000;
        assert_eq!(encoded, StorageValue::Integer(expected_micros));
        assert_eq!(connector().decode(&encoded), Ok(instant));
    }

    #[test]
    fn rejects_sub_millisecond_values() {
        let err = connector()
            .decode(&StorageValue::Integer(1_500))
            .expect_err("1.5ms cannot be represented");
        assert!(matches!(err, TemporalError::DecodeError { .. }));

        let err = connector()
            .decode(&StorageValue::Integer(-1))
            .expect_err("negative sub-millisecond value");
        assert!(matches!(err, TemporalError::DecodeError { .. }));
    }

    #[test]
    fn rejects_text_and_out_of_range_values() {
        assert!(matches!(
            connector().decode(&StorageValue::Text("2000-01-01".to_string())),
            Err(TemporalError::DecodeError { .. })
        ));
        assert!(matches!(
            connector().decode(&StorageValue::Integer(i64::MAX - 807)),
            Err(TemporalError::DecodeError { .. })
        ));
    }
}
