//! MySQL `DATETIME(p)` codec.
//!
//! Values travel as text `YYYY-MM-DD HH:MM:SS[.f{p}]`. The column type only
//! covers years 1000-9999.

use crate::connector::capability::{ColumnPrecision, ConnectorCapabilities};
use crate::connector::{datetime_text, Connector, Provider, StorageValue};
use crate::error::{TemporalError, TemporalResult};
use crate::model::civil::MAX_YEAR;
use crate::model::instant::Instant;

const MYSQL_MIN_YEAR: i32 = 1000;

pub struct MySqlConnector {
    name: String,
    precision: ColumnPrecision,
}

impl MySqlConnector {
    pub fn new(name: impl Into<String>, precision: ColumnPrecision) -> Self {
        Self {
            name: name.into(),
            precision,
        }
    }
}

impl Connector for MySqlConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn provider(&self) -> Provider {
        Provider::MySql
    }

    fn capabilities(&self) -> ConnectorCapabilities {
        ConnectorCapabilities {
            negative_epoch: true,
            min_year: MYSQL_MIN_YEAR,
            max_year: MAX_YEAR,
            precision: self.precision,
        }
    }

    fn encode(&self, instant: &Instant) -> TemporalResult<StorageValue> {
        datetime_text::encode(self, instant).map(StorageValue::Text)
    }

    fn decode(&self, value: &StorageValue) -> TemporalResult<Instant> {
        match value {
            StorageValue::Text(text) => datetime_text::decode(self, "DATETIME", text),
            StorageValue::Integer(_) => Err(TemporalError::decode(
                &self.name,
                "expected DATETIME text, found integer",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MySqlConnector;
    use crate::connector::capability::{ColumnPrecision, ConnectorCapability};
    use crate::connector::{Connector, Provider, StorageValue};
    use crate::error::TemporalError;
    use crate::temporal::parse;

    fn connector(digits: u8) -> MySqlConnector {
        let precision =
            ColumnPrecision::for_provider(Provider::MySql, digits).expect("valid precision");
        MySqlConnector::new("mysql", precision)
    }

    #[test]
    fn encodes_padded_to_column_precision() {
        let instant = parse("1969-01-01T10:33:59.828Z").expect("valid");
        assert_eq!(
            connector(3).encode(&instant),
            Ok(StorageValue::Text("1969-01-01 10:33:59.828".to_string()))
        );
        assert_eq!(
            connector(6).encode(&instant),
            Ok(StorageValue::Text("1969-01-01 10:33:59.828000".to_string()))
        );
    }

    #[test]
    fn decodes_short_and_padded_fractions() {
        let expected = parse("1969-01-01T10:33:59.800Z").expect("valid");
        for text in [
            "1969-01-01 10:33:59.8",
            "1969-01-01 10:33:59.800",
            "1969-01-01 10:33:59.800000",
        ] {
            let decoded = connector(6)
                .decode(&StorageValue::Text(text.to_string()))
                .expect("decode");
            assert_eq!(decoded, expected, "{text}");
        }

        let whole = connector(3)
            .decode(&StorageValue::Text("1979-01-01 10:33:59".to_string()))
            .expect("decode");
        assert_eq!(whole.millis(), 0);
    }

    #[test]
    fn rejects_sub_millisecond_and_invalid_text() {
        for text in [
            "1969-01-01 10:33:59.828001",
            "1969-02-30 10:33:59",
            "1969-01-01T10:33:59",
            "not a date",
        ] {
            let err = connector(6)
                .decode(&StorageValue::Text(text.to_string()))
                .expect_err("must fail");
            assert!(matches!(err, TemporalError::DecodeError { .. }), "{text}");
        }
    }

    #[test]
    fn years_before_1000_are_out_of_backend_range() {
        let instant = parse("0999-12-31T23:59:59Z").expect("valid literal");
        assert_eq!(
            connector(3).encode(&instant),
            Err(TemporalError::OutOfBackendRange {
                connector: "mysql".to_string(),
                year: 999
            })
        );
    }

    #[test]
    fn supports_negative_epoch() {
        let connector = connector(3);
        assert!(connector.supports_negative_epoch());
        assert!(connector
            .capabilities()
            .supports(ConnectorCapability::NegativeEpoch));
    }
}
