//! MongoDB BSON date codec: signed 64-bit Unix epoch milliseconds.

use crate::connector::capability::{ColumnPrecision, ConnectorCapabilities};
use crate::connector::{
    ensure_supported, instant_from_stored_millis, Connector, Provider, StorageValue,
};
use crate::error::{TemporalError, TemporalResult};
use crate::model::instant::Instant;

pub struct MongoDbConnector {
    name: String,
    precision: ColumnPrecision,
}

impl MongoDbConnector {
    pub fn new(name: impl Into<String>, precision: ColumnPrecision) -> Self {
        Self {
            name: name.into(),
            precision,
        }
    }
}

impl Connector for MongoDbConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn provider(&self) -> Provider {
        Provider::MongoDb
    }

    fn capabilities(&self) -> ConnectorCapabilities {
        ConnectorCapabilities {
            precision: self.precision,
            ..ConnectorCapabilities::default()
        }
    }

    fn encode(&self, instant: &Instant) -> TemporalResult<StorageValue> {
        ensure_supported(self, instant)?;
        Ok(StorageValue::Integer(instant.epoch_millis()))
    }

    fn decode(&self, value: &StorageValue) -> TemporalResult<Instant> {
        let StorageValue::Integer(epoch_millis) = value else {
            return Err(TemporalError::decode(
                &self.name,
                "expected BSON date milliseconds, found text",
            ));
        };
        let instant = instant_from_stored_millis(self, *epoch_millis)?;
        ensure_supported(self, &instant)?;
        Ok(instant)
    }
}

#[cfg(test)]
mod tests {
    use super::MongoDbConnector;
    use crate::connector::capability::ColumnPrecision;
    use crate::connector::{Connector, StorageValue};
    use crate::error::TemporalError;
    use crate::temporal::parse;

    fn connector() -> MongoDbConnector {
        MongoDbConnector::new("mongo", ColumnPrecision::MILLIS)
    }

    #[test]
    fn pre_epoch_millis_are_negative() {
        let instant = parse("1969-01-01T10:33:59.828Z").expect("valid");
        let encoded = connector().encode(&instant).expect("encode");
        assert_eq!(encoded, StorageValue::Integer(-31_497_960_172));
        assert_eq!(connector().decode(&encoded), Ok(instant));
    }

    #[test]
    fn decode_rejects_values_past_year_9999() {
        let err = connector()
            .decode(&StorageValue::Integer(253_402_300_800_000))
            .expect_err("year 10000");
        assert!(matches!(err, TemporalError::DecodeError { .. }));
    }
}
