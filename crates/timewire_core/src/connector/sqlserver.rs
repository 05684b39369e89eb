//! SQL Server `DATETIME2(p)` codec.
//!
//! Values travel as text `YYYY-MM-DD HH:MM:SS.f{p}` with up to seven
//! fractional digits. The column type covers years 0001-9999, so only year
//! 0000 falls outside it.

use crate::connector::capability::{ColumnPrecision, ConnectorCapabilities};
use crate::connector::{datetime_text, Connector, Provider, StorageValue};
use crate::error::{TemporalError, TemporalResult};
use crate::model::civil::MAX_YEAR;
use crate::model::instant::Instant;

const DATETIME2_MIN_YEAR: i32 = 1;

pub struct SqlServerConnector {
    name: String,
    precision: ColumnPrecision,
}

impl SqlServerConnector {
    pub fn new(name: impl Into<String>, precision: ColumnPrecision) -> Self {
        Self {
            name: name.into(),
            precision,
        }
    }
}

impl Connector for SqlServerConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn provider(&self) -> Provider {
        Provider::SqlServer
    }

    fn capabilities(&self) -> ConnectorCapabilities {
        ConnectorCapabilities {
            negative_epoch: true,
            min_year: DATETIME2_MIN_YEAR,
            max_year: MAX_YEAR,
            precision: self.precision,
        }
    }

    fn encode(&self, instant: &Instant) -> TemporalResult<StorageValue> {
        datetime_text::encode(self, instant).map(StorageValue::Text)
    }

    fn decode(&self, value: &StorageValue) -> TemporalResult<Instant> {
        match value {
            StorageValue::Text(text) => datetime_text::decode(self, "DATETIME2", text),
            StorageValue::Integer(_) => Err(TemporalError::decode(
                &self.name,
                "expected DATETIME2 text, found integer",
            )),
        }
    }
}
