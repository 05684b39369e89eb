//! Connector capability declarations and column precision rules.
//!
//! # Responsibility
//! - Describe what a storage backend can round-trip (sign, year range,
//!   fractional precision).
//! - Reject column definitions that would lose millisecond data at
//!   schema-setup time.
//!
//! # Invariants
//! - A column precision below milliseconds is never accepted.
//! - Capability checks are declared once per connector, not at call sites.

use crate::connector::Provider;
use crate::model::civil::{MAX_YEAR, MIN_YEAR};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fractional-second digits needed to hold milliseconds.
pub const MILLISECOND_DIGITS: u8 = 3;

/// A capability a connector may lack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConnectorCapability {
    /// Round-tripping instants before 1970-01-01T00:00:00Z.
    NegativeEpoch,
}

impl ConnectorCapability {
    /// Stable string id used in errors and log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NegativeEpoch => "negative_epoch",
        }
    }

    /// User-facing short description.
    pub fn description(self) -> &'static str {
        match self {
            Self::NegativeEpoch => "Store and read back date-times before 1970-01-01.",
        }
    }
}

/// What one configured connector can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorCapabilities {
    pub negative_epoch: bool,
    pub min_year: i32,
    pub max_year: i32,
    pub precision: ColumnPrecision,
}

impl ConnectorCapabilities {
    pub fn supports(&self, capability: ConnectorCapability) -> bool {
        match capability {
            ConnectorCapability::NegativeEpoch => self.negative_epoch,
        }
    }

    pub fn supports_year(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }
}

impl Default for ConnectorCapabilities {
    fn default() -> Self {
        Self {
            negative_epoch: true,
            min_year: MIN_YEAR,
            max_year: MAX_YEAR,
            precision: ColumnPrecision::MILLIS,
        }
    }
}

/// Fractional-second digits of a temporal column, e.g. `TIMESTAMP(3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnPrecision(u8);

impl ColumnPrecision {
    pub const MILLIS: Self = Self(MILLISECOND_DIGITS);

    /// Validates `digits` for a provider's column type.
    ///
    /// # Errors
    /// - `UnsupportedPrecision` above the provider maximum.
    /// - `InsufficientPrecision` below millisecond digits.
    pub fn for_provider(provider: Provider, digits: u8) -> Result<Self, SchemaError> {
        let max = provider.max_precision();
        if digits > max {
            return Err(SchemaError::UnsupportedPrecision {
                provider,
                digits,
                max,
            });
        }
        if digits < MILLISECOND_DIGITS {
            return Err(SchemaError::InsufficientPrecision { provider, digits });
        }
        Ok(Self(digits))
    }

    pub fn digits(self) -> u8 {
        self.0
    }
}

/// Column definitions the engine refuses at setup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaError {
    /// Column would silently drop millisecond data.
    InsufficientPrecision { provider: Provider, digits: u8 },
    UnsupportedPrecision {
        provider: Provider,
        digits: u8,
        max: u8,
    },
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientPrecision { provider, digits } => write!(
                f,
                "{} column precision {digits} cannot hold milliseconds (need at least {MILLISECOND_DIGITS})",
                provider.as_str()
            ),
            Self::UnsupportedPrecision {
                provider,
                digits,
                max,
            } => write!(
                f,
                "{} does not support column precision {digits} (max {max})",
                provider.as_str()
            ),
        }
    }
}

impl Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::{
        ColumnPrecision, ConnectorCapabilities, ConnectorCapability, SchemaError,
        MILLISECOND_DIGITS,
    };
    use crate::connector::Provider;

    #[test]
    fn whole_second_columns_are_rejected() {
        let err = ColumnPrecision::for_provider(Provider::Postgres, 0)
            .expect_err("TIMESTAMP(0) loses milliseconds");
        assert_eq!(
            err,
            SchemaError::InsufficientPrecision {
                provider: Provider::Postgres,
                digits: 0
            }
        );
        assert!(err.to_string().contains("milliseconds"));
    }

    #[test]
    fn precision_above_provider_max_is_rejected() {
        let err = ColumnPrecision::for_provider(Provider::MongoDb, 6)
            .expect_err("BSON dates hold milliseconds only");
        assert!(matches!(err, SchemaError::UnsupportedPrecision { max: 3, .. }));
    }

    #[test]
    fn accepts_millisecond_and_finer_precision() {
        for digits in MILLISECOND_DIGITS..=6 {
            let precision =
                ColumnPrecision::for_provider(Provider::MySql, digits).expect("valid precision");
            assert_eq!(precision.digits(), digits);
        }
    }

    #[test]
    fn capabilities_answer_capability_queries() {
        let mut capabilities = ConnectorCapabilities::default();
        assert!(capabilities.supports(ConnectorCapability::NegativeEpoch));
        assert!(capabilities.supports_year(0));
        assert!(capabilities.supports_year(9999));

        capabilities.negative_epoch = false;
        capabilities.min_year = 1970;
        assert!(!capabilities.supports(ConnectorCapability::NegativeEpoch));
        assert!(!capabilities.supports_year(1969));
    }

    #[test]
    fn exposes_user_facing_descriptions() {
        assert!(ConnectorCapability::NegativeEpoch
            .description()
            .contains("1970"));
        assert_eq!(ConnectorCapability::NegativeEpoch.as_str(), "negative_epoch");
    }
}
