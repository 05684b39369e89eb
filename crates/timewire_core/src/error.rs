//! Temporal error taxonomy shared by parser, codecs and serializer.
//!
//! # Invariants
//! - Every failure is permanent; nothing in this taxonomy is retryable.
//! - Errors carry enough context (literal, connector name) for field-level
//!   reporting by callers.

use crate::connector::capability::ConnectorCapability;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TemporalResult<T> = Result<T, TemporalError>;

/// Date-time component named in field range errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeField {
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Fraction,
}

impl DateTimeField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Fraction => "fraction",
        }
    }
}

/// Why a literal could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// Separators, digit counts or characters do not match the literal grammar.
    Shape,
    /// The literal has no `Z` designator, or carries a numeric offset instead.
    MissingUtcDesignator,
    /// Year component has fewer than four digits.
    YearTooShort,
    /// More fractional digits than millisecond precision can hold.
    ExcessFractionDigits(usize),
    FieldOutOfRange(DateTimeField),
    /// Day exists in no month of that length (e.g. February 30).
    NonexistentDate,
}

impl Display for MalformedReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shape => write!(f, "expected YYYY-MM-DDTHH:MM:SS[.fff]Z"),
            Self::MissingUtcDesignator => write!(f, "UTC designator `Z` is required"),
            Self::YearTooShort => write!(f, "year must have exactly 4 digits"),
            Self::ExcessFractionDigits(digits) => write!(
                f,
                "{digits} fractional digits exceed millisecond precision (max 3)"
            ),
            Self::FieldOutOfRange(field) => write!(f, "{} is out of range", field.as_str()),
            Self::NonexistentDate => write!(f, "day does not exist in that month"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    MalformedLiteral {
        literal: String,
        reason: MalformedReason,
    },
    /// Year beyond four digits, e.g. `11979`.
    UnsupportedYearRange { year: String },
    /// Year before 0000 (BC / negative years).
    UnsupportedCalendarRange { year: String },
    /// Sub-second part that is not a whole millisecond in `[0, 999]`.
    FractionOutOfRange { nanos: u32 },
    DecodeError { connector: String, message: String },
    CapabilityViolation {
        connector: String,
        capability: ConnectorCapability,
    },
    /// Year the backend column type cannot hold.
    OutOfBackendRange { connector: String, year: i32 },
}

impl TemporalError {
    pub(crate) fn malformed(literal: &str, reason: MalformedReason) -> Self {
        Self::MalformedLiteral {
            literal: literal.to_string(),
            reason,
        }
    }

    pub(crate) fn decode(connector: &str, message: impl Into<String>) -> Self {
        Self::DecodeError {
            connector: connector.to_string(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedLiteral { .. } => "malformed_literal",
            Self::UnsupportedYearRange { .. } => "unsupported_year_range",
            Self::UnsupportedCalendarRange { .. } => "unsupported_calendar_range",
            Self::FractionOutOfRange { .. } => "fraction_out_of_range",
            Self::DecodeError { .. } => "decode_error",
            Self::CapabilityViolation { .. } => "capability_violation",
            Self::OutOfBackendRange { .. } => "out_of_backend_range",
        }
    }
}

impl Display for TemporalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedLiteral { literal, reason } => {
                write!(f, "malformed date-time literal `{literal}`: {reason}")
            }
            Self::UnsupportedYearRange { year } => write!(
                f,
                "year `{year}` is outside the supported 4-digit range 0000-9999"
            ),
            Self::UnsupportedCalendarRange { year } => write!(
                f,
                "year `{year}` is before 0000; BC dates are not supported"
            ),
            Self::FractionOutOfRange { nanos } => write!(
                f,
                "sub-second fraction of {nanos}ns is not a whole millisecond in 0-999"
            ),
            Self::DecodeError { connector, message } => {
                write!(f, "connector `{connector}` failed to decode value: {message}")
            }
            Self::CapabilityViolation {
                connector,
                capability,
            } => write!(
                f,
                "connector `{connector}` does not support {}",
                capability.as_str()
            ),
            Self::OutOfBackendRange { connector, year } => write!(
                f,
                "year {year:04} is outside the range supported by connector `{connector}`"
            ),
        }
    }
}

impl Error for TemporalError {}

#[cfg(test)]
mod tests {
    use super::{MalformedReason, TemporalError};
    use crate::connector::capability::ConnectorCapability;

    #[test]
    fn messages_name_the_offending_input() {
        let err = TemporalError::UnsupportedYearRange {
            year: "11979".to_string(),
        };
        assert!(err.to_string().contains("11979"));

        let err = TemporalError::malformed("1979-01-01", MalformedReason::Shape);
        assert!(err.to_string().contains("1979-01-01"));
        assert_eq!(err.code(), "malformed_literal");
    }

    #[test]
    fn capability_violation_names_connector_and_capability() {
        let err = TemporalError::CapabilityViolation {
            connector: "legacy_sqlite".to_string(),
            capability: ConnectorCapability::NegativeEpoch,
        };
        let message = err.to_string();
        assert!(message.contains("legacy_sqlite"));
        assert!(message.contains("negative_epoch"));
    }
}
