//! Canonical UTC instant.
//!
//! # Responsibility
//! - Hold the normalized value every literal and storage value converges to.
//! - Enforce the supported calendar range at construction time.
//!
//! # Invariants
//! - The wrapped chrono value lies within
//!   0000-01-01T00:00:00Z..=9999-12-31T23:59:59.999Z.
//! - The sub-second part is a whole number of milliseconds; no leap seconds.
//! - Equality, ordering and hashing ignore `year_digits`.

use crate::error::{TemporalError, TemporalResult};
use crate::model::civil::{CivilDateTime, MAX_YEAR, MIN_YEAR};
use crate::temporal::{format, parse};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// 0000-01-01T00:00:00Z.
pub const MIN_EPOCH_SECONDS: i64 = -62_167_219_200;
/// 9999-12-31T23:59:59Z.
pub const MAX_EPOCH_SECONDS: i64 = 253_402_300_799;

const CANONICAL_YEAR_DIGITS: u8 = 4;
const NANOS_PER_MILLI: u32 = 1_000_000;
const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// UTC point in time at millisecond precision.
#[derive(Debug, Clone, Copy)]
pub struct Instant {
    utc: DateTime<Utc>,
    year_digits: u8,
}

impl Instant {
    /// Builds an instant from an epoch offset and millisecond fraction.
    ///
    /// # Errors
    /// - `FractionOutOfRange` when `millis > 999`.
    /// - `UnsupportedYearRange` / `UnsupportedCalendarRange` outside 0000-9999.
    pub fn new(epoch_seconds: i64, millis: u16) -> TemporalResult<Self> {
        let nanos = u32::from(millis).saturating_mul(NANOS_PER_MILLI);
        if nanos >= NANOS_PER_SECOND {
            return Err(TemporalError::FractionOutOfRange { nanos });
        }
        let utc = DateTime::from_timestamp(epoch_seconds, nanos)
            .ok_or_else(|| beyond_calendar(epoch_seconds < 0))?;
        Self::from_utc(utc)
    }

    /// Builds an instant from signed milliseconds since the Unix epoch.
    pub fn from_epoch_millis(epoch_millis: i64) -> TemporalResult<Self> {
        let utc = DateTime::from_timestamp_millis(epoch_millis)
            .ok_or_else(|| beyond_calendar(epoch_millis < 0))?;
        Self::from_utc(utc)
    }

    /// Builds an instant from a UTC calendar value.
    ///
    /// # Errors
    /// - `FractionOutOfRange` for leap seconds or sub-millisecond fractions.
    /// - `UnsupportedYearRange` / `UnsupportedCalendarRange` outside 0000-9999.
    pub fn from_naive(naive: &NaiveDateTime) -> TemporalResult<Self> {
        let nanos = naive.nanosecond();
        if nanos >= NANOS_PER_SECOND || nanos % NANOS_PER_MILLI != 0 {
            return Err(TemporalError::FractionOutOfRange { nanos });
        }
        Self::from_utc(naive.and_utc())
    }

    fn from_utc(utc: DateTime<Utc>) -> TemporalResult<Self> {
        let year = utc.year();
        if year < MIN_YEAR {
            return Err(TemporalError::UnsupportedCalendarRange {
                year: year.to_string(),
            });
        }
        if year > MAX_YEAR {
            return Err(TemporalError::UnsupportedYearRange {
                year: year.to_string(),
            });
        }
        Ok(Self {
            utc,
            year_digits: CANONICAL_YEAR_DIGITS,
        })
    }

    pub(crate) fn with_year_digits(mut self, year_digits: u8) -> Self {
        self.year_digits = year_digits;
        self
    }

    /// Signed seconds relative to 1970-01-01T00:00:00Z.
    pub fn epoch_seconds(&self) -> i64 {
        self.utc.timestamp()
    }

    /// Sub-second fraction in milliseconds, counted forward from
    /// `epoch_seconds` even before the epoch.
    pub fn millis(&self) -> u16 {
        self.utc.timestamp_subsec_millis() as u16
    }

    /// Digits in the year component of the literal this instant came from.
    pub fn year_digits(&self) -> u8 {
        self.year_digits
    }

    /// Signed milliseconds relative to the Unix epoch.
    pub fn epoch_millis(&self) -> i64 {
        self.utc.timestamp_millis()
    }

    pub fn is_before_epoch(&self) -> bool {
        self.utc.timestamp() < 0
    }

    pub fn year(&self) -> i32 {
        self.utc.year()
    }

    /// Civil decomposition in UTC.
    pub fn civil(&self) -> CivilDateTime {
        CivilDateTime::from_utc(&self.utc)
    }

    pub fn as_utc(&self) -> &DateTime<Utc> {
        &self.utc
    }
}

/// Error for offsets beyond chrono's own calendar, far outside 0000-9999.
fn beyond_calendar(negative: bool) -> TemporalError {
    if negative {
        TemporalError::UnsupportedCalendarRange {
            year: format!("before {}", NaiveDate::MIN.year()),
        }
    } else {
        TemporalError::UnsupportedYearRange {
            year: format!("after {}", NaiveDate::MAX.year()),
        }
    }
}

impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        self.utc == other.utc
    }
}

impl Eq for Instant {}

impl Hash for Instant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.utc.hash(state);
    }
}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Instant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.utc.cmp(&other.utc)
    }
}

impl Display for Instant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        format::write_canonical(f, self)
    }
}

impl FromStr for Instant {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl Serialize for Instant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Instant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        parse(&literal).map_err(de::Error::custom)
    }
}
