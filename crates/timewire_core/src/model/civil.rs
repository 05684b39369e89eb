//! Broken-down UTC date-time fields.
//!
//! # Responsibility
//! - Carry year/month/day/time fields between literal text and `Instant`.
//! - Classify invalid fields before handing them to chrono's proleptic
//!   Gregorian calendar.
//!
//! # Invariants
//! - Calendar arithmetic (leap years, epoch offsets) is delegated to chrono.
//! - Range policy (0000-9999) is enforced by `Instant`, not here.

use crate::error::{DateTimeField, MalformedReason};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};

pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 9999;

/// Broken-down UTC date-time with millisecond fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDateTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millis: u16,
}

impl CivilDateTime {
    /// Checks every field and builds the matching chrono value.
    ///
    /// # Errors
    /// - `FieldOutOfRange` naming the first field outside its fixed bounds.
    /// - `NonexistentDate` for a day the month does not have in that year.
    pub fn to_naive(&self) -> Result<NaiveDateTime, MalformedReason> {
        if !(1..=12).contains(&self.month) {
            return Err(MalformedReason::FieldOutOfRange(DateTimeField::Month));
        }
        if !(1..=31).contains(&self.day) {
            return Err(MalformedReason::FieldOutOfRange(DateTimeField::Day));
        }
        let date = NaiveDate::from_ymd_opt(self.year, u32::from(self.month), u32::from(self.day))
            .ok_or(MalformedReason::NonexistentDate)?;

        if self.hour > 23 {
            return Err(MalformedReason::FieldOutOfRange(DateTimeField::Hour));
        }
        if self.minute > 59 {
            return Err(MalformedReason::FieldOutOfRange(DateTimeField::Minute));
        }
        if self.second > 59 {
            return Err(MalformedReason::FieldOutOfRange(DateTimeField::Second));
        }
        if self.millis > 999 {
            return Err(MalformedReason::FieldOutOfRange(DateTimeField::Fraction));
        }
        date.and_hms_milli_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
            u32::from(self.millis),
        )
        .ok_or(MalformedReason::FieldOutOfRange(DateTimeField::Fraction))
    }

    pub(crate) fn from_utc(value: &DateTime<Utc>) -> Self {
        Self {
            year: value.year(),
            month: value.month() as u8,
            day: value.day() as u8,
            hour: value.hour() as u8,
            minute: value.minute() as u8,
            second: value.second() as u8,
            millis: value.timestamp_subsec_millis() as u16,
        }
    }
}
