//! Extended date-time literal parser.
//!
//! # Responsibility
//! - Accept `YYYY-MM-DDTHH:MM:SS[.fff]Z` and produce an `Instant`.
//! - Classify rejected input into malformed, year-range and calendar-range
//!   failures.
//!
//! # Invariants
//! - Years are exactly four digits; longer years are `UnsupportedYearRange`,
//!   signed negative years are `UnsupportedCalendarRange`.
//! - Fractions of 1-3 digits are right-padded to milliseconds; longer
//!   fractions follow `FractionOverflow` (reject unless told otherwise).
//! - Only ASCII digits are accepted in numeric fields.

use crate::error::{MalformedReason, TemporalError, TemporalResult};
use crate::logging::sanitize_for_log;
use crate::model::civil::CivilDateTime;
use crate::model::instant::Instant;
use log::warn;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;

const MILLIS_DIGITS: usize = 3;
const YEAR_DIGITS: usize = 4;
/// Longest year text echoed back inside a range error.
const MAX_REPORTED_YEAR_CHARS: usize = 12;

static LITERAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<sign>[+-])?(?P<year>[0-9]+)-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})T(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})(?:\.(?P<fraction>[0-9]+))?(?P<zone>.*)$",
    )
    .expect("valid date-time literal regex")
});

/// Policy for fractions finer than milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractionOverflow {
    /// Fail with `MalformedLiteral` / `ExcessFractionDigits`.
    #[default]
    Reject,
    /// Drop digits past the third and log a warning.
    Truncate,
}

/// Parser knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub fraction_overflow: FractionOverflow,
}

/// Parses a literal with default options (excess fraction digits rejected).
pub fn parse(literal: &str) -> TemporalResult<Instant> {
    parse_with(literal, &ParseOptions::default())
}

/// Parses a literal using explicit options.
///
/// # Errors
/// - `UnsupportedCalendarRange` for `-`-signed years.
/// - `UnsupportedYearRange` for years with five or more digits.
/// - `MalformedLiteral` for everything else that is not a valid UTC literal.
pub fn parse_with(literal: &str, options: &ParseOptions) -> TemporalResult<Instant> {
    let captures = LITERAL_RE
        .captures(literal)
        .ok_or_else(|| TemporalError::malformed(literal, MalformedReason::Shape))?;

    let year_text = &captures["year"];
    check_year(literal, captures.name("sign").map(|m| m.as_str()), year_text)?;
    check_zone(literal, &captures["zone"])?;

    let millis = parse_fraction(literal, captures.name("fraction").map(|m| m.as_str()), options)?;
    let civil = CivilDateTime {
        year: digits(year_text) as i32,
        month: two_digits(&captures, "month"),
        day: two_digits(&captures, "day"),
        hour: two_digits(&captures, "hour"),
        minute: two_digits(&captures, "minute"),
        second: two_digits(&captures, "second"),
        millis,
    };
    let naive = civil
        .to_naive()
        .map_err(|reason| TemporalError::malformed(literal, reason))?;

    Ok(Instant::from_naive(&naive)?.with_year_digits(year_text.len() as u8))
}

fn check_year(literal: &str, sign: Option<&str>, year_text: &str) -> TemporalResult<()> {
    match sign {
        Some("-") => {
            return Err(TemporalError::UnsupportedCalendarRange {
                year: format!("-{}", sanitize_for_log(year_text, MAX_REPORTED_YEAR_CHARS)),
            });
        }
        Some(_) if year_text.len() <= YEAR_DIGITS => {
            // A `+` only introduces ISO expanded (6-digit) years.
            return Err(TemporalError::malformed(literal, MalformedReason::Shape));
        }
        _ => {}
    }

    if year_text.len() > YEAR_DIGITS {
        return Err(TemporalError::UnsupportedYearRange {
            year: sanitize_for_log(year_text, MAX_REPORTED_YEAR_CHARS),
        });
    }
    if year_text.len() < YEAR_DIGITS {
        return Err(TemporalError::malformed(literal, MalformedReason::YearTooShort));
    }
    Ok(())
}

fn check_zone(literal: &str, zone: &str) -> TemporalResult<()> {
    match zone {
        "Z" => Ok(()),
        "" => Err(TemporalError::malformed(
            literal,
            MalformedReason::MissingUtcDesignator,
        )),
        other if other.starts_with(['+', '-']) => Err(TemporalError::malformed(
            literal,
            MalformedReason::MissingUtcDesignator,
        )),
        _ => Err(TemporalError::malformed(literal, MalformedReason::Shape)),
    }
}

fn parse_fraction(
    literal: &str,
    fraction: Option<&str>,
    options: &ParseOptions,
) -> TemporalResult<u16> {
    let Some(fraction) = fraction else {
        return Ok(0);
    };

    let kept = if fraction.len() > MILLIS_DIGITS {
        match options.fraction_overflow {
            FractionOverflow::Reject => {
                return Err(TemporalError::malformed(
                    literal,
                    MalformedReason::ExcessFractionDigits(fraction.len()),
                ));
            }
            FractionOverflow::Truncate => {
                warn!(
                    "event=literal_truncate module=temporal status=warn fraction_digits={} kept_digits={}",
                    fraction.len(),
                    MILLIS_DIGITS
                );
                &fraction[..MILLIS_DIGITS]
            }
        }
    } else {
        fraction
    };

    let scale = 10u16.pow((MILLIS_DIGITS - kept.len()) as u32);
    Ok(digits(kept) as u16 * scale)
}

fn two_digits(captures: &Captures<'_>, name: &str) -> u8 {
    digits(&captures[name]) as u8
}

/// Folds an ASCII digit run already matched by the literal regex.
fn digits(text: &str) -> u32 {
    text.bytes()
        .fold(0, |acc, byte| acc * 10 + u32::from(byte - b'0'))
}
