//! Canonical output serializer: `YYYY-MM-DDTHH:MM:SS.mmmZ`.

use crate::model::instant::Instant;
use std::fmt::Write;

/// Length of every canonical literal.
pub const CANONICAL_LEN: usize = 24;

/// chrono pattern for `YYYY-MM-DDTHH:MM:SS.mmmZ`; `%Y` zero-pads years 0-9999.
const CANONICAL_PATTERN: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Renders an instant at fixed millisecond precision in UTC.
pub fn format(instant: &Instant) -> String {
    let mut out = String::with_capacity(CANONICAL_LEN);
    // Writing into a `String` cannot fail.
    let _ = write_canonical(&mut out, instant);
    out
}

pub(crate) fn write_canonical<W: Write>(out: &mut W, instant: &Instant) -> std::fmt::Result {
    write!(out, "{}", instant.as_utc().format(CANONICAL_PATTERN))
}

#[cfg(test)]
mod tests {
    use super::{format, CANONICAL_LEN};
    use crate::model::instant::{Instant, MAX_EPOCH_SECONDS, MIN_EPOCH_SECONDS};

    #[test]
    fn epoch_zero() {
        let instant = Instant::new(0, 0).expect("epoch");
        assert_eq!(format(&instant), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn pre_epoch_values_decompose_on_the_right_day() {
        let cases = [
            (-1, 0, "1969-12-31T23:59:59.000Z"),
            (-1, 999, "1969-12-31T23:59:59.999Z"),
            (-86_400, 0, "1969-12-31T00:00:00.000Z"),
            (-86_401, 1, "1969-12-30T23:59:59.001Z"),
            (-31_497_961, 828, "1969-01-01T10:33:59.828Z"),
            (-31_536_000, 0, "1969-01-01T00:00:00.000Z"),
        ];
        for (seconds, millis, expected) in cases {
            let instant = Instant::new(seconds, millis).expect("supported");
            assert_eq!(format(&instant), expected, "seconds={seconds}");
        }
    }

    #[test]
    fn post_epoch_values() {
        let instant = Instant::new(284_034_839, 0).expect("1979 value");
        assert_eq!(format(&instant), "1979-01-01T10:33:59.000Z");
        let instant = Instant::new(951_782_400, 50).expect("leap day");
        assert_eq!(format(&instant), "2000-02-29T00:00:00.050Z");
    }

    #[test]
    fn range_bounds_keep_four_digit_years() {
        let min = Instant::new(MIN_EPOCH_SECONDS, 0).expect("min");
        assert_eq!(format(&min), "0000-01-01T00:00:00.000Z");
        let max = Instant::new(MAX_EPOCH_SECONDS, 999).expect("max");
        assert_eq!(format(&max), "9999-12-31T23:59:59.999Z");
        assert_eq!(format(&max).len(), CANONICAL_LEN);
    }

    #[test]
    fn display_matches_format() {
        let instant = Instant::from_epoch_millis(-31_497_960_172).expect("1969 value");
        assert_eq!(instant.to_string(), format(&instant));
    }
}
