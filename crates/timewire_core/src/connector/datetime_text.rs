//! Space-separated `YYYY-MM-DD HH:MM:SS[.f]` text shared by SQL codecs.
//!
//! # Invariants
//! - Encoded text always carries at least millisecond digits, right-padded
//!   with zeros up to the column precision.
//! - Decoding accepts any fraction width chrono can read but refuses
//!   non-zero digits past the millisecond.

use crate::connector::capability::MILLISECOND_DIGITS;
use crate::connector::{ensure_supported, Connector};
use crate::error::{TemporalError, TemporalResult};
use crate::model::instant::Instant;
use chrono::NaiveDateTime;

const ENCODE_PATTERN: &str = "%Y-%m-%d %H:%M:%S%.3f";
const DECODE_PATTERN: &str = "%Y-%m-%d %H:%M:%S%.f";

pub(crate) fn encode<C: Connector + ?Sized>(
    connector: &C,
    instant: &Instant,
) -> TemporalResult<String> {
    ensure_supported(connector, instant)?;
    let mut text = instant.as_utc().format(ENCODE_PATTERN).to_string();
    // Pad to the column's declared digits, as the server echoes them.
    for _ in MILLISECOND_DIGITS..connector.capabilities().precision.digits() {
        text.push('0');
    }
    Ok(text)
}

pub(crate) fn decode<C: Connector + ?Sized>(
    connector: &C,
    type_name: &str,
    text: &str,
) -> TemporalResult<Instant> {
    let naive = NaiveDateTime::parse_from_str(text, DECODE_PATTERN).map_err(|err| {
        TemporalError::decode(connector.name(), format!("text is not a {type_name} value: {err}"))
    })?;
    // Sub-millisecond digits surface here as `FractionOutOfRange`.
    let instant = Instant::from_naive(&naive)
        .map_err(|err| TemporalError::decode(connector.name(), err.to_string()))?;
    ensure_supported(connector, &instant)?;
    Ok(instant)
}
