//! Literal parsing and canonical formatting.
//!
//! # Responsibility
//! - Turn extended date-time literals into `Instant` values.
//! - Render `Instant` values in the fixed-precision output format.
//!
//! # Invariants
//! - Input must carry the `Z` designator; output always carries it.
//! - Output always has exactly three fractional digits.

pub mod format;
pub mod parser;

pub use format::format;
pub use parser::{parse, parse_with, FractionOverflow, ParseOptions};
