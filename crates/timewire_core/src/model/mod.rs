//! Temporal domain model.
//!
//! # Responsibility
//! - Define the canonical `Instant` every literal and storage value maps to.
//! - Provide calendar arithmetic shared by parsing and formatting.
//! - Identify stored temporal fields on records.
//!
//! # Invariants
//! - `Instant` is a value type; records never share one by reference.
//! - Supported calendar range is 0000-01-01..=9999-12-31, UTC only.

pub mod civil;
pub mod column;
pub mod instant;
