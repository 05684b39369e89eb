//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for stored temporal columns.
//! - Isolate SQLite query details from the field service.
//!
//! # Invariants
//! - Repositories persist opaque `StorageValue`s and never interpret them.
//! - Repository APIs return semantic errors (`NotFound`, `AlreadyExists`) in
//!   addition to DB transport errors.

pub mod column_repo;
