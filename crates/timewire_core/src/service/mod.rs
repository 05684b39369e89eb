//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate parse, codec and repository calls into field-level APIs.
//! - Keep CLI and embedding layers decoupled from storage details.

pub mod field_service;
