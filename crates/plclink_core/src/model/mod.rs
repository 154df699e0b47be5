//! Gateway report domain model.
//!
//! # Responsibility
//! - Define the persisted report record and its write-side input.
//! - Validate loosely-typed inbound candidates before they reach storage.
//!
//! # Invariants
//! - A `NewReport` can only be obtained through validation.
//! - Persisted reports are identified by a store-assigned `ReportId`.

pub mod candidate;
pub mod report;
