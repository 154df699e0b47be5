//! Core use-case services.
//!
//! # Responsibility
//! - Run validation before repository calls for every use case.
//! - Translate validation and storage outcomes into one error taxonomy.
//! - Keep HTTP layers decoupled from storage details.

pub mod report_service;
