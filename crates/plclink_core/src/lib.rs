//! Core domain logic for plclink gateway-report ingestion.
//! This crate is the single source of truth for report invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{Database, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::candidate::{
    GatewayStatus, GatewayStatusCandidate, ReportCandidate, ReportValidationError,
};
pub use model::report::{GatewayReport, NewReport, ReportId};
pub use repo::report_repo::{RepoError, RepoResult, ReportStore, SqliteReportStore};
pub use service::report_service::{confirm_status, ReportService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
