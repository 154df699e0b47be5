//! Gateway report use-case service.
//!
//! # Responsibility
//! - Provide the ingestion, read, update, delete and status-confirmation
//!   entry points used by transport layers.
//! - Delegate persistence to a `ReportStore` implementation.
//!
//! # Invariants
//! - No candidate reaches the store without passing validation.
//! - Service layer remains storage-agnostic.
//! - Report payloads are never written to logs; only ids and sizes.

use crate::model::candidate::{
    GatewayStatus, GatewayStatusCandidate, ReportCandidate, ReportValidationError,
};
use crate::model::report::{GatewayReport, NewReport, ReportId};
use crate::repo::report_repo::{RepoError, ReportStore};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error taxonomy surfaced to transport layers.
#[derive(Debug)]
pub enum ServiceError {
    /// Client omitted required inputs on an ingestion path.
    MissingRequiredField(Vec<&'static str>),
    /// Input was present but malformed (or any rejected update input).
    Validation(ReportValidationError),
    NotFound(ReportId),
    /// Underlying persistence failure.
    Storage(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredField(fields) => {
                write!(f, "missing required field(s): {}", fields.join(", "))
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "report not found: {id}"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::MissingRequiredField(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

impl From<ReportValidationError> for ServiceError {
    fn from(value: ReportValidationError) -> Self {
        match value {
            ReportValidationError::MissingRequiredField(fields) => {
                Self::MissingRequiredField(fields)
            }
            invalid @ ReportValidationError::InvalidField { .. } => Self::Validation(invalid),
        }
    }
}

/// Use-case service wrapper for report operations.
pub struct ReportService<S: ReportStore> {
    store: S,
}

impl<S: ReportStore> ReportService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates an inbound candidate and persists it as a new report.
    ///
    /// # Contract
    /// - Rejects before any storage call when `gatewayID` or `state` is
    ///   missing.
    /// - Every successful call creates a new record with a new id.
    pub fn ingest(&self, candidate: ReportCandidate) -> ServiceResult<GatewayReport> {
        let report = candidate.validate().inspect_err(|err| {
            warn!("event=report_ingest module=service status=rejected reason=\"{err}\"");
        })?;
        self.create_report(&report)
    }

    /// Persists an already-validated report.
    pub fn create_report(&self, report: &NewReport) -> ServiceResult<GatewayReport> {
        let created = self.store.create_report(report).inspect_err(|err| {
            warn!("event=report_create module=service status=error error={err}");
        })?;
        info!(
            "event=report_create module=service status=ok id={} gateway_id={} data_bytes={}",
            created.id,
            created.gateway_id,
            created.data.to_string().len()
        );
        Ok(created)
    }

    /// Lists every stored report.
    pub fn list_reports(&self) -> ServiceResult<Vec<GatewayReport>> {
        Ok(self.store.list_reports()?)
    }

    /// Gets one report by id.
    pub fn get_report(&self, id: ReportId) -> ServiceResult<GatewayReport> {
        Ok(self.store.get_report(id)?)
    }

    /// Replaces `gatewayID`/`state` of an existing report.
    ///
    /// Any rejected input surfaces as `ServiceError::Validation`, including
    /// missing fields.
    pub fn update_report(
        &self,
        id: ReportId,
        candidate: ReportCandidate,
    ) -> ServiceResult<GatewayReport> {
        let report = candidate.validate().map_err(|err| {
            warn!("event=report_update module=service status=rejected id={id} reason=\"{err}\"");
            ServiceError::Validation(err)
        })?;
        let updated = self.store.update_report(id, &report)?;
        info!(
            "event=report_update module=service status=ok id={} gateway_id={}",
            updated.id, updated.gateway_id
        );
        Ok(updated)
    }

    /// Deletes one report by id. Deleting twice yields `NotFound`.
    pub fn delete_report(&self, id: ReportId) -> ServiceResult<()> {
        self.store.delete_report(id)?;
        info!("event=report_delete module=service status=ok id={id}");
        Ok(())
    }
}

/// Validates a liveness confirmation without touching storage.
pub fn confirm_status(candidate: GatewayStatusCandidate) -> ServiceResult<GatewayStatus> {
    let status = candidate.validate()?;
    info!("event=status_confirm module=service status=ok");
    Ok(status)
}
