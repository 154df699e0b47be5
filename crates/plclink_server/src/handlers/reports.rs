//! Gateway report CRUD handlers
//!
//! Each handler hands its work to the report service on a blocking worker
//! and picks the fault domain that decides how storage faults are reported.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use plclink_core::{GatewayReport, ReportCandidate, ReportId};

use crate::error::{ApiError, FaultDomain, NOT_FOUND_MESSAGE};
use crate::state::AppState;

/// POST /gateway
/// Validate and persist a new report
pub async fn create_report(
    State(state): State<AppState>,
    payload: Result<Json<ReportCandidate>, JsonRejection>,
) -> Result<(StatusCode, Json<GatewayReport>), ApiError> {
    let Json(candidate) = payload?;

    let report = state
        .run_report_service(FaultDomain::Client, move |service| {
            service.ingest(candidate)
        })
        .await?;

    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /gateway
/// List every stored report
pub async fn list_reports(
    State(state): State<AppState>,
) -> Result<Json<Vec<GatewayReport>>, ApiError> {
    let reports = state
        .run_report_service(FaultDomain::Server, |service| service.list_reports())
        .await?;

    Ok(Json(reports))
}

/// GET /gateway/{id}
/// An id that is not an integer cannot name a stored report, so it is 404
pub async fn get_report(
    State(state): State<AppState>,
    id: Result<Path<ReportId>, PathRejection>,
) -> Result<Json<GatewayReport>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

    let report = state
        .run_report_service(FaultDomain::Server, move |service| service.get_report(id))
        .await?;

    Ok(Json(report))
}

/// PUT /gateway/{id}
/// Replace gatewayID/state of an existing report
pub async fn update_report(
    State(state): State<AppState>,
    id: Result<Path<ReportId>, PathRejection>,
    payload: Result<Json<ReportCandidate>, JsonRejection>,
) -> Result<Json<GatewayReport>, ApiError> {
    let Path(id) = id?;
    let Json(candidate) = payload?;

    let report = state
        .run_report_service(FaultDomain::Client, move |service| {
            service.update_report(id, candidate)
        })
        .await?;

    Ok(Json(report))
}

/// DELETE /gateway/{id}
pub async fn delete_report(
    State(state): State<AppState>,
    id: Result<Path<ReportId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;

    state
        .run_report_service(FaultDomain::Client, move |service| {
            service.delete_report(id)
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
