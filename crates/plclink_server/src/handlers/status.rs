//! Gateway liveness confirmation (non-persisting)

use axum::extract::rejection::JsonRejection;
use axum::Json;
use plclink_core::{GatewayStatus, GatewayStatusCandidate, ServiceError};
use serde::Serialize;

use crate::error::{ApiError, FaultDomain};

pub const MISSING_STATUS_FIELDS_MESSAGE: &str = "gatewayId and status are mandatory";
pub const RECEIVED_MESSAGE: &str = "Receive data";

/// Receipt echoed back to the gateway
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReceipt {
    pub message: &'static str,
    pub received_data: GatewayStatus,
}

/// POST /nodered
/// Echo a gateway status report without storing it
pub async fn confirm_status(
    payload: Result<Json<GatewayStatusCandidate>, JsonRejection>,
) -> Result<Json<StatusReceipt>, ApiError> {
    let Json(candidate) = payload?;

    let received_data = plclink_core::confirm_status(candidate).map_err(|err| match err {
        ServiceError::MissingRequiredField(_) => {
            ApiError::BadRequest(MISSING_STATUS_FIELDS_MESSAGE.to_string())
        }
        other => ApiError::from_service(other, FaultDomain::Client),
    })?;

    Ok(Json(StatusReceipt {
        message: RECEIVED_MESSAGE,
        received_data,
    }))
}
