//! Inbound report candidates and their validation.
//!
//! # Responsibility
//! - Accept loosely-typed request bodies without failing deserialization on
//!   unexpected field types.
//! - Apply one explicit presence check at the boundary and return a typed
//!   rejection.
//!
//! # Invariants
//! - A field is present when it exists and is not `null`, `false`, `0` or
//!   `""`. Empty objects and arrays count as present.
//! - Only a JSON object carries fields. Any other body (array, string,
//!   number) is read as having none, so it is rejected as missing fields.
//! - Validation is pure: no storage access, no logging of payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

use super::report::NewReport;

pub const GATEWAY_ID_FIELD: &str = "gatewayID";
pub const STATE_FIELD: &str = "state";
pub const STATUS_GATEWAY_ID_FIELD: &str = "gatewayId";
pub const STATUS_FIELD: &str = "status";
const STATUS_DATA_FIELD: &str = "data";

/// Rejection produced by candidate validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportValidationError {
    /// One or more required fields are absent or falsy, in declaration order.
    MissingRequiredField(Vec<&'static str>),
    /// A present field has a shape the store cannot hold.
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}

impl Display for ReportValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredField(fields) => {
                write!(f, "missing required field(s): {}", fields.join(", "))
            }
            Self::InvalidField { field, reason } => write!(f, "invalid field `{field}`: {reason}"),
        }
    }
}

impl Error for ReportValidationError {}

/// Candidate for the persisting ingestion path (`{gatewayID, state}`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct ReportCandidate {
    pub gateway_id: Option<Value>,
    pub state: Option<Value>,
}

impl From<Value> for ReportCandidate {
    fn from(body: Value) -> Self {
        let mut fields = object_fields(body);
        Self {
            gateway_id: fields.remove(GATEWAY_ID_FIELD),
            state: fields.remove(STATE_FIELD),
        }
    }
}

impl ReportCandidate {
    /// Checks presence of both fields and normalizes into a `NewReport`.
    ///
    /// # Errors
    /// - `MissingRequiredField` listing every absent field.
    /// - `InvalidField` when `gatewayID` is present but not a string.
    pub fn validate(self) -> Result<NewReport, ReportValidationError> {
        let mut missing = Vec::new();
        if !is_present(self.gateway_id.as_ref()) {
            missing.push(GATEWAY_ID_FIELD);
        }
        if !is_present(self.state.as_ref()) {
            missing.push(STATE_FIELD);
        }
        if !missing.is_empty() {
            return Err(ReportValidationError::MissingRequiredField(missing));
        }

        match (self.gateway_id, self.state) {
            (Some(Value::String(gateway_id)), Some(data)) => {
                Ok(NewReport::from_parts(gateway_id, data))
            }
            _ => Err(ReportValidationError::InvalidField {
                field: GATEWAY_ID_FIELD,
                reason: "expected a string",
            }),
        }
    }
}

/// Candidate for the non-persisting confirmation path
/// (`{gatewayId, status, data}`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct GatewayStatusCandidate {
    pub gateway_id: Option<Value>,
    pub status: Option<Value>,
    pub data: Option<Value>,
}

impl From<Value> for GatewayStatusCandidate {
    fn from(body: Value) -> Self {
        let mut fields = object_fields(body);
        Self {
            gateway_id: fields.remove(STATUS_GATEWAY_ID_FIELD),
            status: fields.remove(STATUS_FIELD),
            data: fields.remove(STATUS_DATA_FIELD),
        }
    }
}

/// Liveness receipt echoed back to a gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayStatus {
    #[serde(rename = "gatewayId")]
    pub gateway_id: Value,
    pub status: Value,
    pub data: Value,
}

impl GatewayStatusCandidate {
    /// Requires `gatewayId` and `status`; `data` falls back to `{}`.
    pub fn validate(self) -> Result<GatewayStatus, ReportValidationError> {
        let mut missing = Vec::new();
        if !is_present(self.gateway_id.as_ref()) {
            missing.push(STATUS_GATEWAY_ID_FIELD);
        }
        if !is_present(self.status.as_ref()) {
            missing.push(STATUS_FIELD);
        }

        match (self.gateway_id, self.status) {
            (Some(gateway_id), Some(status)) if missing.is_empty() => {
                let data = self
                    .data
                    .filter(|data| is_present(Some(data)))
                    .unwrap_or_else(|| Value::Object(Map::new()));
                Ok(GatewayStatus {
                    gateway_id,
                    status,
                    data,
                })
            }
            _ => Err(ReportValidationError::MissingRequiredField(missing)),
        }
    }
}

fn object_fields(body: Value) -> Map<String, Value> {
    match body {
        Value::Object(fields) => fields,
        _ => Map::new(),
    }
}

pub(crate) fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Number(number)) => number.as_f64() != Some(0.0),
        Some(Value::Bool(true)) | Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
