//! Gateway report record.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the store and never change.
//! - `gateway_id` is never empty and `data` is always present.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::candidate::{is_present, ReportValidationError, GATEWAY_ID_FIELD, STATE_FIELD};

/// Store-assigned report identifier.
pub type ReportId = i64;

/// One persisted observation of a gateway's status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayReport {
    /// Auto-incremented primary key, never reused.
    pub id: ReportId,
    /// Reporting device. Not unique: a device reports many times.
    pub gateway_id: String,
    /// Opaque device payload (string or structured JSON).
    pub data: Value,
    /// Creation instant in UTC.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Validated write-side input for create and update.
///
/// Fields are private so that the store can only receive values that went
/// through `NewReport::new` or candidate validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    gateway_id: String,
    data: Value,
}

impl NewReport {
    /// Builds a report from already-typed fields.
    ///
    /// # Errors
    /// - `MissingRequiredField` when `gateway_id` is empty or `data` is not
    ///   present under the loose presence rules.
    pub fn new(gateway_id: impl Into<String>, data: Value) -> Result<Self, ReportValidationError> {
        let gateway_id = gateway_id.into();
        let mut missing = Vec::new();
        if gateway_id.is_empty() {
            missing.push(GATEWAY_ID_FIELD);
        }
        if !is_present(Some(&data)) {
            missing.push(STATE_FIELD);
        }
        if !missing.is_empty() {
            return Err(ReportValidationError::MissingRequiredField(missing));
        }

        Ok(Self::from_parts(gateway_id, data))
    }

    pub(crate) fn from_parts(gateway_id: String, data: Value) -> Self {
        Self { gateway_id, data }
    }

    pub fn gateway_id(&self) -> &str {
        &self.gateway_id
    }

    pub fn data(&self) -> &Value {
        &self.data
    }
}
