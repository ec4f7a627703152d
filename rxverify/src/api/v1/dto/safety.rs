//! Medicine screening request/response DTOs.

use serde::{Deserialize, Serialize};

use crate::safety::MedicineSafetyVerdict;

/// Request body for `POST /v1/check-medicine-safety`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CheckMedicineSafetyRequest {
    #[serde(default)]
    pub medicines: Vec<String>,
}

/// Response for `POST /v1/check-medicine-safety`.
///
/// A model reply in the wrong shape is a *successful* response with
/// `success == false` and the raw reply kept for diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CheckMedicineSafetyResponse {
    pub success: bool,
    pub results: Vec<MedicineSafetyVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl CheckMedicineSafetyResponse {
    pub fn ok(results: Vec<MedicineSafetyVerdict>) -> Self {
        Self {
            success: true,
            results,
            error: None,
            raw_response: None,
        }
    }

    pub fn failed(error: String, raw_response: String) -> Self {
        Self {
            success: false,
            results: Vec::new(),
            error: Some(error),
            raw_response: Some(raw_response),
        }
    }
}
