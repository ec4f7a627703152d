//! Doctor verification request/response DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::verification::{RegistryRecord, VerificationResult};

/// Request body for `POST /v1/verify-doctor`.
///
/// An empty `registration_number` is accepted on purpose: it is the
/// documented short-circuit to a negative result without a register call.
/// `medical_council` is carried for interface compatibility only.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct VerifyDoctorRequest {
    #[validate(length(min = 1, message = "doctor_name cannot be empty"))]
    pub doctor_name: String,
    pub registration_number: String,
    pub medical_council: Option<String>,
}

/// Response for `POST /v1/verify-doctor`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DoctorVerificationResponse {
    pub verified: bool,
    pub reason: String,
    pub matches: Vec<RegistryRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_match: Option<RegistryRecord>,
    pub total_matches: usize,
}

impl From<VerificationResult> for DoctorVerificationResponse {
    fn from(result: VerificationResult) -> Self {
        Self {
            verified: result.verified,
            reason: result.reason,
            matches: result.matches,
            best_match: result.best_match,
            total_matches: result.total_matches,
        }
    }
}
