//! v1 doctor verification handler.

use axum::extract::State;
use validator::Validate;

use crate::api::v1::dto::{DoctorVerificationResponse, VerifyDoctorRequest};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;

/// `POST /api/v1/verify-doctor`
///
/// Cross-checks a doctor name and registration number against the national
/// medical register. Register outages degrade to a negative result, never a
/// 5xx.
#[utoipa::path(
    post,
    path = "/api/v1/verify-doctor",
    tag = "verification",
    request_body = VerifyDoctorRequest,
    responses(
        (status = 200, description = "Verification decision", body = DoctorVerificationResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn verify_doctor(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<VerifyDoctorRequest>,
) -> ApiResponse<DoctorVerificationResponse> {
    if let Err(e) = req.validate() {
        return ApiResponse::error(ErrorCode::InvalidRequest, e.to_string());
    }

    tracing::info!(
        doctor_name = %req.doctor_name,
        registration_number = %req.registration_number,
        "Verifying doctor"
    );

    let result = state
        .verification
        .verify_doctor(
            &req.doctor_name,
            &req.registration_number,
            req.medical_council.as_deref(),
        )
        .await;

    tracing::info!(
        verified = result.verified,
        total_matches = result.total_matches,
        "Verification complete"
    );

    ApiResponse::success(DoctorVerificationResponse::from(result))
}
