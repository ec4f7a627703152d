//! v1 medicine screening handler.

use axum::extract::State;

use crate::api::v1::dto::{CheckMedicineSafetyRequest, CheckMedicineSafetyResponse};
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::error::RxError;

/// `POST /api/v1/check-medicine-safety`
///
/// Screens medicines against the LLM collaborator's regulatory knowledge.
/// A reply in the wrong shape is a 200 with `success == false` and the raw
/// text attached; an unconfigured LLM is a 501.
#[utoipa::path(
    post,
    path = "/api/v1/check-medicine-safety",
    tag = "safety",
    request_body = CheckMedicineSafetyRequest,
    responses(
        (status = 200, description = "Screening attempted", body = CheckMedicineSafetyResponse),
        (status = 501, description = "LLM collaborator not configured", body = ApiError),
    )
)]
pub async fn check_medicine_safety(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<CheckMedicineSafetyRequest>,
) -> ApiResponse<CheckMedicineSafetyResponse> {
    match state.safety.check_medicines(&req.medicines).await {
        Ok(results) => ApiResponse::success(CheckMedicineSafetyResponse::ok(results)),
        Err(RxError::LlmContract {
            message,
            raw_response,
        }) => ApiResponse::success(CheckMedicineSafetyResponse::failed(message, raw_response)),
        Err(e) => e.into(),
    }
}
