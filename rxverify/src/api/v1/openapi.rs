use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rxverify API",
        version = "1.0.0",
        description = "Prescription intake backend: multimodal prescription extraction, medical-register doctor verification, regulatory medicine screening, and a scripted intake conversation.",
    ),
    paths(
        handlers::health::health_check,
        handlers::prescription::upload_prescription,
        handlers::verification::verify_doctor,
        handlers::safety::check_medicine_safety,
        handlers::chat::medical_chat,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        // Prescription extraction
        dto::prescription::UploadPrescriptionResponse,
        crate::extraction::PrescriptionData,
        crate::extraction::DoctorInfo,
        crate::extraction::PatientInfo,
        crate::extraction::Medicine,
        // Verification
        dto::verification::VerifyDoctorRequest,
        dto::verification::DoctorVerificationResponse,
        crate::verification::RegistryRecord,
        // Safety
        dto::safety::CheckMedicineSafetyRequest,
        dto::safety::CheckMedicineSafetyResponse,
        crate::safety::MedicineSafetyVerdict,
        // Chat
        dto::chat::MedicalChatRequest,
        dto::chat::MedicalChatResponse,
        crate::chat::ChatRole,
        crate::chat::ChatTurn,
        crate::chat::WireTurn,
        crate::chat::RoleContentTurn,
        crate::chat::UserBotTurn,
        crate::chat::MedicalIntakeState,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::RegistryStatus,
        handlers::health::VisionStatus,
        handlers::health::LlmStatus,
        handlers::health::SpeechStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "prescription", description = "Prescription document extraction"),
        (name = "verification", description = "Doctor verification against the medical register"),
        (name = "safety", description = "Regulatory medicine screening"),
        (name = "chat", description = "Scripted medical-intake conversation"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
