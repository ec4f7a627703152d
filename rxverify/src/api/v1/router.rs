use axum::{
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;

pub fn v1_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router())
        .route(
            "/upload-prescription",
            post(handlers::prescription::upload_prescription),
        )
        .route("/verify-doctor", post(handlers::verification::verify_doctor))
        .route(
            "/check-medicine-safety",
            post(handlers::safety::check_medicine_safety),
        )
        .route("/medical-chat", post(handlers::chat::medical_chat))
}
