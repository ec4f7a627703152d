//! v1 medical-chat handler.

use axum::extract::State;
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::api::v1::dto::{MedicalChatRequest, MedicalChatResponse};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::chat::normalize_history;

/// `POST /api/v1/medical-chat`
///
/// One turn of the scripted intake conversation. Audio input is transcribed
/// first; an audio reply is synthesized best-effort when speech is available
/// and the caller did not opt out.
#[utoipa::path(
    post,
    path = "/api/v1/medical-chat",
    tag = "chat",
    request_body = MedicalChatRequest,
    responses(
        (status = 200, description = "Chat turn processed", body = MedicalChatResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 501, description = "LLM collaborator not configured", body = ApiError),
    )
)]
pub async fn medical_chat(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<MedicalChatRequest>,
) -> ApiResponse<MedicalChatResponse> {
    // resolve the user's utterance: transcribe audio if present, else text
    let (user_message, transcribed_text) = if let Some(audio_base64) = &req.audio_base64 {
        let audio_bytes = match STANDARD.decode(audio_base64) {
            Ok(bytes) => bytes,
            Err(e) => {
                return ApiResponse::error(
                    ErrorCode::InvalidRequest,
                    format!("audio_base64 is not valid base64: {e}"),
                );
            }
        };

        let text = match state.speech.transcribe(&audio_bytes).await {
            Ok(text) => text,
            Err(e) => return e.into(),
        };
        (text.clone(), Some(text))
    } else if let Some(message) = req.message.clone().filter(|m| !m.trim().is_empty()) {
        (message, None)
    } else {
        return ApiResponse::error(
            ErrorCode::InvalidRequest,
            "Either 'message' or 'audio_base64' must be provided",
        );
    };

    let history = match normalize_history(req.conversation_history) {
        Ok(history) => history,
        Err(e) => return e.into(),
    };

    let intake = req.medical_information.unwrap_or_default();

    let outcome = match state
        .chat
        .chat(
            &user_message,
            &history,
            intake,
            req.prescription_data.as_ref(),
        )
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => return e.into(),
    };

    // best-effort audio reply: failure is logged, never fails the turn
    let want_audio = req.include_audio_response.unwrap_or(true);
    let audio_response_base64 = if want_audio && state.speech.is_available() {
        match state.speech.synthesize_wav(&outcome.reply).await {
            Ok(wav) => Some(STANDARD.encode(wav)),
            Err(e) => {
                tracing::warn!(error = %e, "Audio synthesis failed; returning text only");
                None
            }
        }
    } else {
        None
    };

    ApiResponse::success(MedicalChatResponse {
        response: outcome.reply,
        transcribed_text,
        updated_medical_information: outcome.intake,
        conversation_complete: outcome.conversation_complete,
        audio_response_base64,
    })
}
