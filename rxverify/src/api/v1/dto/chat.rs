//! Medical-chat request/response DTOs.

use serde::{Deserialize, Serialize};

use crate::chat::{MedicalIntakeState, WireTurn};
use crate::extraction::PrescriptionData;

/// Request body for `POST /v1/medical-chat`.
///
/// Exactly one of `message` or `audio_base64` must carry the user's
/// utterance; audio is transcribed first. The caller owns conversation state
/// and echoes `medical_information` back on every turn. History entries may
/// arrive in any of the accepted wire shapes (see [`WireTurn`]).
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct MedicalChatRequest {
    pub message: Option<String>,
    pub audio_base64: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<WireTurn>,
    pub medical_information: Option<MedicalIntakeState>,
    pub prescription_data: Option<PrescriptionData>,
    pub include_audio_response: Option<bool>,
}

/// Response for `POST /v1/medical-chat`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MedicalChatResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcribed_text: Option<String>,
    pub updated_medical_information: MedicalIntakeState,
    pub conversation_complete: bool,
    /// Mono 16-bit WAV, base64-encoded. Absent when synthesis is disabled,
    /// unavailable, or failed (synthesis is best-effort).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_response_base64: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_text_request_deserializes() {
        let req: MedicalChatRequest =
            serde_json::from_str(r#"{"message": "Hello"}"#).expect("deserialize");
        assert_eq!(req.message.as_deref(), Some("Hello"));
        assert!(req.conversation_history.is_empty());
        assert!(req.medical_information.is_none());
    }

    #[test]
    fn request_accepts_mixed_history_shapes() {
        let req: MedicalChatRequest = serde_json::from_str(
            r#"{
                "message": "The doctor prescribed Paracetamol",
                "conversation_history": [
                    "User: Hi",
                    {"role": "assistant", "content": "Hello"},
                    {"user": "a", "bot": "b"}
                ],
                "medical_information": {
                    "reported_disease": "fever",
                    "medications_provided_by_user": null,
                    "medication_confirmation": null
                }
            }"#,
        )
        .expect("deserialize");
        assert_eq!(req.conversation_history.len(), 3);
        assert_eq!(
            req.medical_information
                .expect("state")
                .reported_disease
                .as_deref(),
            Some("fever")
        );
    }

    #[test]
    fn response_omits_absent_audio() {
        let resp = MedicalChatResponse {
            response: "Thank you.".to_string(),
            transcribed_text: None,
            updated_medical_information: MedicalIntakeState::default(),
            conversation_complete: false,
            audio_response_base64: None,
        };
        let json = serde_json::to_value(&resp).expect("serialize");
        assert!(json.get("audio_response_base64").is_none());
        assert!(json.get("transcribed_text").is_none());
        assert_eq!(json["conversation_complete"], false);
    }
}
