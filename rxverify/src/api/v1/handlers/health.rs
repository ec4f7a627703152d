use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::v1::response::ApiResponse;
use crate::llm::LlmBackend;

/// Health data returned inside the v1 envelope.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub registry: RegistryStatus,
    pub vision: VisionStatus,
    pub llm: LlmStatus,
    pub speech: SpeechStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct RegistryStatus {
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct VisionStatus {
    pub status: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct LlmStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SpeechStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// `GET /api/v1/health`
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let registry_status = RegistryStatus {
        endpoint: state.config.registry.base_url.clone(),
    };

    let vision_status = VisionStatus {
        status: if state.vision.is_available() {
            "available".to_string()
        } else {
            "unavailable".to_string()
        },
        model: state.vision.model().to_string(),
    };

    let llm_status = if state.llm.is_available() {
        let provider = match state.llm.backend() {
            LlmBackend::OpenAI => "openai",
            LlmBackend::OpenRouter => "openrouter",
            LlmBackend::Ollama => "ollama",
            LlmBackend::LmStudio => "lmstudio",
            LlmBackend::OpenAICompatible { .. } => "openai-compatible",
            LlmBackend::Unavailable { .. } => "unavailable",
        };
        let model = state.llm.config().map(|c| c.model.clone());
        LlmStatus {
            status: "available".to_string(),
            provider: Some(provider.to_string()),
            model,
        }
    } else {
        LlmStatus {
            status: "unavailable".to_string(),
            provider: None,
            model: None,
        }
    };

    let speech_status = if state.speech.is_available() {
        SpeechStatus {
            status: "available".to_string(),
            model: Some(state.speech.model().to_string()),
        }
    } else {
        SpeechStatus {
            status: "unavailable".to_string(),
            model: None,
        }
    };

    ApiResponse::success(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        registry: registry_status,
        vision: vision_status,
        llm: llm_status,
        speech: speech_status,
    })
}
