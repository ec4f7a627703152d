use std::time::Duration;

use tracing::{info, warn};

use crate::config::VisionConfig;
use crate::error::{Result, RxError};

use super::api::VisionApiClient;

enum VisionBackend {
    Api { client: VisionApiClient },
    Unavailable { reason: String },
}

/// Multimodal document-understanding collaborator.
///
/// Misconfiguration degrades to an explicit `Unavailable` backend at startup
/// instead of failing the whole process; upload requests then answer with a
/// service-unavailable error.
pub struct VisionProvider {
    backend: VisionBackend,
    config: VisionConfig,
}

impl VisionProvider {
    pub fn new(config: &VisionConfig) -> Result<Self> {
        let backend = match VisionApiClient::new(config) {
            Ok(client) => {
                info!(model = %config.model, "Vision API backend initialized");
                VisionBackend::Api { client }
            }
            Err(e) => {
                let reason = format!("Vision backend unavailable: {e}");
                warn!("{}", reason);
                VisionBackend::Unavailable { reason }
            }
        };

        Ok(Self {
            backend,
            config: config.clone(),
        })
    }

    #[cfg(test)]
    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: VisionBackend::Unavailable {
                reason: reason.to_string(),
            },
            config: VisionConfig {
                model: "openai/gpt-4o".to_string(),
                api_key: None,
                base_url: None,
                timeout_secs: 60,
                max_retries: 3,
            },
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, VisionBackend::Unavailable { .. })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Hand the document to the model and return the raw reply text.
    pub async fn extract_prescription(&self, file_bytes: &[u8], mime_type: &str) -> Result<String> {
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);

        let result = tokio::time::timeout(
            timeout_duration,
            self.extract_internal(file_bytes, mime_type),
        )
        .await;

        match result {
            Ok(inner_result) => inner_result,
            Err(_) => Err(RxError::Vision(format!(
                "Extraction timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }

    async fn extract_internal(&self, file_bytes: &[u8], mime_type: &str) -> Result<String> {
        match &self.backend {
            VisionBackend::Api { client } => client.extract(file_bytes, mime_type).await,
            VisionBackend::Unavailable { reason } => {
                Err(RxError::VisionUnavailable(reason.clone()))
            }
        }
    }
}

impl Clone for VisionProvider {
    fn clone(&self) -> Self {
        match &self.backend {
            VisionBackend::Api { client } => Self {
                backend: VisionBackend::Api {
                    client: client.clone(),
                },
                config: self.config.clone(),
            },
            VisionBackend::Unavailable { reason } => Self {
                backend: VisionBackend::Unavailable {
                    reason: reason.clone(),
                },
                config: self.config.clone(),
            },
        }
    }
}
