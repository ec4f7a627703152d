use std::time::Duration;

use tracing::{info, warn};

use crate::config::SpeechConfig;
use crate::error::{Result, RxError};

use super::api::SpeechApiClient;
use super::wav::pcm_to_wav;

enum SpeechBackend {
    Api { client: SpeechApiClient },
    Unavailable { reason: String },
}

/// Speech collaborator: audio bytes in, text out; text in, WAV bytes out.
pub struct SpeechProvider {
    backend: SpeechBackend,
    config: SpeechConfig,
}

impl SpeechProvider {
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        let backend = match SpeechApiClient::new(config) {
            Ok(client) => {
                info!(model = %config.model, "Speech API backend initialized");
                SpeechBackend::Api { client }
            }
            Err(e) => {
                let reason = format!("Speech backend unavailable: {e}");
                warn!("{}", reason);
                SpeechBackend::Unavailable { reason }
            }
        };

        Ok(Self {
            backend,
            config: config.clone(),
        })
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: SpeechBackend::Unavailable {
                reason: reason.to_string(),
            },
            config: SpeechConfig {
                model: "openai/whisper-1".to_string(),
                tts_model: "gpt-4o-mini-tts".to_string(),
                voice: "alloy".to_string(),
                api_key: None,
                base_url: None,
                timeout_secs: 60,
                sample_rate_hz: 24000,
            },
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, SpeechBackend::Unavailable { .. })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn transcribe(&self, audio_bytes: &[u8]) -> Result<String> {
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);

        let result = tokio::time::timeout(timeout_duration, async {
            match &self.backend {
                SpeechBackend::Api { client } => client.transcribe(audio_bytes).await,
                SpeechBackend::Unavailable { reason } => {
                    Err(RxError::SpeechUnavailable(reason.clone()))
                }
            }
        })
        .await;

        match result {
            Ok(inner_result) => inner_result,
            Err(_) => Err(RxError::Speech(format!(
                "Transcription timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }

    /// Synthesize `text` into a mono 16-bit WAV payload at the configured
    /// sample rate.
    pub async fn synthesize_wav(&self, text: &str) -> Result<Vec<u8>> {
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);

        let result = tokio::time::timeout(timeout_duration, async {
            match &self.backend {
                SpeechBackend::Api { client } => client.synthesize(text).await,
                SpeechBackend::Unavailable { reason } => {
                    Err(RxError::SpeechUnavailable(reason.clone()))
                }
            }
        })
        .await;

        match result {
            Ok(Ok(pcm)) => Ok(pcm_to_wav(&pcm, self.config.sample_rate_hz)),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(RxError::Speech(format!(
                "Synthesis timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }
}

impl Clone for SpeechProvider {
    fn clone(&self) -> Self {
        match &self.backend {
            SpeechBackend::Api { client } => Self {
                backend: SpeechBackend::Api {
                    client: client.clone(),
                },
                config: self.config.clone(),
            },
            SpeechBackend::Unavailable { reason } => Self {
                backend: SpeechBackend::Unavailable {
                    reason: reason.clone(),
                },
                config: self.config.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key: Option<&str>) -> SpeechConfig {
        SpeechConfig {
            model: "openai/whisper-1".to_string(),
            tts_model: "gpt-4o-mini-tts".to_string(),
            voice: "alloy".to_string(),
            api_key: api_key.map(String::from),
            base_url: None,
            timeout_secs: 60,
            sample_rate_hz: 24000,
        }
    }

    #[test]
    fn missing_api_key_degrades_to_unavailable() {
        let provider = SpeechProvider::new(&make_config(None)).unwrap();
        assert!(!provider.is_available());
    }

    #[test]
    fn configured_provider_is_available() {
        let provider = SpeechProvider::new(&make_config(Some("test-key"))).unwrap();
        assert!(provider.is_available());
    }

    #[tokio::test]
    async fn unavailable_provider_returns_typed_errors() {
        let provider = SpeechProvider::unavailable("test unavailable");
        assert!(matches!(
            provider.transcribe(&[]).await,
            Err(RxError::SpeechUnavailable(_))
        ));
        assert!(matches!(
            provider.synthesize_wav("hello").await,
            Err(RxError::SpeechUnavailable(_))
        ));
    }
}
