use std::time::Duration;

use reqwest::{multipart, Client};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::{
    config::{parse_provider_model, SpeechConfig},
    error::{Result, RxError},
};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Clone)]
pub struct SpeechApiClient {
    client: Client,
    config: SpeechConfig,
    model: String,
}

impl SpeechApiClient {
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        if config.api_key.is_none() {
            return Err(RxError::Speech(
                "API key required for speech API".to_string(),
            ));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RxError::Speech(format!("Failed to create HTTP client: {e}")))?;

        let (_, model) = parse_provider_model(&config.model);

        Ok(Self {
            client,
            config: config.clone(),
            model: model.to_string(),
        })
    }

    pub async fn transcribe(&self, audio_bytes: &[u8]) -> Result<String> {
        let mut last_error: Option<RxError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay_ms = 100 * 2_u64.pow(attempt - 1);
                debug!("Retry attempt {} after {}ms", attempt, delay_ms);
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }

            match self.transcribe_internal(audio_bytes).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    let retryable = matches!(
                        &e,
                        RxError::Speech(msg) if msg.contains("500") || msg.contains("timeout")
                    );

                    if !retryable {
                        return Err(e);
                    }

                    if attempt < MAX_RETRIES {
                        warn!("Transcription attempt {} failed (retryable): {}", attempt + 1, e);
                        last_error = Some(e);
                        continue;
                    }

                    return Err(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| RxError::Speech("Transcription failed after retries".to_string())))
    }

    async fn transcribe_internal(&self, audio_bytes: &[u8]) -> Result<String> {
        // callers send bare base64 audio without a filename; sniff the
        // container so the part gets a plausible name and MIME
        let (extension, mime_type) = match infer::get(audio_bytes) {
            Some(kind) => (kind.extension(), kind.mime_type()),
            None => ("mp3", "audio/mpeg"),
        };
        let file_name = format!("audio.{extension}");

        let file_part = multipart::Part::bytes(audio_bytes.to_vec())
            .file_name(file_name)
            .mime_str(mime_type)
            .map_err(|e| RxError::Speech(format!("Invalid MIME type: {e}")))?;

        let form = multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "json");

        let base_url = self.config.base_url.as_deref().unwrap_or(OPENAI_BASE_URL);
        let url = format!("{base_url}/audio/transcriptions");

        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| RxError::Speech("API key not configured".to_string()))?;

        debug!("Sending transcription request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| RxError::Speech(format!("Transcription request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RxError::Speech(format!(
                "Transcription API returned {status}: {body}"
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| RxError::Speech(format!("Failed to parse transcription response: {e}")))?;

        Ok(parsed.text)
    }

    /// Synthesize speech for `text` and return raw PCM samples (16-bit LE,
    /// mono, at the provider's native rate).
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        if text.trim().is_empty() {
            return Err(RxError::Validation(
                "Cannot synthesize empty text".to_string(),
            ));
        }

        let base_url = self.config.base_url.as_deref().unwrap_or(OPENAI_BASE_URL);
        let url = format!("{base_url}/audio/speech");

        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| RxError::Speech("API key not configured".to_string()))?;

        debug!("Sending synthesis request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&json!({
                "model": self.config.tts_model,
                "input": text,
                "voice": self.config.voice,
                "response_format": "pcm",
            }))
            .send()
            .await
            .map_err(|e| RxError::Speech(format!("Synthesis request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RxError::Speech(format!(
                "Synthesis API returned {status}: {body}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RxError::Speech(format!("Failed to read synthesis response: {e}")))?;

        Ok(bytes.to_vec())
    }
}
