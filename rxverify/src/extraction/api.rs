use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{parse_provider_model, VisionConfig};
use crate::error::{Result, RxError};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";

/// Instruction prompt for prescription extraction. The reply contract is a
/// JSON object with `doctor_info`, `patient_info` and `medicines`; the
/// parser tolerates code fences and key-spelling drift around it.
const PRESCRIPTION_PROMPT: &str = r#"Extract the details of the patient, doctor info and all the medicines prescribed here.

Make a JSON output with the following 3 keys with data within them:

1. "doctor_info": Include Hospital Name and Address, Doctor Name, Registration Number
2. "patient_info": Include Name, Age, Patient ID, Date
3. "medicines": An array of medicine objects, each containing:
   - Medicine Name
   - Dosage (e.g., "500mg", "10ml")
   - Dosage Instruction (e.g., "1-0-1", "2 times daily")
   - Timing: "AF" (After Food) or "BF" (Before Food)
   - Duration (e.g., "5 days", "1 week")

Return ONLY valid JSON, no additional text or markdown formatting."#;

#[derive(Clone, Debug)]
pub struct VisionApiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_retries: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: String,
}

impl VisionApiClient {
    pub fn new(config: &VisionConfig) -> Result<Self> {
        let (provider, model) = parse_provider_model(&config.model);
        let provider_lower = provider.to_lowercase();

        let needs_api_key = !matches!(provider_lower.as_str(), "ollama" | "lmstudio");
        if needs_api_key && config.api_key.is_none() {
            return Err(RxError::Vision(format!(
                "API key required for vision provider '{provider}'"
            )));
        }

        let base_url = config.base_url.clone().unwrap_or_else(|| {
            match provider_lower.as_str() {
                "openrouter" => OPENROUTER_BASE_URL,
                "ollama" => OLLAMA_BASE_URL,
                "lmstudio" => LMSTUDIO_BASE_URL,
                _ => OPENAI_BASE_URL,
            }
            .to_string()
        });

        if provider_lower == "custom" && config.base_url.is_none() {
            return Err(RxError::Vision(format!(
                "Unknown vision provider in model '{}' and no base URL configured",
                config.model
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RxError::Vision(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url,
            model: model.to_string(),
            max_retries: config.max_retries,
        })
    }

    /// Send the document to the model and return the raw reply text.
    pub async fn extract(&self, file_bytes: &[u8], mime_type: &str) -> Result<String> {
        let encoded = STANDARD.encode(file_bytes);
        let data_url = format!("data:{mime_type};base64,{encoded}");

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                    ContentPart::Text {
                        text: PRESCRIPTION_PROMPT.to_string(),
                    },
                ],
            }],
            max_tokens: 4096,
        };

        self.make_request(&request).await
    }

    async fn make_request(&self, request: &ChatRequest) -> Result<String> {
        let mut retries = 0;

        loop {
            let mut builder = self
                .client
                .post(format!("{}/chat/completions", self.base_url))
                .header("Content-Type", "application/json");
            if let Some(api_key) = &self.api_key {
                builder = builder.header("Authorization", format!("Bearer {api_key}"));
            }

            let response = builder.json(request).send().await;

            match response {
                Ok(resp) => {
                    if resp.status().is_success() {
                        let chat_response: ChatResponse = resp.json().await.map_err(|e| {
                            RxError::Vision(format!("Failed to parse response: {e}"))
                        })?;

                        return chat_response
                            .choices
                            .first()
                            .map(|c| c.message.content.clone())
                            .ok_or_else(|| RxError::Vision("No response from API".to_string()));
                    } else if resp.status().as_u16() == 429 || resp.status().is_server_error() {
                        retries += 1;
                        if retries >= self.max_retries {
                            return Err(RxError::Vision(format!(
                                "API request failed after {} retries: {}",
                                self.max_retries,
                                resp.status()
                            )));
                        }
                        let delay = Duration::from_millis(100 * (2_u64.pow(retries)));
                        tokio::time::sleep(delay).await;
                        continue;
                    } else {
                        let status = resp.status();
                        let body = resp.text().await.unwrap_or_default();
                        return Err(RxError::Vision(format!(
                            "API request failed: {status} - {body}"
                        )));
                    }
                }
                Err(e) => {
                    retries += 1;
                    if retries >= self.max_retries {
                        return Err(RxError::Vision(format!(
                            "API request failed after {} retries: {e}",
                            self.max_retries
                        )));
                    }
                    let delay = Duration::from_millis(100 * (2_u64.pow(retries)));
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
