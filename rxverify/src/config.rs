use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

const DEFAULT_REGISTRY_URL: &str = "https://www.nmc.org.in/MCIRest/open/getPaginatedData";
const DEFAULT_REGISTRY_REFERER: &str =
    "https://www.nmc.org.in/information-desk/indian-medical-register/";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub registry: RegistryConfig,
    pub verification: VerificationConfig,
    pub upload: UploadConfig,
    pub vision: VisionConfig,
    pub llm: Option<LlmConfig>,
    pub speech: Option<SpeechConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Remote medical-register endpoint. The upstream is a DataTables-style
/// paginated JSON API behind a government TLS setup with an incomplete
/// certificate chain, hence the `accept_invalid_certs` escape hatch.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    pub base_url: String,
    pub referer: String,
    pub timeout_secs: u64,
    pub page_length: u32,
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    /// Minimum name-similarity ratio (0-1) for a registry match to count as
    /// verified.
    pub similarity_threshold: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_bytes: usize,
}

/// Multimodal model used for prescription extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct VisionConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

/// LLM configuration for the intake conversation and medicine screening.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub chat_temperature: f32,
}

/// Speech transcription/synthesis configuration. Synthesis output is raw PCM
/// repackaged as mono 16-bit WAV at `sample_rate_hz`.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    pub model: String,
    pub tts_model: String,
    pub voice: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub sample_rate_hz: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("RX_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("RX_PORT", 8000),
            },
            registry: RegistryConfig {
                base_url: env::var("REGISTRY_URL")
                    .unwrap_or_else(|_| DEFAULT_REGISTRY_URL.to_string()),
                referer: env::var("REGISTRY_REFERER")
                    .unwrap_or_else(|_| DEFAULT_REGISTRY_REFERER.to_string()),
                timeout_secs: parse_env_or("REGISTRY_TIMEOUT", 15),
                page_length: parse_env_or("REGISTRY_PAGE_LENGTH", 50),
                accept_invalid_certs: parse_env_or("REGISTRY_ACCEPT_INVALID_CERTS", true),
            },
            verification: VerificationConfig {
                similarity_threshold: parse_env_or("SIMILARITY_THRESHOLD", 0.2),
            },
            upload: UploadConfig {
                max_bytes: parse_env_or("UPLOAD_MAX_BYTES", 10 * 1024 * 1024),
            },
            vision: VisionConfig {
                model: env::var("VISION_MODEL").unwrap_or_else(|_| "openai/gpt-4o".to_string()),
                api_key: env::var("VISION_API_KEY").ok(),
                base_url: env::var("VISION_BASE_URL").ok(),
                timeout_secs: parse_env_or("VISION_TIMEOUT", 60),
                max_retries: parse_env_or("VISION_MAX_RETRIES", 3),
            },
            llm: env::var("LLM_MODEL").ok().map(|model| LlmConfig {
                model,
                api_key: env::var("LLM_API_KEY").ok(),
                base_url: env::var("LLM_BASE_URL").ok(),
                timeout_secs: parse_env_or("LLM_TIMEOUT", 30),
                max_retries: parse_env_or("LLM_MAX_RETRIES", 3),
                chat_temperature: parse_env_or("LLM_CHAT_TEMPERATURE", 0.7),
            }),
            speech: env::var("SPEECH_MODEL").ok().map(|model| SpeechConfig {
                model,
                tts_model: env::var("SPEECH_TTS_MODEL")
                    .unwrap_or_else(|_| "gpt-4o-mini-tts".to_string()),
                voice: env::var("SPEECH_VOICE").unwrap_or_else(|_| "alloy".to_string()),
                api_key: env::var("SPEECH_API_KEY").ok(),
                base_url: env::var("SPEECH_BASE_URL").ok(),
                timeout_secs: parse_env_or("SPEECH_TIMEOUT", 60),
                sample_rate_hz: parse_env_or("SPEECH_SAMPLE_RATE", 24000),
            }),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known providers that speak an OpenAI-compatible API.
pub const KNOWN_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse a `provider/model` string into a (provider, model) tuple.
///
/// Unknown prefixes (or no prefix at all) resolve to the `"custom"`
/// pseudo-provider, which requires an explicit base URL to be usable.
pub fn parse_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    ("custom", model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_registry_config_defaults() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::remove_var("REGISTRY_URL");
        std::env::remove_var("REGISTRY_TIMEOUT");

        let config = Config::default();
        assert!(config.registry.base_url.contains("getPaginatedData"));
        assert_eq!(config.registry.timeout_secs, 15);
        assert_eq!(config.registry.page_length, 50);
        assert!(config.registry.accept_invalid_certs);
    }

    #[test]
    fn test_similarity_threshold_defaults() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::remove_var("SIMILARITY_THRESHOLD");
        let config = Config::default();
        assert_eq!(config.verification.similarity_threshold, 0.2);
    }

    #[test]
    fn test_similarity_threshold_from_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::set_var("SIMILARITY_THRESHOLD", "0.5");
        let config = Config::default();
        assert_eq!(config.verification.similarity_threshold, 0.5);
        std::env::remove_var("SIMILARITY_THRESHOLD");
    }

    #[test]
    fn test_upload_cap_defaults_to_ten_mib() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::remove_var("UPLOAD_MAX_BYTES");
        let config = Config::default();
        assert_eq!(config.upload.max_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_llm_config_gated_on_model_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::remove_var("LLM_MODEL");
        let config = Config::default();
        assert!(config.llm.is_none());

        std::env::set_var("LLM_MODEL", "openai/gpt-4o-mini");
        let config = Config::default();
        let llm = config.llm.expect("llm config");
        assert_eq!(llm.model, "openai/gpt-4o-mini");
        assert_eq!(llm.timeout_secs, 30);
        assert_eq!(llm.max_retries, 3);
        assert_eq!(llm.chat_temperature, 0.7);

        std::env::remove_var("LLM_MODEL");
    }

    #[test]
    fn test_speech_config_gated_on_model_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::remove_var("SPEECH_MODEL");
        let config = Config::default();
        assert!(config.speech.is_none());

        std::env::set_var("SPEECH_MODEL", "openai/whisper-1");
        let config = Config::default();
        let speech = config.speech.expect("speech config");
        assert_eq!(speech.model, "openai/whisper-1");
        assert_eq!(speech.voice, "alloy");
        assert_eq!(speech.sample_rate_hz, 24000);

        std::env::remove_var("SPEECH_MODEL");
    }

    #[test]
    fn test_parse_provider_model_known() {
        assert_eq!(parse_provider_model("openai/gpt-4o"), ("openai", "gpt-4o"));
        assert_eq!(parse_provider_model("ollama/llama3"), ("ollama", "llama3"));
    }

    #[test]
    fn test_parse_provider_model_unknown_prefix() {
        assert_eq!(
            parse_provider_model("acme/secret-model"),
            ("custom", "acme/secret-model")
        );
        assert_eq!(parse_provider_model("gpt-4o"), ("custom", "gpt-4o"));
    }

    #[test]
    fn test_parse_env_or_invalid_value_falls_back() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::set_var("__TEST_RX_PORT", "not-a-port");
        let result: u16 = parse_env_or("__TEST_RX_PORT", 8000);
        assert_eq!(result, 8000);
        std::env::remove_var("__TEST_RX_PORT");
    }
}
