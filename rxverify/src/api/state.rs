use std::sync::Arc;

use crate::chat::MedicalChatService;
use crate::config::Config;
use crate::extraction::VisionProvider;
use crate::llm::LlmProvider;
use crate::safety::MedicineSafetyService;
use crate::speech::SpeechProvider;
use crate::verification::{RegistryLookup, VerificationService};

/// Per-process collaborator handles, constructed once in `main` and cloned
/// into handlers. No ambient singletons; tests inject fakes here.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verification: VerificationService,
    pub vision: VisionProvider,
    pub llm: LlmProvider,
    pub chat: MedicalChatService,
    pub safety: MedicineSafetyService,
    pub speech: SpeechProvider,
}

impl AppState {
    pub fn new(
        config: Config,
        registry: Arc<dyn RegistryLookup>,
        vision: VisionProvider,
        llm: LlmProvider,
        speech: SpeechProvider,
    ) -> Self {
        let config = Arc::new(config);
        let verification =
            VerificationService::new(registry, config.verification.similarity_threshold);
        let chat_temperature = config
            .llm
            .as_ref()
            .map(|llm| llm.chat_temperature)
            .unwrap_or(0.7);
        let chat = MedicalChatService::new(llm.clone(), chat_temperature);
        let safety = MedicineSafetyService::new(llm.clone());

        Self {
            config,
            verification,
            vision,
            llm,
            chat,
            safety,
            speech,
        }
    }
}
