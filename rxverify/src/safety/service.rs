use serde::{Deserialize, Serialize};

use crate::error::{Result, RxError};
use crate::llm::{prompts, LlmProvider};

/// Screening verdict for one medicine. `flagged` means banned, restricted
/// (narcotic/psychotropic) or withdrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MedicineSafetyVerdict {
    pub medicine_name: String,
    pub flagged: bool,
}

#[derive(Clone)]
pub struct MedicineSafetyService {
    llm: LlmProvider,
}

impl MedicineSafetyService {
    pub fn new(llm: LlmProvider) -> Self {
        Self { llm }
    }

    pub fn is_available(&self) -> bool {
        self.llm.is_available()
    }

    /// Screen a list of medicines. An empty list short-circuits without any
    /// collaborator call; a reply that is valid JSON but not the agreed
    /// array shape maps to [`RxError::LlmContract`] with the raw text.
    pub async fn check_medicines(&self, medicines: &[String]) -> Result<Vec<MedicineSafetyVerdict>> {
        if medicines.is_empty() {
            return Ok(Vec::new());
        }

        tracing::info!(count = medicines.len(), "Screening medicines");

        let prompt = prompts::medicine_safety_prompt(medicines);
        let value = self
            .llm
            .complete_json(&prompt, Some(prompts::MEDICINE_SAFETY_SYSTEM_PROMPT), None)
            .await?;

        let raw = value.to_string();
        let verdicts: Vec<MedicineSafetyVerdict> =
            serde_json::from_value(value).map_err(|e| RxError::LlmContract {
                message: format!("Screening reply is not the agreed array shape: {e}"),
                raw_response: raw,
            })?;

        tracing::info!(count = verdicts.len(), "Medicine screening complete");
        Ok(verdicts)
    }
}
