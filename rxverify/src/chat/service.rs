use crate::error::Result;
use crate::extraction::PrescriptionData;
use crate::llm::{prompts, CompletionOptions, LlmProvider};

use super::extract::extract_intake_fields;
use super::history::ChatTurn;
use super::intake::MedicalIntakeState;

/// One processed conversation turn.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub reply: String,
    pub intake: MedicalIntakeState,
    pub conversation_complete: bool,
}

/// Drives the scripted intake conversation through the LLM collaborator.
#[derive(Clone)]
pub struct MedicalChatService {
    llm: LlmProvider,
    temperature: f32,
}

impl MedicalChatService {
    pub fn new(llm: LlmProvider, temperature: f32) -> Self {
        Self { llm, temperature }
    }

    pub fn is_available(&self) -> bool {
        self.llm.is_available()
    }

    /// Process one user utterance: serialize the caller-held state into a
    /// context prompt, complete it, pull the inline extraction fragments out
    /// of the reply, and report completeness.
    pub async fn chat(
        &self,
        user_message: &str,
        history: &[ChatTurn],
        intake: MedicalIntakeState,
        prescription: Option<&PrescriptionData>,
    ) -> Result<ChatOutcome> {
        let prompt = prompts::intake_context_prompt(history, &intake, prescription, user_message);

        let options = CompletionOptions {
            temperature: Some(self.temperature),
            ..Default::default()
        };

        tracing::info!(history_len = history.len(), "Sending intake chat request");

        let raw_reply = self
            .llm
            .complete(
                &prompt,
                Some(prompts::MEDICAL_INTAKE_SYSTEM_PROMPT),
                Some(&options),
            )
            .await?;

        let (reply, intake) = extract_intake_fields(&raw_reply, &intake);
        let conversation_complete = intake.is_complete();

        tracing::info!(conversation_complete, "Intake chat turn processed");

        Ok(ChatOutcome {
            reply,
            intake,
            conversation_complete,
        })
    }
}
