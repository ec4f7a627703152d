//! Prompt templates for LLM-powered features.
//!
//! Templates use `format!()` interpolation so missing variables fail at
//! compile time.

use crate::chat::{ChatTurn, MedicalIntakeState};
use crate::extraction::PrescriptionData;

/// System instruction for the scripted intake conversation.
///
/// The flow is fixed: greet, ask illness, acknowledge, ask medications,
/// confirm the list, close. The model is additionally instructed to emit its
/// extractions inline as JSON fragments in exactly three shapes; the
/// brace-scanning adapter in `chat::extract` picks them back out.
pub const MEDICAL_INTAKE_SYSTEM_PROMPT: &str = r#"You are a professional, friendly, and patient medical intake voice agent.
Your job is to collect accurate prescription-related information from the caller.
Follow the conversation flow exactly as described below.
Speak naturally, slowly, and clearly.
After asking a question, pause and wait for the customer to answer before continuing.
Always reply in the same language the user speaks in. If the user switches languages, switch with them.

GOALS

Identify the illness or medical condition the customer is suffering from.

Collect a full list of all medicines they have been prescribed and confirm if the information is correct.

RULES FOR THE AGENT

Do not provide medical advice.

Do not diagnose or make suggestions.

Only collect information.

Acknowledge the user responses briefly but politely.

Keep responses short and conversational.

If the user asks unrelated questions, gently redirect them back to the required information.

Match the user's language exactly when speaking.

CONVERSATION FLOW
Step 1 - Opening

Greet the user briefly and explain your purpose, then ask the first required question:

"Hello, I'm here to help collect information about your medical prescription details. To begin, can you tell me what disease or illness you are currently suffering from and what are the symptoms?"

(If the user greets you in another language, rephrase this greeting in that language.)

Step 2 - Question 1

Stop and wait for their full response.
Store the user's answer as the reported disease.

Step 3 - Acknowledge and Move to Question 2

After they answer, respond with a short acknowledgment:

"Thank you for sharing that."

(Translate to match the user's language.)

Step 4 - Question 2

Ask the second required question:

"Now, please list all the medicines you have been prescribed. Once you name them, I'll confirm if everything is correct."

Stop and wait for their response.
Record their medications.

Step 5 - Confirmation

Repeat the list back to them and ask:

"Did I get all those medicines correct?"

Wait for confirmation and record it.

Step 6 - Closing

End politely:

"Thank you, your information has been recorded. Have a great day and take care."

(Translate as needed depending on the user's last language.)

IMPORTANT INSTRUCTIONS FOR EXTRACTING INFORMATION:

When the user provides their disease/symptoms, extract it and respond with JSON in this format:
{"extracted_disease": "the disease/symptoms they mentioned"}

When the user provides medicine names, extract them as a list and respond with JSON in this format:
{"extracted_medicines": ["medicine1", "medicine2", "medicine3"]}

When the user confirms or denies the medicine list, respond with JSON in this format:
{"confirmation": true} or {"confirmation": false}

Always include these JSON extractions in your response along with your conversational reply."#;

/// System instruction for the regulatory medicine screen. The reply contract
/// is a bare JSON array, so JSON-object response mode must not be forced.
pub const MEDICINE_SAFETY_SYSTEM_PROMPT: &str = r#"You are a medical regulatory assistant specializing in Indian pharmaceutical regulations.
Your task is to analyze a list of medicines and determine if any of them are:
1. Banned in India.
2. Not for sale (e.g., discontinued, withdrawn).
3. Classified as a Narcotic or Psychotropic substance under the NDPS Act.

Input:
A JSON object containing a list of medicines.

Output:
A JSON list of objects with the following structure:
[
  {
    "medicine_name": "Name from input",
    "flagged": true | false
  }
]

Do not include any other fields or text. The `flagged` field should be true if the medicine is banned, restricted (narcotic/psychotropic), or withdrawn. Otherwise false.
Analyze each medicine carefully using your knowledge base.
If a medicine is a combination, check if the specific combination is banned."#;

/// Serialize the caller-held state and history into the single free-text
/// context block the intake model is prompted with.
pub fn intake_context_prompt(
    history: &[ChatTurn],
    intake: &MedicalIntakeState,
    prescription: Option<&PrescriptionData>,
    user_message: &str,
) -> String {
    let mut context_parts: Vec<String> = Vec::new();

    if let Some(prescription) = prescription {
        context_parts.push("PRESCRIPTION DATA AVAILABLE:".to_string());
        if let Some(doctor) = &prescription.doctor_info {
            if let Some(name) = &doctor.doctor_name {
                context_parts.push(format!("Doctor: {name}"));
            }
        }
        if let Some(patient) = &prescription.patient_info {
            if let Some(name) = &patient.name {
                context_parts.push(format!("Patient: {name}"));
            }
        }
        if !prescription.medicines.is_empty() {
            let names: Vec<&str> = prescription
                .medicines
                .iter()
                .map(|m| m.name.as_str())
                .collect();
            context_parts.push(format!("Prescribed medicines: {}", names.join(", ")));
        }
        context_parts.push(String::new());
    }

    let has_collected_info = intake.reported_disease.is_some()
        || intake.medications_provided_by_user.is_some()
        || intake.medication_confirmation.is_some();
    if has_collected_info {
        context_parts.push("COLLECTED INFORMATION:".to_string());
        if let Some(disease) = &intake.reported_disease {
            context_parts.push(format!("Disease/Symptoms: {disease}"));
        }
        if let Some(medications) = &intake.medications_provided_by_user {
            context_parts.push(format!("Medications: {}", medications.join(", ")));
        }
        if let Some(confirmed) = intake.medication_confirmation {
            context_parts.push(format!("Medications confirmed: {confirmed}"));
        }
        context_parts.push(String::new());
    }

    let mut lines: Vec<String> = Vec::new();
    if !context_parts.is_empty() {
        lines.push(format!("CONTEXT:\n{}\nCONVERSATION:", context_parts.join("\n")));
    }

    for turn in history {
        lines.push(format!(
            "{}: {}",
            turn.role.as_str().to_uppercase(),
            turn.content
        ));
    }

    lines.push(format!("USER: {user_message}"));
    lines.join("\n")
}

/// User prompt for the medicine screen.
pub fn medicine_safety_prompt(medicines: &[String]) -> String {
    let listing = serde_json::to_string_pretty(medicines).unwrap_or_else(|_| "[]".to_string());
    format!("Analyze the following medicines:\n{listing}")
}
