use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::intake::MedicalIntakeState;

/// Non-nested brace-delimited fragments. The three agreed extraction shapes
/// are all flat objects, so one nesting level is enough.
fn fragment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{[^{}]*\}").expect("valid pattern"))
}

fn fence_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?m)^[ \t]*```[a-zA-Z]*[ \t]*$").expect("valid pattern"))
}

fn blank_run_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n[ \t]*\n([ \t]*\n)+").expect("valid pattern"))
}

fn merge_fragment(fragment: &Value, state: &mut MedicalIntakeState) {
    let Some(object) = fragment.as_object() else {
        return;
    };

    if let Some(disease) = object.get("extracted_disease").and_then(Value::as_str) {
        state.reported_disease = Some(disease.to_string());
    }

    if let Some(medicines) = object.get("extracted_medicines").and_then(Value::as_array) {
        let names: Vec<String> = medicines
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        state.medications_provided_by_user = Some(names);
    }

    if let Some(confirmation) = object.get("confirmation").and_then(Value::as_bool) {
        state.medication_confirmation = Some(confirmation);
    }
}

/// Pull the inline JSON extraction fragments out of a model reply.
///
/// Scans for brace-delimited substrings, parses each independently (failures
/// are discarded), merges recognised keys into the intake state, strips every
/// parsed fragment and any code-fence marker lines from the text, and
/// collapses runs of blank lines. If stripping leaves nothing, the raw reply
/// is returned so the caller never answers with an empty message.
pub fn extract_intake_fields(
    reply: &str,
    state: &MedicalIntakeState,
) -> (String, MedicalIntakeState) {
    let mut updated = state.clone();
    let mut clean = reply.to_string();

    for candidate in fragment_pattern().find_iter(reply) {
        let Ok(fragment) = serde_json::from_str::<Value>(candidate.as_str()) else {
            continue;
        };
        merge_fragment(&fragment, &mut updated);
        clean = clean.replace(candidate.as_str(), "");
    }

    let clean = fence_line_pattern().replace_all(&clean, "");
    let clean = blank_run_pattern().replace_all(&clean, "\n\n");
    let clean = clean.trim();

    let text = if clean.is_empty() {
        reply.trim().to_string()
    } else {
        clean.to_string()
    };

    (text, updated)
}
