use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Doctor block of an extracted prescription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DoctorInfo {
    pub hospital_name: Option<String>,
    pub hospital_address: Option<String>,
    pub doctor_name: Option<String>,
    pub registration_number: Option<String>,
}

/// Patient block of an extracted prescription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PatientInfo {
    pub name: Option<String>,
    pub age: Option<String>,
    pub patient_id: Option<String>,
    pub date: Option<String>,
}

/// One prescribed medicine, normalized to the canonical schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Medicine {
    pub name: String,
    pub dosage: Option<String>,
    pub dosage_instruction: Option<String>,
    pub timing: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PrescriptionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_info: Option<DoctorInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_info: Option<PatientInfo>,
    #[serde(default)]
    pub medicines: Vec<Medicine>,
}

/// Result of parsing the model's reply. A reply that is not the agreed JSON
/// is a `Failed` value carrying the raw text, never an `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Extracted(PrescriptionData),
    Failed { error: String, raw_response: String },
}

/// Alias table mapping canonicalized medicine keys to the fixed schema.
/// Keys are canonicalized (lowercased, spaces/hyphens to underscores) before
/// lookup; anything unmapped is dropped and logged, never guessed at.
const MEDICINE_KEY_ALIASES: &[(&str, &str)] = &[
    ("name", "name"),
    ("medicine_name", "name"),
    ("medicine", "name"),
    ("drug", "name"),
    ("drug_name", "name"),
    ("dosage", "dosage"),
    ("dose", "dosage"),
    ("strength", "dosage"),
    ("dosage_instruction", "dosage_instruction"),
    ("dosage_instructions", "dosage_instruction"),
    ("instruction", "dosage_instruction"),
    ("instructions", "dosage_instruction"),
    ("frequency", "dosage_instruction"),
    ("timing", "timing"),
    ("food_timing", "timing"),
    ("duration", "duration"),
    ("course_duration", "duration"),
];

const DOCTOR_KEY_ALIASES: &[(&str, &str)] = &[
    ("hospital_name", "hospital_name"),
    ("hospital", "hospital_name"),
    ("hospital_address", "hospital_address"),
    ("address", "hospital_address"),
    ("doctor_name", "doctor_name"),
    ("name", "doctor_name"),
    ("registration_number", "registration_number"),
    ("registration_no", "registration_number"),
    ("reg_no", "registration_number"),
];

const PATIENT_KEY_ALIASES: &[(&str, &str)] = &[
    ("name", "name"),
    ("patient_name", "name"),
    ("age", "age"),
    ("patient_id", "patient_id"),
    ("id", "patient_id"),
    ("date", "date"),
    ("prescription_date", "date"),
];

fn canonical_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Remap an object's keys through an alias table. Unmapped keys are dropped
/// and logged at debug level.
fn remap_object(object: &Map<String, Value>, aliases: &[(&str, &str)], what: &str) -> Map<String, Value> {
    let mut remapped = Map::new();
    for (key, value) in object {
        let canonical = canonical_key(key);
        match aliases.iter().find(|(alias, _)| *alias == canonical) {
            Some((_, target)) => {
                remapped.insert((*target).to_string(), value.clone());
            }
            None => {
                tracing::debug!(key = %key, what, "Dropping unmapped extraction key");
            }
        }
    }
    remapped
}

fn parse_doctor_info(value: &Value) -> Option<DoctorInfo> {
    let object = value.as_object()?;
    let remapped = remap_object(object, DOCTOR_KEY_ALIASES, "doctor_info");
    Some(DoctorInfo {
        hospital_name: remapped.get("hospital_name").and_then(value_to_string),
        hospital_address: remapped.get("hospital_address").and_then(value_to_string),
        doctor_name: remapped.get("doctor_name").and_then(value_to_string),
        registration_number: remapped.get("registration_number").and_then(value_to_string),
    })
}

fn parse_patient_info(value: &Value) -> Option<PatientInfo> {
    let object = value.as_object()?;
    let remapped = remap_object(object, PATIENT_KEY_ALIASES, "patient_info");
    Some(PatientInfo {
        name: remapped.get("name").and_then(value_to_string),
        age: remapped.get("age").and_then(value_to_string),
        patient_id: remapped.get("patient_id").and_then(value_to_string),
        date: remapped.get("date").and_then(value_to_string),
    })
}

fn parse_medicine(value: &Value) -> Option<Medicine> {
    let object = value.as_object()?;
    let remapped = remap_object(object, MEDICINE_KEY_ALIASES, "medicine");

    let Some(name) = remapped.get("name").and_then(value_to_string) else {
        tracing::debug!("Skipping medicine entry without a recognisable name key");
        return None;
    };

    Some(Medicine {
        name,
        dosage: remapped.get("dosage").and_then(value_to_string),
        dosage_instruction: remapped.get("dosage_instruction").and_then(value_to_string),
        timing: remapped.get("timing").and_then(value_to_string),
        duration: remapped.get("duration").and_then(value_to_string),
    })
}

/// Strip a surrounding markdown code fence, if present, and return the
/// payload slice. Mirrors the tolerance the model actually needs: a
/// ```` ```json ```` fence, a bare ```` ``` ```` fence, or none.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(start) = trimmed.find("```json") {
        let body = &trimmed[start + 7..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
        return body.trim();
    }
    if let Some(start) = trimmed.find("```") {
        let body = &trimmed[start + 3..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
        return body.trim();
    }
    trimmed
}

/// Parse the model reply into [`PrescriptionData`].
///
/// Tolerates markdown fences and key-spelling drift; a reply that is not
/// valid JSON (or not an object) comes back as
/// [`ExtractionOutcome::Failed`] carrying the raw text for diagnosis.
pub fn parse_extraction(raw: &str) -> ExtractionOutcome {
    let payload = strip_code_fence(raw);

    let value: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(e) => {
            return ExtractionOutcome::Failed {
                error: format!("Failed to parse JSON response: {e}"),
                raw_response: raw.to_string(),
            };
        }
    };

    let Some(object) = value.as_object() else {
        return ExtractionOutcome::Failed {
            error: "Extraction response is not a JSON object".to_string(),
            raw_response: raw.to_string(),
        };
    };

    let doctor_info = object.get("doctor_info").and_then(parse_doctor_info);
    let patient_info = object.get("patient_info").and_then(parse_patient_info);
    let medicines = object
        .get("medicines")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(parse_medicine).collect())
        .unwrap_or_default();

    ExtractionOutcome::Extracted(PrescriptionData {
        doctor_info,
        patient_info,
        medicines,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use serde_json::json;

    #[test]
    fn parses_the_canonical_reply_shape() {
        let raw = json!({
            "doctor_info": {
                "hospital_name": "City Hospital",
                "hospital_address": "12 MG Road",
                "doctor_name": "Dr. Ramesh Kumar",
                "registration_number": "42783"
            },
            "patient_info": {
                "name": "Anita Desai",
                "age": 34,
                "patient_id": "P-1009",
                "date": "2024-11-02"
            },
            "medicines": [
                {
                    "medicine_name": "Paracetamol",
                    "dosage": "500mg",
                    "dosage_instruction": "1-0-1",
                    "timing": "AF",
                    "duration": "5 days"
                }
            ]
        })
        .to_string();

        let ExtractionOutcome::Extracted(data) = parse_extraction(&raw) else {
            panic!("expected successful extraction");
        };

        let doctor = data.doctor_info.expect("doctor info");
        assert_eq!(doctor.doctor_name.as_deref(), Some("Dr. Ramesh Kumar"));
        assert_eq!(doctor.registration_number.as_deref(), Some("42783"));

        let patient = data.patient_info.expect("patient info");
        assert_eq!(patient.age.as_deref(), Some("34"));

        assert_eq!(data.medicines.len(), 1);
        assert_eq!(data.medicines[0].name, "Paracetamol");
        assert_eq!(data.medicines[0].timing.as_deref(), Some("AF"));
    }

    #[test]
    fn medicine_keys_with_drifting_spellings_are_remapped() {
        let raw = json!({
            "medicines": [
                {
                    "Medicine Name": "Ibuprofen",
                    "Dose": "400mg",
                    "Frequency": "twice daily",
                    "Food-Timing": "BF",
                    "Course Duration": "1 week",
                    "manufacturer": "should be dropped"
                }
            ]
        })
        .to_string();

        let ExtractionOutcome::Extracted(data) = parse_extraction(&raw) else {
            panic!("expected successful extraction");
        };

        let medicine = &data.medicines[0];
        assert_eq!(medicine.name, "Ibuprofen");
        assert_eq!(medicine.dosage.as_deref(), Some("400mg"));
        assert_eq!(medicine.dosage_instruction.as_deref(), Some("twice daily"));
        assert_eq!(medicine.timing.as_deref(), Some("BF"));
        assert_eq!(medicine.duration.as_deref(), Some("1 week"));
    }

    #[test]
    fn medicine_without_a_name_is_skipped() {
        let raw = json!({
            "medicines": [
                { "dosage": "500mg" },
                { "name": "Aspirin" }
            ]
        })
        .to_string();

        let ExtractionOutcome::Extracted(data) = parse_extraction(&raw) else {
            panic!("expected successful extraction");
        };
        assert_eq!(data.medicines.len(), 1);
        assert_eq!(data.medicines[0].name, "Aspirin");
    }

    #[test]
    fn json_fenced_reply_is_unwrapped() {
        let raw = "Here is the data:\n```json\n{\"medicines\": [{\"name\": \"Cetirizine\"}]}\n```";
        let ExtractionOutcome::Extracted(data) = parse_extraction(raw) else {
            panic!("expected successful extraction");
        };
        assert_eq!(data.medicines[0].name, "Cetirizine");
    }

    #[test]
    fn bare_fenced_reply_is_unwrapped() {
        let raw = "```\n{\"medicines\": []}\n```";
        assert!(matches!(
            parse_extraction(raw),
            ExtractionOutcome::Extracted(_)
        ));
    }

    #[test]
    fn invalid_json_is_a_failed_outcome_with_raw_text() {
        let raw = "The image is too blurry to read.";
        let ExtractionOutcome::Failed {
            error,
            raw_response,
        } = parse_extraction(raw)
        else {
            panic!("expected failed extraction");
        };
        assert!(error.contains("Failed to parse JSON"));
        assert_eq!(raw_response, raw);
    }

    #[test]
    fn non_object_json_is_a_failed_outcome() {
        assert!(matches!(
            parse_extraction("[1, 2, 3]"),
            ExtractionOutcome::Failed { .. }
        ));
    }

    #[test]
    fn missing_blocks_yield_empty_prescription() {
        let ExtractionOutcome::Extracted(data) = parse_extraction("{}") else {
            panic!("expected successful extraction");
        };
        assert!(data.doctor_info.is_none());
        assert!(data.patient_info.is_none());
        assert!(data.medicines.is_empty());
    }
}
