use serde::{Deserialize, Serialize};

/// Fields collected over the intake conversation. The caller echoes this
/// back on every turn; the service only ever fills fields in, never clears
/// them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MedicalIntakeState {
    pub reported_disease: Option<String>,
    pub medications_provided_by_user: Option<Vec<String>>,
    pub medication_confirmation: Option<bool>,
}

impl MedicalIntakeState {
    /// The conversation is complete exactly when all three fields are set.
    pub fn is_complete(&self) -> bool {
        self.reported_disease.is_some()
            && self.medications_provided_by_user.is_some()
            && self.medication_confirmation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_when_all_three_fields_set() {
        let state = MedicalIntakeState {
            reported_disease: Some("fever".to_string()),
            medications_provided_by_user: Some(vec!["Paracetamol".to_string()]),
            medication_confirmation: Some(true),
        };
        assert!(state.is_complete());
    }

    #[test]
    fn incomplete_when_any_field_missing() {
        let mut state = MedicalIntakeState {
            reported_disease: Some("fever".to_string()),
            medications_provided_by_user: Some(vec!["Paracetamol".to_string()]),
            medication_confirmation: Some(false),
        };
        assert!(state.is_complete());

        state.medication_confirmation = None;
        assert!(!state.is_complete());

        state.medication_confirmation = Some(false);
        state.reported_disease = None;
        assert!(!state.is_complete());

        assert!(!MedicalIntakeState::default().is_complete());
    }

    #[test]
    fn a_denied_confirmation_still_counts_as_answered() {
        let state = MedicalIntakeState {
            reported_disease: Some("cough".to_string()),
            medications_provided_by_user: Some(vec![]),
            medication_confirmation: Some(false),
        };
        assert!(state.is_complete());
    }
}
