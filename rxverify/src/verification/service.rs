use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::registry::{RegistryLookup, RegistryRecord};
use super::similarity::name_similarity;

/// Outcome of a verification request. Matches are ordered by descending
/// similarity; `best_match`, when present, is `matches[0]`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VerificationResult {
    pub verified: bool,
    pub reason: String,
    pub matches: Vec<RegistryRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_match: Option<RegistryRecord>,
    pub total_matches: usize,
}

impl VerificationResult {
    fn unverified(reason: impl Into<String>) -> Self {
        Self {
            verified: false,
            reason: reason.into(),
            matches: Vec::new(),
            best_match: None,
            total_matches: 0,
        }
    }
}

/// Ranks register candidates against a queried doctor name and renders a
/// verified/unverified decision.
#[derive(Clone)]
pub struct VerificationService {
    registry: Arc<dyn RegistryLookup>,
    similarity_threshold: f64,
}

impl VerificationService {
    pub fn new(registry: Arc<dyn RegistryLookup>, similarity_threshold: f64) -> Self {
        Self {
            registry,
            similarity_threshold,
        }
    }

    /// Verify a doctor against the register.
    ///
    /// `medical_council` is accepted for interface compatibility but is not
    /// sent upstream and does not filter or re-rank results; the register is
    /// queried by registration number only.
    pub async fn verify_doctor(
        &self,
        doctor_name: &str,
        registration_no: &str,
        medical_council: Option<&str>,
    ) -> VerificationResult {
        let _ = medical_council;

        if registration_no.is_empty() {
            return VerificationResult::unverified("No registration number provided");
        }

        let candidates = self.registry.fetch_by_registration(registration_no).await;

        if candidates.is_empty() {
            return VerificationResult::unverified(format!(
                "No doctors found with registration number {registration_no}"
            ));
        }

        let mut matches: Vec<RegistryRecord> = candidates
            .into_iter()
            .map(|mut record| {
                let similarity = name_similarity(doctor_name, &record.doctor_name);
                record.name_similarity = Some((similarity * 1000.0).round() / 1000.0);
                record
            })
            .collect();

        // stable: ties keep register order
        matches.sort_by(|a, b| {
            b.name_similarity
                .partial_cmp(&a.name_similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let best_match = matches.first().cloned();
        let best_similarity = best_match
            .as_ref()
            .and_then(|record| record.name_similarity)
            .unwrap_or(0.0);

        let (verified, reason) = if best_similarity >= self.similarity_threshold {
            (
                true,
                format!(
                    "Doctor verified with {:.1}% name match",
                    best_similarity * 100.0
                ),
            )
        } else {
            (
                false,
                format!(
                    "Name similarity too low ({:.1}%). Possible match found but requires manual verification.",
                    best_similarity * 100.0
                ),
            )
        };

        VerificationResult {
            verified,
            reason,
            total_matches: matches.len(),
            best_match,
            matches,
        }
    }
}
