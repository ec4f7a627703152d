//! Upload/extraction request-response DTOs.

use serde::{Deserialize, Serialize};

use crate::extraction::{ExtractionOutcome, PrescriptionData};

/// Response for `POST /v1/upload-prescription`.
///
/// Extraction failures (the model answered, but not with parseable JSON) are
/// a *successful* response with `success == false` and the raw reply kept
/// for diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadPrescriptionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PrescriptionData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl From<ExtractionOutcome> for UploadPrescriptionResponse {
    fn from(outcome: ExtractionOutcome) -> Self {
        match outcome {
            ExtractionOutcome::Extracted(data) => Self {
                success: true,
                data: Some(data),
                error: None,
                raw_response: None,
            },
            ExtractionOutcome::Failed {
                error,
                raw_response,
            } => Self {
                success: false,
                data: None,
                error: Some(error),
                raw_response: Some(raw_response),
            },
        }
    }
}
