//! v1 prescription upload handler.

use axum::extract::{Multipart, State};

use crate::api::v1::dto::UploadPrescriptionResponse;
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::extraction::parse_extraction;

const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/png",
];

/// `POST /api/v1/upload-prescription`
///
/// Accepts a multipart `file` part (PDF/JPEG/PNG, max 10 MiB), hands the
/// bytes to the multimodal collaborator, and returns the parsed prescription.
/// A reply the parser cannot make sense of is a 200 with `success == false`
/// and the raw model text attached.
#[utoipa::path(
    post,
    path = "/api/v1/upload-prescription",
    tag = "prescription",
    responses(
        (status = 200, description = "Extraction attempted", body = UploadPrescriptionResponse),
        (status = 400, description = "Invalid upload", body = ApiError),
        (status = 501, description = "Vision collaborator not configured", body = ApiError),
    )
)]
pub async fn upload_prescription(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResponse<UploadPrescriptionResponse> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut declared_mime: Option<String> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            if let Some(name) = field.file_name() {
                file_name = Some(name.to_string());
            }
            if let Some(content_type) = field.content_type() {
                declared_mime = Some(content_type.to_string());
            }

            let bytes = match field.bytes().await {
                Ok(b) => b,
                Err(e) => {
                    return ApiResponse::error(
                        ErrorCode::InvalidRequest,
                        format!("Failed to read file: {e}"),
                    );
                }
            };

            if bytes.len() > state.config.upload.max_bytes {
                return ApiResponse::error(
                    ErrorCode::InvalidRequest,
                    format!(
                        "File too large: {} bytes (max {} bytes)",
                        bytes.len(),
                        state.config.upload.max_bytes
                    ),
                );
            }

            file_bytes = Some(bytes.to_vec());
        }
    }

    let Some(file_bytes) = file_bytes else {
        return ApiResponse::error(ErrorCode::InvalidRequest, "Missing 'file' field");
    };

    let Some(declared_mime) = declared_mime else {
        return ApiResponse::error(
            ErrorCode::InvalidRequest,
            "File part must declare a content type",
        );
    };

    if !ALLOWED_MIME_TYPES.contains(&declared_mime.as_str()) {
        return ApiResponse::error(
            ErrorCode::InvalidRequest,
            format!(
                "Invalid file type. Allowed types: PDF, JPEG, JPG, PNG. Got: {declared_mime}"
            ),
        );
    }

    // declared type can lie; sniff the bytes and reject a mismatch rather
    // than forwarding mislabelled content to the collaborator
    if let Some(kind) = infer::get(&file_bytes) {
        if !ALLOWED_MIME_TYPES.contains(&kind.mime_type()) {
            return ApiResponse::error(
                ErrorCode::InvalidRequest,
                format!(
                    "File content does not match an accepted type (detected {})",
                    kind.mime_type()
                ),
            );
        }
    }

    tracing::info!(
        file_name = file_name.as_deref().unwrap_or("<unnamed>"),
        mime = %declared_mime,
        size = file_bytes.len(),
        "Processing prescription upload"
    );

    let raw = match state
        .vision
        .extract_prescription(&file_bytes, &declared_mime)
        .await
    {
        Ok(raw) => raw,
        Err(e) => return e.into(),
    };

    let outcome = parse_extraction(&raw);
    ApiResponse::success(UploadPrescriptionResponse::from(outcome))
}
