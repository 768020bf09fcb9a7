//! Detection handlers.
//!
//! The three detection routes share one handler body and differ only in the
//! [`DetectionProfile`] they run with.

use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use facemerge_models::SummaryResponse;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::services::{DetectionProfile, ResponseShape};
use crate::state::AppState;

/// Multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "file";

/// Face++ head pose, eye status and emotion.
pub async fn detect_attributes(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    run_detection(&state, &DetectionProfile::ATTRIBUTES, multipart).await
}

/// Emotions from both providers and their consensus.
pub async fn detect_emotions_consensus(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    run_detection(&state, &DetectionProfile::CONSENSUS, multipart).await
}

/// Everything, as human-readable text.
pub async fn detect_emotions_summary(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    run_detection(&state, &DetectionProfile::SUMMARY, multipart).await
}

async fn run_detection(
    state: &AppState,
    profile: &DetectionProfile,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let image = read_upload(&mut multipart).await?;

    debug!(profile = profile.name, bytes = image.len(), "Image upload received");
    metrics::record_upload_size(image.len());

    let report = state.detection.detect(profile, &image).await?;

    Ok(match profile.shape {
        ResponseShape::Structured => Json(report).into_response(),
        ResponseShape::Summary => Json(SummaryResponse::from(&report)).into_response(),
    })
}

/// Read the `file` field fully into memory.
async fn read_upload(multipart: &mut Multipart) -> ApiResult<Bytes> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let data = field.bytes().await.map_err(upload_error)?;
        if data.is_empty() {
            return Err(ApiError::bad_request("Uploaded file is empty"));
        }
        return Ok(data);
    }

    Err(ApiError::bad_request(format!(
        "Missing '{}' field in multipart form",
        UPLOAD_FIELD
    )))
}

fn upload_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::bad_request(err.body_text())
    }
}
