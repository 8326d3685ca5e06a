//! Handlers for the `/sessions` resource: uploading, listing, fetching and
//! removing bout videos.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use riposte_core::error::CoreError;
use riposte_core::media::MediaUpload;
use riposte_core::upload::{validate_media_size, validate_media_type};

use crate::error::{AppError, AppResult};
use crate::handlers::{load_session, parse_session_id};
use crate::response::DataResponse;
use crate::state::AppState;

/// Room for multipart boundaries, part headers and the `opponent` field on
/// top of the video itself.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Map a multipart read failure. Hitting the body limit means the video is
/// too large, which is a validation failure like any other size check.
fn multipart_error(err: MultipartError, max_upload_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        CoreError::Validation(format!(
            "Uploaded video exceeds the maximum of {max_upload_bytes} bytes"
        ))
        .into()
    } else {
        AppError::BadRequest(err.body_text())
    }
}

/// GET /api/v1/sessions
///
/// List uploaded bouts, newest first.
pub async fn list_sessions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let sessions = state.store.list_sessions().await;
    Ok(Json(DataResponse { data: sessions }))
}

/// POST /api/v1/sessions
///
/// Accepts a multipart form with a required `file` field (any `video/*`
/// type) and an optional `opponent` field, and opens a review session for
/// the upload.
pub async fn create_session(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let max_upload_bytes = state.config.max_upload_bytes;
    let mut upload: Option<MediaUpload> = None;
    let mut opponent: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload_bytes))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("bout").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                // Reject before buffering the body.
                validate_media_type(&content_type)?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, max_upload_bytes))?;
                upload = Some(MediaUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            "opponent" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, max_upload_bytes))?;
                opponent = Some(text);
            }
            _ => {} // ignore unknown fields
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    validate_media_size(upload.data.len(), max_upload_bytes)?;

    let file_name = upload.file_name.clone();
    let size_bytes = upload.data.len();
    let session = state
        .store
        .create_session(upload, opponent.as_deref())
        .await?;

    tracing::info!(
        session_id = %session.id,
        file_name = %file_name,
        size_bytes,
        opponent = %session.opponent,
        "Bout video uploaded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_session_id(&id)?;
    let session = load_session(&state, id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// DELETE /api/v1/sessions/{id}
///
/// Remove a session and release its uploaded media.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_session_id(&id)?;
    let removed = state.store.remove_session(id).await?;

    tracing::info!(
        session_id = %id,
        annotation_count = removed.annotations.len(),
        "Bout session removed"
    );

    Ok(StatusCode::NO_CONTENT)
}
