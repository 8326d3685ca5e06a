//! Handler for `/media`: serves uploaded bouts to the player.
//!
//! Supports single `Range: bytes=START-END` requests so the player can
//! scrub without downloading the whole file.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{self, HeaderMap};
use axum::http::StatusCode;
use axum::response::Response;

use riposte_core::error::CoreError;
use riposte_core::types::MediaRef;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Largest chunk served for an open-ended range (1 MiB).
const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// Parse a `Range: bytes=START-END` header value.
/// Returns `(start, optional_end)`. A range ending before it starts is
/// invalid and yields `None`, so the whole file is served.
fn parse_range_header(range: &str) -> Option<(usize, Option<usize>)> {
    let range = range.strip_prefix("bytes=")?;
    let (start, end) = range.split_once('-')?;
    let start = start.trim().parse::<usize>().ok()?;
    let end = match end.trim() {
        "" => None,
        end => Some(end.parse::<usize>().ok()?),
    };
    if end.is_some_and(|end| end < start) {
        return None;
    }
    Some((start, end))
}

fn build(builder: axum::http::response::Builder, body: Body) -> AppResult<Response> {
    builder
        .body(body)
        .map_err(|e| AppError::InternalError(e.to_string()))
}

/// GET /api/v1/media/{media_ref}
///
/// Revoked or unknown references are 404.
pub async fn stream_media(
    State(state): State<AppState>,
    Path(raw_ref): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let media_ref: MediaRef = raw_ref
        .parse()
        .map_err(|_| CoreError::not_found("Media", &raw_ref))?;
    let blob = state
        .store
        .media()
        .resolve(media_ref)
        .await
        .ok_or_else(|| CoreError::not_found("Media", media_ref))?;

    let size = blob.len();

    if let Some(range_value) = headers.get(header::RANGE) {
        let range_str = range_value
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid Range header".into()))?;

        if let Some((start, end)) = parse_range_header(range_str) {
            if start >= size {
                return build(
                    Response::builder()
                        .status(StatusCode::RANGE_NOT_SATISFIABLE)
                        .header(header::CONTENT_RANGE, format!("bytes */{size}")),
                    Body::empty(),
                );
            }

            let end = end
                .map(|e| e.min(size - 1))
                .unwrap_or_else(|| (start + MAX_CHUNK_SIZE - 1).min(size - 1));
            let chunk = blob.data.slice(start..=end);

            return build(
                Response::builder()
                    .status(StatusCode::PARTIAL_CONTENT)
                    .header(header::CONTENT_TYPE, blob.content_type.as_str())
                    .header(header::CONTENT_LENGTH, chunk.len().to_string())
                    .header(header::CONTENT_RANGE, format!("bytes {start}-{end}/{size}"))
                    .header(header::ACCEPT_RANGES, "bytes"),
                Body::from(chunk),
            );
        }
    }

    // No usable Range header: serve the whole upload.
    build(
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, blob.content_type.as_str())
            .header(header::CONTENT_LENGTH, size.to_string())
            .header(header::ACCEPT_RANGES, "bytes"),
        Body::from(blob.data),
    )
}
