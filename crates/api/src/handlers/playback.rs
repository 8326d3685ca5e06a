//! Handlers for the player timeline of a session.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use riposte_core::annotation::{count_by_category, CategoryCount};
use riposte_core::error::CoreError;
use riposte_core::store::VideoSession;
use riposte_core::timeline::{MediaEvent, PlaybackView, SkipDirection, TimelineMarker};

use crate::error::AppResult;
use crate::handlers::{load_session, parse_session_id};
use crate::response::DataResponse;
use crate::state::AppState;

/// Playback state plus everything drawn on the timeline track.
#[derive(Debug, Serialize)]
pub struct TimelineView {
    pub playback: PlaybackView,
    pub markers: Vec<TimelineMarker>,
    pub legend: Vec<CategoryCount>,
}

impl TimelineView {
    pub fn for_session(session: &VideoSession) -> Self {
        Self {
            playback: session.playback.view(),
            markers: session.timeline_markers(),
            legend: count_by_category(&session.annotations),
        }
    }
}

/// A click on the timeline track, in pixels.
#[derive(Debug, Deserialize)]
pub struct SeekRequest {
    pub offset_x: f64,
    pub track_width: f64,
}

/// A press of the skip back / skip forward control.
#[derive(Debug, Deserialize)]
pub struct SkipRequest {
    pub direction: SkipDirection,
}

/// GET /sessions/{id}/timeline
pub async fn get_timeline(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let session_id = parse_session_id(&session_id)?;
    let session = load_session(&state, session_id).await?;
    Ok(Json(DataResponse {
        data: TimelineView::for_session(&session),
    }))
}

/// POST /sessions/{id}/playback
///
/// Report a media element event (`{"event": "can_play"}`,
/// `{"event": "time_update", "time": 12.4}`, ...).
pub async fn report_event(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(event): Json<MediaEvent>,
) -> AppResult<impl IntoResponse> {
    let session_id = parse_session_id(&session_id)?;
    let view = state.store.apply_playback_event(session_id, event).await?;

    tracing::debug!(
        session_id = %session_id,
        ?event,
        state = ?view.state,
        "Playback event applied"
    );

    Ok(Json(DataResponse { data: view }))
}

/// POST /sessions/{id}/seek
///
/// Translate a click on the timeline into a seek.
pub async fn seek(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SeekRequest>,
) -> AppResult<impl IntoResponse> {
    let session_id = parse_session_id(&session_id)?;
    if !request.track_width.is_finite() || request.track_width <= 0.0 {
        return Err(CoreError::Validation("track_width must be a positive number".into()).into());
    }

    let view = state
        .store
        .seek(session_id, request.offset_x, request.track_width)
        .await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /sessions/{id}/skip
pub async fn skip(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SkipRequest>,
) -> AppResult<impl IntoResponse> {
    let session_id = parse_session_id(&session_id)?;
    let view = state.store.skip(session_id, request.direction).await?;
    Ok(Json(DataResponse { data: view }))
}
