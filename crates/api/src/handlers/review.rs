//! The review page model: one request returns everything the review screen
//! renders for a bout.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use riposte_core::annotation::AnnotationCategory;
use riposte_core::store::VideoSession;
use riposte_core::timecode::format_timestamp;
use riposte_core::types::{AnnotationId, SessionId};

use crate::error::AppResult;
use crate::handlers::playback::TimelineView;
use crate::handlers::{load_session, parse_session_id};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReviewView {
    pub id: SessionId,
    /// Header line, e.g. `vs Marcus Chen`.
    pub title: String,
    pub date: String,
    pub playable_url: String,
    pub timeline: TimelineView,
    /// Label for the add button, e.g. `Add Annotation at 1:30`.
    pub add_label: String,
    pub annotation_count: usize,
    /// Annotations in display order.
    pub annotations: Vec<ReviewAnnotation>,
}

#[derive(Debug, Serialize)]
pub struct ReviewAnnotation {
    pub id: AnnotationId,
    pub time: f64,
    pub timestamp: String,
    pub category: AnnotationCategory,
    pub category_label: &'static str,
    pub text: String,
}

impl ReviewView {
    fn for_session(session: &VideoSession) -> Self {
        let annotations = session
            .annotations_by_time()
            .into_iter()
            .map(|a| ReviewAnnotation {
                id: a.id,
                time: a.time,
                timestamp: format_timestamp(a.time),
                category: a.category,
                category_label: a.category.label(),
                text: a.text.clone(),
            })
            .collect();

        Self {
            id: session.id,
            title: format!("vs {}", session.opponent),
            date: session.date.clone(),
            playable_url: session.playable_url.clone(),
            timeline: TimelineView::for_session(session),
            add_label: format!(
                "Add Annotation at {}",
                format_timestamp(session.playback.current_time())
            ),
            annotation_count: session.annotations.len(),
            annotations,
        }
    }
}

/// GET /review/{id}
///
/// A missing bout yields 404 with `"redirect": "/"`.
pub async fn get_review(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let session_id = parse_session_id(&session_id)?;
    let session = load_session(&state, session_id).await?;
    Ok(Json(DataResponse {
        data: ReviewView::for_session(&session),
    }))
}
