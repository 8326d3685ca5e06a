//! Handlers for bout annotations.
//!
//! Create and update requests go through [`AnnotationEditor`] exactly as the
//! dialog in the client does: the `M:SS` text wins when it parses, the
//! numeric time is the fallback, and blank notes are refused.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use riposte_core::annotation::{
    validate_annotation_time, AnnotationCategory, AnnotationPatch,
};
use riposte_core::editor::AnnotationEditor;
use riposte_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::handlers::{load_session, parse_annotation_id, parse_session_id};
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
   Request bodies
   -------------------------------------------------------------------------- */

/// Editor form fields. On create, a missing `time` means "the current
/// playback position"; on update, missing fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct AnnotationForm {
    pub time: Option<f64>,
    /// Timestamp as typed, in `M:SS` form.
    pub time_input: Option<String>,
    pub category: Option<String>,
    pub text: Option<String>,
}

impl AnnotationForm {
    /// Load the form's fields into `editor`.
    fn fill(&self, editor: &mut AnnotationEditor) -> Result<(), CoreError> {
        if let Some(time) = self.time {
            validate_annotation_time(time)?;
            editor.set_time(time);
        }
        if let Some(ref input) = self.time_input {
            editor.set_time_input(input.clone());
        }
        if let Some(ref category) = self.category {
            editor.set_category(AnnotationCategory::from_str(category)?);
        }
        if let Some(ref text) = self.text {
            editor.set_text(text.clone());
        }
        Ok(())
    }

    fn touches_time(&self) -> bool {
        self.time.is_some() || self.time_input.is_some()
    }
}

/* --------------------------------------------------------------------------
   Handlers
   -------------------------------------------------------------------------- */

/// GET /sessions/{id}/annotations
///
/// List a session's annotations in display order (ascending time).
pub async fn list_annotations(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let session_id = parse_session_id(&session_id)?;
    let session = load_session(&state, session_id).await?;
    let annotations: Vec<_> = session.annotations_by_time().into_iter().cloned().collect();
    Ok(Json(DataResponse { data: annotations }))
}

/// POST /sessions/{id}/annotations
///
/// Create an annotation from the editor form.
pub async fn create_annotation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(form): Json<AnnotationForm>,
) -> AppResult<impl IntoResponse> {
    let session_id = parse_session_id(&session_id)?;
    let session = load_session(&state, session_id).await?;

    let mut editor = AnnotationEditor::open(session.playback.current_time(), None)
        .with_max_time(session.duration());
    form.fill(&mut editor)?;
    let input = editor.submit()?;

    let annotation = state.store.append_annotation(session_id, input).await?;

    tracing::info!(
        session_id = %session_id,
        annotation_id = %annotation.id,
        time = annotation.time,
        category = annotation.category.as_str(),
        "Annotation created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: annotation })))
}

/// PUT /sessions/{id}/annotations/{ann_id}
///
/// Merge the supplied fields into an annotation.
pub async fn update_annotation(
    State(state): State<AppState>,
    Path((session_id, ann_id)): Path<(String, String)>,
    Json(form): Json<AnnotationForm>,
) -> AppResult<impl IntoResponse> {
    let session_id = parse_session_id(&session_id)?;
    let ann_id = parse_annotation_id(&ann_id)?;
    let session = load_session(&state, session_id).await?;
    let existing = session
        .find_annotation(ann_id)
        .ok_or_else(|| CoreError::not_found("Annotation", ann_id))?;

    let mut editor = AnnotationEditor::open(session.playback.current_time(), Some(existing))
        .with_max_time(session.duration());
    form.fill(&mut editor)?;
    let edited = editor.submit()?;

    let patch = AnnotationPatch {
        time: form.touches_time().then_some(edited.time),
        category: form.category.is_some().then_some(edited.category),
        text: form.text.is_some().then_some(edited.text),
    };
    if patch.is_empty() {
        return Err(AppError::BadRequest("No annotation fields to update".into()));
    }
    let annotation = state
        .store
        .update_annotation(session_id, ann_id, patch)
        .await?;

    tracing::info!(
        session_id = %session_id,
        annotation_id = %ann_id,
        "Annotation updated"
    );

    Ok(Json(DataResponse { data: annotation }))
}

/// DELETE /sessions/{id}/annotations/{ann_id}
pub async fn delete_annotation(
    State(state): State<AppState>,
    Path((session_id, ann_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let session_id = parse_session_id(&session_id)?;
    let ann_id = parse_annotation_id(&ann_id)?;

    state.store.delete_annotation(session_id, ann_id).await?;

    tracing::info!(
        session_id = %session_id,
        annotation_id = %ann_id,
        "Annotation deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
