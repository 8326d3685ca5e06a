pub mod annotation;
pub mod media;
pub mod playback;
pub mod review;
pub mod session;

use riposte_core::error::CoreError;
use riposte_core::store::VideoSession;
use riposte_core::types::{AnnotationId, SessionId};

use crate::error::AppResult;
use crate::state::AppState;

/// Parse a session id from a path segment.
///
/// A segment that is not a valid id cannot name an existing session, so it
/// is reported as not found rather than as a malformed request.
pub(crate) fn parse_session_id(raw: &str) -> AppResult<SessionId> {
    raw.parse()
        .map_err(|_| CoreError::not_found("VideoSession", raw).into())
}

pub(crate) fn parse_annotation_id(raw: &str) -> AppResult<AnnotationId> {
    raw.parse()
        .map_err(|_| CoreError::not_found("Annotation", raw).into())
}

/// Load a session snapshot or fail with 404.
pub(crate) async fn load_session(state: &AppState, id: SessionId) -> AppResult<VideoSession> {
    state
        .store
        .get_session(id)
        .await
        .ok_or_else(|| CoreError::not_found("VideoSession", id).into())
}
