//! Route definitions for the `/sessions` resource and its sub-resources.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::session::MULTIPART_OVERHEAD_BYTES;
use crate::handlers::{annotation, playback, session};
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET    /                                  list_sessions
/// POST   /                                  create_session (multipart)
/// GET    /{id}                              get_session
/// DELETE /{id}                              delete_session
/// GET    /{id}/annotations                  list_annotations
/// POST   /{id}/annotations                  create_annotation
/// PUT    /{id}/annotations/{ann_id}         update_annotation
/// DELETE /{id}/annotations/{ann_id}         delete_annotation
/// GET    /{id}/timeline                     get_timeline
/// POST   /{id}/playback                     report_event
/// POST   /{id}/seek                         seek
/// POST   /{id}/skip                         skip
/// ```
///
/// The upload route accepts a video of up to `max_upload_bytes` plus the
/// multipart framing around it; the video's own size is checked in the
/// handler.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(session::list_sessions)
                .post(session::create_session)
                .layer(DefaultBodyLimit::max(
                    max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
                )),
        )
        .route(
            "/{id}",
            get(session::get_session).delete(session::delete_session),
        )
        .route(
            "/{id}/annotations",
            get(annotation::list_annotations).post(annotation::create_annotation),
        )
        .route(
            "/{id}/annotations/{ann_id}",
            put(annotation::update_annotation).delete(annotation::delete_annotation),
        )
        .route("/{id}/timeline", get(playback::get_timeline))
        .route("/{id}/playback", post(playback::report_event))
        .route("/{id}/seek", post(playback::seek))
        .route("/{id}/skip", post(playback::skip))
}
