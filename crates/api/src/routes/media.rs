use axum::routing::get;
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Routes mounted at `/media`.
///
/// ```text
/// GET /{media_ref}                          stream_media (supports Range)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{media_ref}", get(media::stream_media))
}
