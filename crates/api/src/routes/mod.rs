pub mod health;
pub mod media;
pub mod review;
pub mod session;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sessions                                        list, upload (multipart)
/// /sessions/{id}                                   get, delete
/// /sessions/{id}/annotations                       list, create
/// /sessions/{id}/annotations/{ann_id}              update, delete
/// /sessions/{id}/timeline                          playback view + markers (GET)
/// /sessions/{id}/playback                          report media event (POST)
/// /sessions/{id}/seek                              seek from a track click (POST)
/// /sessions/{id}/skip                              skip 5 s back or forward (POST)
///
/// /review/{id}                                     review page model (GET)
///
/// /media/{media_ref}                               stream uploaded video (GET, Range)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        // Bout sessions, annotations and playback.
        .nest("/sessions", session::router(config.max_upload_bytes))
        // Aggregated review screen.
        .nest("/review", review::router())
        // Uploaded media by reference.
        .nest("/media", media::router())
}
