use axum::routing::get;
use axum::Router;

use crate::handlers::review;
use crate::state::AppState;

/// Routes mounted at `/review`.
///
/// ```text
/// GET /{id}                                 get_review
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(review::get_review))
}
