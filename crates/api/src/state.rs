use std::sync::Arc;

use riposte_core::store::SessionStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Uploaded bouts and their annotations.
    pub store: Arc<SessionStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
