use std::sync::Arc;

use sv_mail::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and mailer are handles, the config sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: sv_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Outbound email through the configured transport.
    pub mailer: Mailer,
}
