use std::sync::Arc;

use psj_core::tracking_code::RandomSource;
use psj_core::types::Clock;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: psj_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Timestamp source for new rows.
    pub clock: Arc<dyn Clock>,
    /// Random source for tracking codes.
    pub random: Arc<dyn RandomSource>,
}
