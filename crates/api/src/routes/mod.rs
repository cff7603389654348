pub mod health;
pub mod reports;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /reports                         submit a report (multipart, POST)
/// /reports/track/{code}            status and history by tracking code (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/reports", reports::router())
}
