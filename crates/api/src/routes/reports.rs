//! Route definitions for citizen reports.
//!
//! Mounted at `/reports` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Report routes.
///
/// ```text
/// POST   /                  -> submit_report
/// GET    /track/{code}      -> track_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(reports::submit_report))
        .route("/track/{code}", get(reports::track_report))
}
