//! Status history entity model.

use psj_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `report_status_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusHistoryEntry {
    pub id: DbId,
    pub report_id: DbId,
    pub previous_status: Option<String>,
    pub new_status: String,
    pub changed_by: Option<DbId>,
    pub changed_at: Timestamp,
}
