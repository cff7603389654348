//! Evidence entity model.

use psj_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `evidence` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Evidence {
    pub id: DbId,
    pub report_id: DbId,
    pub uploader_id: Option<DbId>,
    /// Inline `data:` URL holding the photo.
    pub content: String,
    pub media_type: String,
    pub original_filename: String,
    pub uploaded_at: Timestamp,
}
