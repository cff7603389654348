//! Repository for the `evidence` table.

use psj_core::store::NewEvidence;
use psj_core::types::DbId;
use sqlx::PgPool;

use crate::models::evidence::Evidence;

/// Column list for `evidence` queries.
const COLUMNS: &str = "\
    id, report_id, uploader_id, content, media_type, original_filename, uploaded_at";

pub struct EvidenceRepo;

impl EvidenceRepo {
    /// Insert an evidence row, returning the full row.
    pub async fn create(pool: &PgPool, input: &NewEvidence) -> Result<Evidence, sqlx::Error> {
        let query = format!(
            "INSERT INTO evidence \
                (report_id, uploader_id, content, media_type, original_filename, uploaded_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Evidence>(&query)
            .bind(input.report_id)
            .bind(input.uploader_id)
            .bind(&input.content)
            .bind(&input.media_type)
            .bind(&input.original_filename)
            .bind(input.uploaded_at)
            .fetch_one(pool)
            .await
    }

    /// List evidence for a report, oldest first.
    pub async fn list_by_report(
        pool: &PgPool,
        report_id: DbId,
    ) -> Result<Vec<Evidence>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM evidence WHERE report_id = $1 ORDER BY uploaded_at, id"
        );
        sqlx::query_as::<_, Evidence>(&query)
            .bind(report_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_report(pool: &PgPool, report_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM evidence WHERE report_id = $1")
            .bind(report_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }
}
