//! Repository for the `report_status_history` audit table.

use psj_core::store::NewStatusEntry;
use psj_core::types::DbId;
use sqlx::PgPool;

use crate::models::report_status_history::StatusHistoryEntry;

/// Column list for `report_status_history` queries.
const COLUMNS: &str = "id, report_id, previous_status, new_status, changed_by, changed_at";

pub struct ReportStatusHistoryRepo;

impl ReportStatusHistoryRepo {
    /// Append a status transition, returning the full row.
    pub async fn create(
        pool: &PgPool,
        input: &NewStatusEntry,
    ) -> Result<StatusHistoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO report_status_history \
                (report_id, previous_status, new_status, changed_by, changed_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StatusHistoryEntry>(&query)
            .bind(input.report_id)
            .bind(&input.previous_status)
            .bind(&input.new_status)
            .bind(input.changed_by)
            .bind(input.changed_at)
            .fetch_one(pool)
            .await
    }

    /// Full trail for a report, oldest transition first.
    pub async fn list_by_report(
        pool: &PgPool,
        report_id: DbId,
    ) -> Result<Vec<StatusHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM report_status_history \
             WHERE report_id = $1 ORDER BY changed_at, id"
        );
        sqlx::query_as::<_, StatusHistoryEntry>(&query)
            .bind(report_id)
            .fetch_all(pool)
            .await
    }
}
