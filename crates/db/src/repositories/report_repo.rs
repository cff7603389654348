//! Repository for the `reports` table.

use psj_core::store::NewReport;
use psj_core::types::DbId;
use sqlx::PgPool;

use crate::models::report::Report;

/// Column list for `reports` queries.
const COLUMNS: &str = "\
    id, unique_code, description, category, location, status, \
    latitude, longitude, created_at";

/// Provides CRUD operations for reports.
pub struct ReportRepo;

impl ReportRepo {
    /// Insert a new report, returning the full row.
    pub async fn create(pool: &PgPool, input: &NewReport) -> Result<Report, sqlx::Error> {
        let query = format!(
            "INSERT INTO reports \
                (unique_code, description, category, location, status, \
                 latitude, longitude, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(&input.unique_code)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.location)
            .bind(&input.status)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// Find a report by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE id = $1");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a report by its tracking code.
    pub async fn find_by_code(
        pool: &PgPool,
        unique_code: &str,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE unique_code = $1");
        sqlx::query_as::<_, Report>(&query)
            .bind(unique_code)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a report. Evidence and history rows cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
