//! [`ReportStore`] backed by the Postgres repositories.

use async_trait::async_trait;
use psj_core::store::{NewEvidence, NewReport, NewStatusEntry, ReportStore, StoreError};
use psj_core::types::DbId;

use crate::repositories::{EvidenceRepo, ReportRepo, ReportStatusHistoryRepo};
use crate::DbPool;

#[derive(Clone)]
pub struct PgReportStore {
    pool: DbPool,
}

impl PgReportStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn find_report_by_code(&self, unique_code: &str) -> Result<Option<DbId>, StoreError> {
        let report = ReportRepo::find_by_code(&self.pool, unique_code)
            .await
            .map_err(StoreError::new)?;
        Ok(report.map(|r| r.id))
    }

    async fn insert_report(&self, report: &NewReport) -> Result<DbId, StoreError> {
        let row = ReportRepo::create(&self.pool, report)
            .await
            .map_err(StoreError::new)?;
        Ok(row.id)
    }

    async fn delete_report(&self, id: DbId) -> Result<(), StoreError> {
        let deleted = ReportRepo::delete(&self.pool, id)
            .await
            .map_err(StoreError::new)?;
        if !deleted {
            tracing::warn!(report_id = id, "Report to delete was already gone");
        }
        Ok(())
    }

    async fn insert_evidence(&self, evidence: &NewEvidence) -> Result<DbId, StoreError> {
        let row = EvidenceRepo::create(&self.pool, evidence)
            .await
            .map_err(StoreError::new)?;
        Ok(row.id)
    }

    async fn insert_status_history(&self, entry: &NewStatusEntry) -> Result<DbId, StoreError> {
        let row = ReportStatusHistoryRepo::create(&self.pool, entry)
            .await
            .map_err(StoreError::new)?;
        Ok(row.id)
    }
}
