//! Persistence seam used by the submission workflow.
//!
//! The workflow needs exactly five operations: look up a report by its
//! tracking code, insert and delete a report, and insert the evidence and
//! status-history rows that hang off it. Optional columns are carried as
//! `None` and written as NULL.

use async_trait::async_trait;

use crate::types::{DbId, Timestamp};

/// A failed store operation.
///
/// Only the message is kept: the workflow classifies failures by inspecting
/// the text, and never needs the driver error itself.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn new(err: impl std::fmt::Display) -> Self {
        Self {
            message: err.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Values for a new `reports` row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub unique_code: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub status: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: Timestamp,
}

/// Values for a new `evidence` row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvidence {
    pub report_id: DbId,
    pub uploader_id: Option<DbId>,
    /// Encoded image payload (a `data:` URL).
    pub content: String,
    pub media_type: String,
    pub original_filename: String,
    pub uploaded_at: Timestamp,
}

/// Values for a new `report_status_history` row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStatusEntry {
    pub report_id: DbId,
    pub previous_status: Option<String>,
    pub new_status: String,
    pub changed_by: Option<DbId>,
    pub changed_at: Timestamp,
}

/// Storage capability the intake workflow runs against.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Return the id of the report carrying `unique_code`, if any.
    async fn find_report_by_code(&self, unique_code: &str) -> Result<Option<DbId>, StoreError>;

    /// Insert a report and return its store-assigned id.
    async fn insert_report(&self, report: &NewReport) -> Result<DbId, StoreError>;

    async fn delete_report(&self, id: DbId) -> Result<(), StoreError>;

    async fn insert_evidence(&self, evidence: &NewEvidence) -> Result<DbId, StoreError>;

    async fn insert_status_history(&self, entry: &NewStatusEntry) -> Result<DbId, StoreError>;
}
