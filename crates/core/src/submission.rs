//! Report submission workflow.
//!
//! A submission runs these steps strictly in order, each awaiting the store
//! before the next begins:
//!
//! ```text
//! Validating -> GeneratingCode -> EncodingMedia -> InsertingReport
//!            -> InsertingEvidence -> InsertingHistory -> Succeeded
//! ```
//!
//! Nothing touches the store before validation passes. Once the report row
//! exists, a failed evidence insert triggers a single best-effort delete of
//! that row (`RollingBack`); a failed history insert is logged and ignored.
//! There is no transaction spanning the three inserts.

use std::fmt;

use tokio::io::AsyncRead;

use crate::error::CoreError;
use crate::media::{self, EvidenceFile, MediaError};
use crate::report::STATUS_PENDING;
use crate::store::{NewEvidence, NewReport, NewStatusEntry, ReportStore, StoreError};
use crate::tracking_code::{self, CodeGenerationError, RandomSource};
use crate::types::{Clock, DbId};

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Validating,
    GeneratingCode,
    EncodingMedia,
    InsertingReport,
    InsertingEvidence,
    InsertingHistory,
    RollingBack,
    Succeeded,
    Failed,
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::GeneratingCode => "generating_code",
            Self::EncodingMedia => "encoding_media",
            Self::InsertingReport => "inserting_report",
            Self::InsertingEvidence => "inserting_evidence",
            Self::InsertingHistory => "inserting_history",
            Self::RollingBack => "rolling_back",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

fn enter(stage: SubmissionStage) {
    tracing::debug!(%stage, "Submission stage");
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The write that failed during persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceStage {
    Report,
    Evidence,
}

impl fmt::Display for PersistenceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Report => f.write_str("report"),
            Self::Evidence => f.write_str("evidence"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    CodeGeneration(#[from] CodeGenerationError),

    #[error(transparent)]
    MediaEncoding(#[from] MediaError),

    /// `compensation_attempted` is set once the report row had been created
    /// and a delete was issued for it.
    #[error("Failed to store {stage}: {source}")]
    Persistence {
        stage: PersistenceStage,
        compensation_attempted: bool,
        #[source]
        source: StoreError,
    },
}

/// Coarse reason behind a failure, guessed from the error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureHint {
    Connectivity,
    Uniqueness,
    Size,
}

impl FailureHint {
    pub fn message(self) -> &'static str {
        match self {
            Self::Connectivity => "Connection problem.",
            Self::Uniqueness => "System error.",
            Self::Size => "The image is too large.",
        }
    }
}

const CONNECTIVITY_KEYWORDS: &[&str] = &["network", "fetch", "connect", "timed out"];
const UNIQUENESS_KEYWORDS: &[&str] = &["unique", "duplicate"];
const SIZE_KEYWORDS: &[&str] = &["size", "large"];

/// Best-effort classification of an error message. Checked in order:
/// connectivity, uniqueness, size.
pub fn classify_failure(detail: &str) -> Option<FailureHint> {
    let detail = detail.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| detail.contains(k));

    if mentions(CONNECTIVITY_KEYWORDS) {
        Some(FailureHint::Connectivity)
    } else if mentions(UNIQUENESS_KEYWORDS) {
        Some(FailureHint::Uniqueness)
    } else if mentions(SIZE_KEYWORDS) {
        Some(FailureHint::Size)
    } else {
        None
    }
}

impl SubmissionError {
    /// Single message suitable for showing to the person who submitted.
    pub fn user_message(&self) -> String {
        if let Self::Validation(msg) = self {
            return msg.clone();
        }

        let detail = self.to_string();
        let mut message = String::from("Could not submit the report. ");
        if let Some(hint) = classify_failure(&detail) {
            message.push_str(hint.message());
            message.push(' ');
        }
        message.push_str("Please try again. (Detail: ");
        message.push_str(&detail);
        message.push(')');
        message
    }

    /// Whether a compensating delete was issued before failing.
    pub fn compensation_attempted(&self) -> bool {
        matches!(
            self,
            Self::Persistence {
                compensation_attempted: true,
                ..
            }
        )
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Raw form input, before trimming or validation.
pub struct ReportSubmission<R> {
    pub location: String,
    pub category: String,
    pub description: String,
    pub evidence: Option<EvidenceFile<R>>,
}

struct ValidatedReport<R> {
    location: String,
    category: String,
    description: String,
    evidence: EvidenceFile<R>,
}

impl<R> ReportSubmission<R> {
    fn validate(self) -> Result<ValidatedReport<R>, SubmissionError> {
        let location = self.location.trim().to_string();
        let category = self.category.trim().to_string();
        let description = self.description.trim().to_string();

        let evidence = match self.evidence {
            Some(evidence)
                if !location.is_empty() && !category.is_empty() && !description.is_empty() =>
            {
                evidence
            }
            _ => {
                return Err(SubmissionError::Validation(
                    "Please complete all required fields.".into(),
                ))
            }
        };

        media::check_evidence(&evidence.meta).map_err(|e| match e {
            CoreError::Validation(msg) => SubmissionError::Validation(msg),
            other => SubmissionError::Validation(other.to_string()),
        })?;

        Ok(ValidatedReport {
            location,
            category,
            description,
            evidence,
        })
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// Collaborators injected into a submission run.
#[derive(Clone, Copy)]
pub struct SubmissionContext<'a> {
    pub clock: &'a dyn Clock,
    pub random: &'a dyn RandomSource,
    pub max_code_attempts: u32,
}

/// Run a submission to completion and return the new report's tracking code.
pub async fn submit_report<S, R>(
    store: &S,
    ctx: SubmissionContext<'_>,
    submission: ReportSubmission<R>,
) -> Result<String, SubmissionError>
where
    S: ReportStore + ?Sized,
    R: AsyncRead + Unpin + Send,
{
    match run(store, ctx, submission).await {
        Ok(code) => {
            enter(SubmissionStage::Succeeded);
            tracing::info!(unique_code = %code, "Report submitted");
            Ok(code)
        }
        Err(e) => {
            enter(SubmissionStage::Failed);
            tracing::warn!(error = %e, "Report submission failed");
            Err(e)
        }
    }
}

async fn run<S, R>(
    store: &S,
    ctx: SubmissionContext<'_>,
    submission: ReportSubmission<R>,
) -> Result<String, SubmissionError>
where
    S: ReportStore + ?Sized,
    R: AsyncRead + Unpin + Send,
{
    enter(SubmissionStage::Validating);
    let input = submission.validate()?;

    enter(SubmissionStage::GeneratingCode);
    let unique_code =
        tracking_code::generate_unique_code(store, ctx.random, ctx.max_code_attempts).await?;

    enter(SubmissionStage::EncodingMedia);
    let EvidenceFile { meta, reader } = input.evidence;
    let content = media::encode_data_url(&meta.media_type, reader).await?;
    tracing::debug!(encoded_len = content.len(), "Evidence encoded");

    enter(SubmissionStage::InsertingReport);
    let report = NewReport {
        unique_code: unique_code.clone(),
        description: input.description,
        category: input.category,
        location: input.location,
        status: STATUS_PENDING.to_string(),
        latitude: None,
        longitude: None,
        created_at: ctx.clock.now(),
    };
    let report_id = store
        .insert_report(&report)
        .await
        .map_err(|source| SubmissionError::Persistence {
            stage: PersistenceStage::Report,
            compensation_attempted: false,
            source,
        })?;
    tracing::debug!(report_id, "Report row created");

    enter(SubmissionStage::InsertingEvidence);
    let evidence = NewEvidence {
        report_id,
        uploader_id: None,
        content,
        media_type: meta.media_type,
        original_filename: meta.file_name,
        uploaded_at: ctx.clock.now(),
    };
    if let Err(source) = store.insert_evidence(&evidence).await {
        tracing::error!(report_id, error = %source, "Evidence insert failed");
        enter(SubmissionStage::RollingBack);
        roll_back_report(store, report_id).await;
        return Err(SubmissionError::Persistence {
            stage: PersistenceStage::Evidence,
            compensation_attempted: true,
            source,
        });
    }

    enter(SubmissionStage::InsertingHistory);
    let entry = NewStatusEntry {
        report_id,
        previous_status: None,
        new_status: STATUS_PENDING.to_string(),
        changed_by: None,
        changed_at: ctx.clock.now(),
    };
    if let Err(e) = store.insert_status_history(&entry).await {
        tracing::warn!(report_id, error = %e, "Status history insert failed (non-critical)");
    }

    Ok(unique_code)
}

/// Delete a report whose evidence could not be stored. Errors are logged only.
async fn roll_back_report<S>(store: &S, report_id: DbId)
where
    S: ReportStore + ?Sized,
{
    match store.delete_report(report_id).await {
        Ok(()) => tracing::info!(report_id, "Report removed after evidence failure"),
        Err(e) => tracing::error!(report_id, error = %e, "Failed to remove report"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
