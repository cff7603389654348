//! Handlers for citizen report intake and tracking.
//!
//! Submission is anonymous: no authentication, no uploader recorded. The
//! handler plays the form controller's part, collecting the multipart fields
//! and handing them to the submission workflow in `psj_core`.

use std::io::Cursor;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use psj_core::error::CoreError;
use psj_core::media::{EvidenceFile, EvidenceMeta};
use psj_core::report;
use psj_core::submission::{self, ReportSubmission, SubmissionContext};
use psj_core::tracking_code;
use psj_core::types::Timestamp;
use psj_db::repositories::{EvidenceRepo, ReportRepo, ReportStatusHistoryRepo};
use psj_db::PgReportStore;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Media type assumed when the client sends none.
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(Debug, Serialize)]
pub struct SubmittedReport {
    pub unique_code: String,
}

#[derive(Debug, Serialize)]
pub struct StatusChange {
    pub previous_status: Option<String>,
    pub new_status: String,
    pub changed_at: Timestamp,
}

/// Public view of a report, looked up by tracking code. Evidence content is
/// never included.
#[derive(Debug, Serialize)]
pub struct ReportTracking {
    pub unique_code: String,
    pub category: String,
    pub location: String,
    pub description: String,
    pub status: String,
    pub created_at: Timestamp,
    pub evidence_count: i64,
    pub history: Vec<StatusChange>,
}

// ---------------------------------------------------------------------------
// POST /reports
// ---------------------------------------------------------------------------

/// Submit a new report with one evidence photo.
///
/// Multipart fields: `location`, `category`, `description`, `evidence`.
pub async fn submit_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut location = String::new();
    let mut category = String::new();
    let mut description = String::new();
    let mut evidence: Option<EvidenceFile<Cursor<Vec<u8>>>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "location" | "category" | "description" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                match name.as_str() {
                    "location" => location = text,
                    "category" => category = text,
                    _ => description = text,
                }
            }
            "evidence" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let media_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_MEDIA_TYPE)
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;

                // Browsers send an empty, unnamed part when no file was chosen.
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }

                evidence = Some(EvidenceFile {
                    meta: EvidenceMeta {
                        file_name,
                        media_type,
                        size: data.len() as u64,
                    },
                    reader: Cursor::new(data.to_vec()),
                });
            }
            _ => {} // ignore unknown fields
        }
    }

    // A blank category is reported by the workflow's required-field check.
    let trimmed_category = category.trim();
    if !trimmed_category.is_empty() {
        report::validate_category(trimmed_category)?;
    }

    let store = PgReportStore::new(state.pool.clone());
    let ctx = SubmissionContext {
        clock: state.clock.as_ref(),
        random: state.random.as_ref(),
        max_code_attempts: state.config.code_max_attempts,
    };
    let input = ReportSubmission {
        location,
        category,
        description,
        evidence,
    };

    let unique_code = submission::submit_report(&store, ctx, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmittedReport { unique_code },
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /reports/track/{code}
// ---------------------------------------------------------------------------

/// Look up a report's status and history by its tracking code.
///
/// Codes are matched case-insensitively.
pub async fn track_report(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let code = code.trim().to_uppercase();
    if !tracking_code::is_valid_code(&code) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "'{code}' is not a valid tracking code"
        ))));
    }

    let report = ReportRepo::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Report",
                key: code.clone(),
            })
        })?;

    let history = ReportStatusHistoryRepo::list_by_report(&state.pool, report.id).await?;
    let evidence_count = EvidenceRepo::count_by_report(&state.pool, report.id).await?;

    let tracking = ReportTracking {
        unique_code: report.unique_code,
        category: report.category,
        location: report.location,
        description: report.description,
        status: report.status,
        created_at: report.created_at,
        evidence_count,
        history: history
            .into_iter()
            .map(|entry| StatusChange {
                previous_status: entry.previous_status,
                new_status: entry.new_status,
                changed_at: entry.changed_at,
            })
            .collect(),
    };

    Ok(Json(DataResponse { data: tracking }))
}
