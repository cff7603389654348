//! Report status and category vocabularies.
//!
//! The intake workflow only ever writes [`STATUS_PENDING`]; the remaining
//! statuses are set by the back-office tooling that reviews reports.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Initial status for a newly submitted report.
pub const STATUS_PENDING: &str = "Pending";
/// A reviewer has picked the report up.
pub const STATUS_IN_REVIEW: &str = "InReview";
/// The reported incident has been dealt with.
pub const STATUS_RESOLVED: &str = "Resolved";
/// The report was discarded (duplicate, spam, out of jurisdiction).
pub const STATUS_REJECTED: &str = "Rejected";

/// All valid report statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_IN_REVIEW,
    STATUS_RESOLVED,
    STATUS_REJECTED,
];

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Categories offered by the intake form.
pub const CATEGORIES: &[&str] = &[
    "Infraestructura",
    "Seguridad",
    "Medio Ambiente",
    "Servicios Públicos",
    "Transporte",
    "Otro",
];

/// Validate that a status string is one of the known statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid report status '{status}'. Must be one of: {VALID_STATUSES:?}"
        )))
    }
}

/// Validate that a category is one the form offers.
pub fn validate_category(category: &str) -> Result<(), CoreError> {
    if CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown category '{category}'. Must be one of: {CATEGORIES:?}"
        )))
    }
}
