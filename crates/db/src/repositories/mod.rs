//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod evidence_repo;
pub mod report_repo;
pub mod report_status_history_repo;

pub use evidence_repo::EvidenceRepo;
pub use report_repo::ReportRepo;
pub use report_status_history_repo::ReportStatusHistoryRepo;
