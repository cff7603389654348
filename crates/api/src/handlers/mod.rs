//! Request handlers.
//!
//! Handlers delegate to `psj_core` for the submission workflow and to the
//! repositories in `psj_db` for reads, mapping errors via
//! [`AppError`](crate::error::AppError).

pub mod reports;
