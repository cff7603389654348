//! Domain core for citizen incident report intake.
//!
//! Holds the tracking-code generator, the evidence encoder, the submission
//! workflow and the form view state. Persistence is reached only through the
//! [`store::ReportStore`] trait so the workflow can run against Postgres in
//! production and against in-memory doubles in tests.

pub mod error;
pub mod form;
pub mod media;
pub mod report;
pub mod store;
pub mod submission;
pub mod tracking_code;
pub mod types;

#[cfg(test)]
mod test_support;
