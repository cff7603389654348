//! Row structs for the report tables.
//!
//! Inserts take the value structs from `psj_core::store` directly, so only
//! the `FromRow` entity types live here.

pub mod evidence;
pub mod report;
pub mod report_status_history;
