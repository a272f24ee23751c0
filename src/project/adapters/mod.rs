//! Adapter implementations for project persistence.

mod document;

pub use document::{TASK_IDS_FIELD, PROJECT_MEMBERSHIP_FIELDS};
