//! Adapter implementations for task persistence.

mod document;

pub use document::{PROJECT_FIELD, TASK_LINK_FIELDS};
