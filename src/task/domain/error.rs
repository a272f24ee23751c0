//! Error types for task domain validation and lifecycle transitions.

use super::{TaskId, TaskOperation, TaskStatus};
use thiserror::Error;

/// Errors returned by task domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The requested operation is not legal from the task's current status.
    #[error("cannot {operation} task {task_id} while it is {status}")]
    InvalidTransition {
        /// Task that rejected the operation.
        task_id: TaskId,
        /// Attempted operation.
        operation: TaskOperation,
        /// Status at the time of the attempt.
        status: TaskStatus,
    },

    /// The task's event log contradicts its status.
    #[error("task {task_id} is inconsistent during {operation}: {detail}")]
    InvariantViolation {
        /// Task whose stored state is inconsistent.
        task_id: TaskId,
        /// Operation that detected the inconsistency.
        operation: TaskOperation,
        /// Description of the broken invariant.
        detail: String,
    },
}

/// Error returned while parsing task statuses or operations from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task {kind}: {value}")]
pub struct ParseTaskStatusError {
    /// What was being parsed.
    pub kind: &'static str,
    /// Rejected input.
    pub value: String,
}
