//! Task status and the operations that move a task between statuses.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created but no time has been tracked.
    #[default]
    NotStarted,
    /// Task is being worked on; time accrues.
    InProgress,
    /// Work is suspended; time does not accrue.
    Paused,
    /// Task is finished. Terminal.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    /// Returns `true` when no further operation is accepted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError {
                kind: "status",
                value: value.to_owned(),
            }),
        }
    }
}

/// Operation requested against a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOperation {
    /// Begin tracking time.
    Start,
    /// Suspend tracking.
    Pause,
    /// Continue after a pause.
    Resume,
    /// Finish the task and freeze its tracked time.
    Complete,
}

impl TaskOperation {
    /// Returns the canonical text form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Complete => "complete",
        }
    }

    /// Returns `true` when the operation is legal from `status`.
    #[must_use]
    pub const fn permitted_from(self, status: TaskStatus) -> bool {
        if status.is_terminal() {
            return false;
        }
        matches!(
            (self, status),
            (Self::Start, TaskStatus::NotStarted)
                | (Self::Pause, TaskStatus::InProgress)
                | (Self::Resume, TaskStatus::Paused)
                | (Self::Complete, TaskStatus::InProgress | TaskStatus::Paused)
        )
    }

    /// Returns the status a successful operation leads to.
    #[must_use]
    pub const fn target_status(self) -> TaskStatus {
        match self {
            Self::Start | Self::Resume => TaskStatus::InProgress,
            Self::Pause => TaskStatus::Paused,
            Self::Complete => TaskStatus::Completed,
        }
    }
}

impl fmt::Display for TaskOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskOperation {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "complete" => Ok(Self::Complete),
            _ => Err(ParseTaskStatusError {
                kind: "operation",
                value: value.to_owned(),
            }),
        }
    }
}
