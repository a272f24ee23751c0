//! Task aggregate root and its time-tracking event log.

use super::{TaskDomainError, TaskId, TaskOperation, TaskStatus, TaskTitle, TimeLedger, TimeSummary};
use crate::project::domain::ProjectId;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A pause in tracked work; `end` stays unset while the task is paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseInterval {
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
}

impl PauseInterval {
    /// Creates an interval that is still open.
    #[must_use]
    pub const fn open(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }

    /// Creates a closed interval.
    #[must_use]
    pub const fn closed(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Returns when the pause began.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns when the pause ended, if it has.
    #[must_use]
    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Returns `true` while the pause has no end.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Length of the part of this pause lying within `[window_start,
    /// window_end]`, treating an open pause as lasting until `window_end`.
    #[must_use]
    pub fn duration_within(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> TimeDelta {
        let start = self.start.max(window_start);
        let end = self.end.unwrap_or(window_end).min(window_end);
        if end > start {
            end - start
        } else {
            TimeDelta::zero()
        }
    }

    fn close(&mut self, at: DateTime<Utc>) {
        self.end = Some(at);
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    status: TaskStatus,
    start_events: Vec<DateTime<Utc>>,
    pause_events: Vec<PauseInterval>,
    complete_event: Option<DateTime<Utc>>,
    total_time: Option<TimeSummary>,
    project_id: Option<ProjectId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted start and resume instants.
    pub start_events: Vec<DateTime<Utc>>,
    /// Persisted pause intervals.
    pub pause_events: Vec<PauseInterval>,
    /// Persisted completion instant, if any.
    pub complete_event: Option<DateTime<Utc>>,
    /// Persisted cached tracked time, if any.
    pub total_time: Option<TimeSummary>,
    /// Persisted owning project, if any.
    pub project_id: Option<ProjectId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task in [`TaskStatus::NotStarted`] with empty event logs.
    #[must_use]
    pub fn new(title: TaskTitle, description: Option<String>, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title,
            description,
            status: TaskStatus::NotStarted,
            start_events: Vec::new(),
            pause_events: Vec::new(),
            complete_event: None,
            total_time: None,
            project_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            start_events: data.start_events,
            pause_events: data.pause_events,
            complete_event: data.complete_event,
            total_time: data.total_time,
            project_id: data.project_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the start and resume instants in order.
    #[must_use]
    pub fn start_events(&self) -> &[DateTime<Utc>] {
        &self.start_events
    }

    /// Returns the pause intervals in order.
    #[must_use]
    pub fn pause_events(&self) -> &[PauseInterval] {
        &self.pause_events
    }

    /// Returns the completion instant, if completed.
    #[must_use]
    pub const fn complete_event(&self) -> Option<DateTime<Utc>> {
        self.complete_event
    }

    /// Returns the tracked time cached by the last pause, resume or completion.
    #[must_use]
    pub const fn total_time(&self) -> Option<&TimeSummary> {
        self.total_time.as_ref()
    }

    /// Returns the owning project, if assigned.
    #[must_use]
    pub const fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Derives tracked time as of `now` without touching the cache.
    #[must_use]
    pub fn tracked_time(&self, now: DateTime<Utc>) -> TimeSummary {
        TimeLedger::recompute(self, now)
    }

    /// Starts tracking time.
    ///
    /// # Errors
    ///
    /// See [`Task::apply`].
    pub fn start(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.apply(TaskOperation::Start, clock)
    }

    /// Pauses tracking and caches the running total.
    ///
    /// # Errors
    ///
    /// See [`Task::apply`].
    pub fn pause(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.apply(TaskOperation::Pause, clock)
    }

    /// Closes the open pause and resumes tracking.
    ///
    /// # Errors
    ///
    /// See [`Task::apply`].
    pub fn resume(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.apply(TaskOperation::Resume, clock)
    }

    /// Completes the task, closing any open pause and freezing the total.
    ///
    /// # Errors
    ///
    /// See [`Task::apply`].
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.apply(TaskOperation::Complete, clock)
    }

    /// Applies a lifecycle operation at the clock's current instant.
    ///
    /// The task is left untouched when the operation fails.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] when `operation` is not
    /// legal from the current status, or
    /// [`TaskDomainError::InvariantViolation`] when the event log contradicts
    /// the status (for example a paused task with no open pause).
    pub fn apply(
        &mut self,
        operation: TaskOperation,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !operation.permitted_from(self.status) {
            return Err(TaskDomainError::InvalidTransition {
                task_id: self.id,
                operation,
                status: self.status,
            });
        }
        self.check_event_log(operation)?;

        let now = clock.utc();
        match operation {
            TaskOperation::Start => self.start_events.push(now),
            TaskOperation::Pause => self.pause_events.push(PauseInterval::open(now)),
            TaskOperation::Resume => {
                self.close_open_pause(now);
                self.start_events.push(now);
            }
            TaskOperation::Complete => {
                self.close_open_pause(now);
                self.complete_event = Some(now);
            }
        }
        self.status = operation.target_status();
        if !matches!(operation, TaskOperation::Start) {
            self.total_time = Some(TimeLedger::recompute(self, now));
        }
        self.updated_at = now;
        Ok(())
    }

    /// Replaces the title.
    pub fn rename(&mut self, title: TaskTitle, clock: &impl Clock) {
        self.title = title;
        self.touch(clock);
    }

    /// Replaces the description.
    pub fn describe(&mut self, description: Option<String>, clock: &impl Clock) {
        self.description = description;
        self.touch(clock);
    }

    /// Points the task at its owning project, replacing any previous owner.
    pub fn assign_project(&mut self, project_id: ProjectId, clock: &impl Clock) {
        self.project_id = Some(project_id);
        self.touch(clock);
    }

    /// Removes the project back-reference.
    pub fn clear_project(&mut self, clock: &impl Clock) {
        self.project_id = None;
        self.touch(clock);
    }

    /// Verifies the pause log agrees with the current status before mutating.
    fn check_event_log(&self, operation: TaskOperation) -> Result<(), TaskDomainError> {
        let open_pauses = self
            .pause_events
            .iter()
            .filter(|interval| interval.is_open())
            .count();
        let last_is_open = self
            .pause_events
            .last()
            .is_some_and(PauseInterval::is_open);

        let detail = match self.status {
            _ if open_pauses > 1 => Some("more than one open pause interval"),
            TaskStatus::Paused if !last_is_open => Some("paused task has no open pause interval"),
            TaskStatus::NotStarted | TaskStatus::InProgress if open_pauses > 0 => {
                Some("running task has an open pause interval")
            }
            TaskStatus::NotStarted if !self.start_events.is_empty() => {
                Some("task that never started has start events")
            }
            TaskStatus::InProgress | TaskStatus::Paused if self.start_events.is_empty() => {
                Some("started task has no start events")
            }
            _ => None,
        };

        match detail {
            Some(detail) => Err(TaskDomainError::InvariantViolation {
                task_id: self.id,
                operation,
                detail: detail.to_owned(),
            }),
            None => Ok(()),
        }
    }

    fn close_open_pause(&mut self, at: DateTime<Utc>) {
        if let Some(interval) = self
            .pause_events
            .last_mut()
            .filter(|interval| interval.is_open())
        {
            interval.close(at);
        }
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
