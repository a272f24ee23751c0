//! Service layer for task creation and lifecycle transitions.

use crate::store::{
    ports::{DocumentId, DocumentStore, StoreError},
    typed,
};
use crate::task::domain::{Task, TaskDomainError, TaskId, TaskOperation, TaskTitle, TimeSummary};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for editing task details.
///
/// Unset fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskDetailsRequest {
    task_id: TaskId,
    title: Option<String>,
    description: Option<Option<String>>,
}

impl UpdateTaskDetailsRequest {
    /// Creates an empty edit for the given task.
    #[must_use]
    pub const fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            title: None,
            description: None,
        }
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Removes the description.
    #[must_use]
    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or transition guard failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// Document store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Each operation is one read-modify-write of a single task document.
#[derive(Clone)]
pub struct TaskLifecycleService<S, C>
where
    S: DocumentStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskLifecycleService<S, C>
where
    S: DocumentStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a new, unassigned task in the `NotStarted` status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the title is blank or the store
    /// rejects the insert.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let task = Task::new(title, request.description, &*self.clock);
        typed::insert_new(&*self.store, &task).await?;
        info!(task_id = %task.id(), "created task");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the lookup fails.
    pub async fn find_by_id(&self, id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(typed::fetch(&*self.store, &DocumentId::from(id)).await?)
    }

    /// Starts tracking time on a `NotStarted` task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks and
    /// [`TaskLifecycleError::Domain`] when the transition is illegal.
    pub async fn start(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(id, TaskOperation::Start).await
    }

    /// Pauses an `InProgress` task, caching its running total.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks and
    /// [`TaskLifecycleError::Domain`] when the transition is illegal.
    pub async fn pause(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(id, TaskOperation::Pause).await
    }

    /// Resumes a `Paused` task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks and
    /// [`TaskLifecycleError::Domain`] when the transition is illegal or the
    /// task has no open pause.
    pub async fn resume(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.transition(id, TaskOperation::Resume).await
    }

    /// Completes an `InProgress` or `Paused` task and freezes its total.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks and
    /// [`TaskLifecycleError::Domain`] when the transition is illegal.
    pub async fn complete(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        let task = self.transition(id, TaskOperation::Complete).await?;
        if let Some(total) = task.total_time() {
            info!(task_id = %id, total = %total.completion_label(), "completed task");
        }
        Ok(task)
    }

    /// Applies a lifecycle operation and persists the result.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks,
    /// [`TaskLifecycleError::Domain`] when the transition is rejected, and
    /// [`TaskLifecycleError::Store`] when persistence fails.
    pub async fn transition(
        &self,
        id: TaskId,
        operation: TaskOperation,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.find_by_id_or_error(id).await?;
        let from = task.status();
        task.apply(operation, &*self.clock)?;
        self.persist(&task).await?;
        debug!(task_id = %id, %operation, %from, to = %task.status(), "task transitioned");
        Ok(task)
    }

    /// Derives the task's tracked time as of now without persisting.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks.
    pub async fn tracked_time(&self, id: TaskId) -> TaskLifecycleResult<TimeSummary> {
        let task = self.find_by_id_or_error(id).await?;
        Ok(task.tracked_time(self.clock.utc()))
    }

    /// Edits the task's title and description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks and
    /// [`TaskLifecycleError::Domain`] when the new title is blank.
    pub async fn update_details(
        &self,
        request: UpdateTaskDetailsRequest,
    ) -> TaskLifecycleResult<Task> {
        let UpdateTaskDetailsRequest {
            task_id,
            title,
            description,
        } = request;
        let validated_title = title.map(TaskTitle::new).transpose()?;
        let mut task = self.find_by_id_or_error(task_id).await?;
        if let Some(new_title) = validated_title {
            task.rename(new_title, &*self.clock);
        }
        if let Some(new_description) = description {
            task.describe(new_description, &*self.clock);
        }
        self.persist(&task).await?;
        Ok(task)
    }

    async fn persist(&self, task: &Task) -> TaskLifecycleResult<()> {
        let outcome = typed::replace(&*self.store, task).await?;
        if !outcome.is_matched() {
            return Err(TaskLifecycleError::NotFound(task.id()));
        }
        Ok(())
    }

    async fn find_by_id_or_error(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }
}
