//! Service layer for project creation, lookup and removal.

use crate::project::domain::{Project, ProjectDomainError, ProjectId, ProjectName};
use crate::store::{
    ports::{Collection, DocumentId, DocumentStore, StoreError},
    typed,
};
use crate::task::{
    adapters::TASK_LINK_FIELDS,
    domain::{Task, TaskId},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Result of [`ProjectService::delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDeletion {
    /// The project as it was before deletion.
    pub project: Project,
    /// Tasks whose back-reference to the project was cleared.
    pub released: Vec<TaskId>,
}

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: Option<String>,
}

impl CreateProjectRequest {
    /// Creates a request with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// The project does not exist.
    #[error("project not found: {0}")]
    NotFound(ProjectId),
    /// Document store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project orchestration service.
#[derive(Clone)]
pub struct ProjectService<S, C>
where
    S: DocumentStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> ProjectService<S, C>
where
    S: DocumentStore,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates an empty project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Domain`] when the name is blank and
    /// [`ProjectServiceError::Store`] when the insert fails.
    pub async fn create(&self, request: CreateProjectRequest) -> ProjectServiceResult<Project> {
        let name = ProjectName::new(request.name)?;
        let project = Project::new(name, request.description, &*self.clock);
        typed::insert_new(&*self.store, &project).await?;
        info!(project_id = %project.id(), "created project");
        Ok(project)
    }

    /// Retrieves a project by identifier.
    ///
    /// Returns `Ok(None)` when the project does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Store`] when the lookup fails.
    pub async fn find_by_id(&self, id: ProjectId) -> ProjectServiceResult<Option<Project>> {
        Ok(typed::fetch(&*self.store, &DocumentId::from(id)).await?)
    }

    /// Returns every project in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Store`] when the listing fails.
    pub async fn list(&self) -> ProjectServiceResult<Vec<Project>> {
        Ok(typed::fetch_all(&*self.store).await?)
    }

    /// Renames a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Domain`] when the name is blank and
    /// [`ProjectServiceError::NotFound`] for unknown projects.
    pub async fn rename(
        &self,
        id: ProjectId,
        name: impl Into<String>,
    ) -> ProjectServiceResult<Project> {
        let new_name = ProjectName::new(name)?;
        let mut project = self.find_by_id_or_error(id).await?;
        project.rename(new_name, &*self.clock);
        let outcome = typed::replace(&*self.store, &project).await?;
        if !outcome.is_matched() {
            return Err(ProjectServiceError::NotFound(id));
        }
        Ok(project)
    }

    /// Resolves the project's member tasks in listing order.
    ///
    /// Listed ids that no longer resolve are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for unknown projects.
    pub async fn tasks_of(&self, id: ProjectId) -> ProjectServiceResult<Vec<Task>> {
        let project = self.find_by_id_or_error(id).await?;
        let mut tasks = Vec::with_capacity(project.task_ids().len());
        for &task_id in project.task_ids() {
            match typed::fetch::<Task, _>(&*self.store, &DocumentId::from(task_id)).await? {
                Some(task) => tasks.push(task),
                None => warn!(project_id = %id, %task_id, "project lists a missing task"),
            }
        }
        Ok(tasks)
    }

    /// Deletes a project after clearing the back-reference of every task
    /// pointing at it.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for unknown projects and
    /// [`ProjectServiceError::Store`] when a write fails.
    pub async fn delete(&self, id: ProjectId) -> ProjectServiceResult<ProjectDeletion> {
        let project = self.find_by_id_or_error(id).await?;
        let tasks: Vec<Task> = typed::fetch_all(&*self.store).await?;
        let mut released = Vec::new();
        for mut task in tasks {
            if task.project_id() != Some(id) {
                continue;
            }
            task.clear_project(&*self.clock);
            let outcome = typed::patch_fields(&*self.store, &task, &TASK_LINK_FIELDS).await?;
            if outcome.is_matched() {
                released.push(task.id());
            } else {
                warn!(project_id = %id, task_id = %task.id(), "task vanished before release");
            }
        }

        let outcome = self
            .store
            .delete_by_id(Collection::Projects, &DocumentId::from(id))
            .await?;
        if !outcome.is_deleted() {
            return Err(ProjectServiceError::NotFound(id));
        }
        info!(project_id = %id, released = released.len(), "deleted project");
        Ok(ProjectDeletion { project, released })
    }

    async fn find_by_id_or_error(&self, id: ProjectId) -> ProjectServiceResult<Project> {
        self.find_by_id(id)
            .await?
            .ok_or(ProjectServiceError::NotFound(id))
    }
}
