//! Service that keeps task back-references and project membership in sync.
//!
//! `Task::project_id` and `Project::task_ids` are stored in different
//! documents with no referential integrity in the store. Every write to
//! either side goes through [`TaskLinkageService`]. Writes are not
//! transactional: if the project write succeeds and the task write then
//! fails, the project keeps the new member and the error is returned.

use crate::project::{
    adapters::PROJECT_MEMBERSHIP_FIELDS,
    domain::{Project, ProjectId},
};
use crate::store::{
    ports::{Collection, DocumentId, DocumentStore, StoreError},
    typed,
};
use crate::task::{
    adapters::TASK_LINK_FIELDS,
    domain::{Task, TaskId},
};
use mockable::Clock;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Linkage operation named in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkageOperation {
    /// [`TaskLinkageService::attach`].
    Attach,
    /// [`TaskLinkageService::detach`].
    Detach,
    /// [`TaskLinkageService::delete_task_cascade`].
    DeleteCascade,
    /// [`TaskLinkageService::project_for_task`].
    Lookup,
}

impl fmt::Display for LinkageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Attach => "attach",
            Self::Detach => "detach",
            Self::DeleteCascade => "delete cascade",
            Self::Lookup => "lookup",
        })
    }
}

/// Service-level errors for linkage operations.
#[derive(Debug, Error)]
pub enum TaskLinkageError {
    /// The project id does not resolve.
    #[error("project {project_id} not found during {operation}")]
    ProjectNotFound {
        /// Unresolved project.
        project_id: ProjectId,
        /// Operation that needed it.
        operation: LinkageOperation,
    },
    /// The task id does not resolve.
    #[error("task {task_id} not found during {operation}")]
    TaskNotFound {
        /// Unresolved task.
        task_id: TaskId,
        /// Operation that needed it.
        operation: LinkageOperation,
    },
    /// Document store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for linkage operations.
pub type TaskLinkageResult<T> = Result<T, TaskLinkageError>;

/// Both sides of a link after [`TaskLinkageService::attach`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedTask {
    /// Project listing the task.
    pub project: Project,
    /// Task pointing at the project.
    pub task: Task,
}

/// Result of [`TaskLinkageService::delete_task_cascade`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeDeletion {
    /// The task as it was before deletion.
    pub task: Task,
    /// Projects from which the task id was removed.
    pub detached_from: Vec<ProjectId>,
}

/// A disagreement between project membership and task back-references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkageIssue {
    /// A project lists a task that does not exist.
    DanglingTaskId {
        /// Listing project.
        project_id: ProjectId,
        /// Missing task.
        task_id: TaskId,
    },
    /// A project lists a task whose back-reference names another project
    /// or none.
    MismatchedBackReference {
        /// Listing project.
        project_id: ProjectId,
        /// Listed task.
        task_id: TaskId,
        /// Project the task actually points at.
        task_project_id: Option<ProjectId>,
    },
    /// A task points at a project that does not exist.
    MissingProject {
        /// Pointing task.
        task_id: TaskId,
        /// Missing project.
        project_id: ProjectId,
    },
    /// A task points at a project that does not list it.
    UnlistedTask {
        /// Pointing task.
        task_id: TaskId,
        /// Project lacking the task.
        project_id: ProjectId,
    },
}

/// Findings of [`TaskLinkageService::audit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkageReport {
    issues: Vec<LinkageIssue>,
}

impl LinkageReport {
    /// Returns `true` when no disagreement was found.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns every disagreement found.
    #[must_use]
    pub fn issues(&self) -> &[LinkageIssue] {
        &self.issues
    }
}

/// Owner of the project ↔ task reference pair.
#[derive(Clone)]
pub struct TaskLinkageService<S, C>
where
    S: DocumentStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskLinkageService<S, C>
where
    S: DocumentStore,
    C: Clock + Send + Sync,
{
    /// Creates a new linkage service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Lists the task under the project and points the task at the project.
    ///
    /// Idempotent. A previous owner is not detached: callers moving a task
    /// call [`Self::detach`] first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLinkageError::ProjectNotFound`] or
    /// [`TaskLinkageError::TaskNotFound`] when either id does not resolve,
    /// and [`TaskLinkageError::Store`] when a write fails.
    pub async fn attach(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> TaskLinkageResult<LinkedTask> {
        let operation = LinkageOperation::Attach;
        let mut project = self.project_or_error(project_id, operation).await?;
        let mut task = self.task_or_error(task_id, operation).await?;

        if project.add_task(task_id, &*self.clock) {
            self.write_membership(&project, operation).await?;
        }
        if task.project_id() != Some(project_id) {
            if let Some(previous) = task.project_id() {
                debug!(%task_id, %previous, "attach overwrites existing back-reference");
            }
            task.assign_project(project_id, &*self.clock);
            if let Err(err) = self.write_back_reference(&task, operation).await {
                warn!(%project_id, %task_id, error = %err, "task back-reference write failed after project update");
                return Err(err);
            }
        }

        debug!(%project_id, %task_id, "attached task");
        Ok(LinkedTask { project, task })
    }

    /// Removes the task from the project's member list.
    ///
    /// Leaves the task's back-reference untouched. A no-op when the task is
    /// not listed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLinkageError::ProjectNotFound`] when the project does
    /// not resolve and [`TaskLinkageError::Store`] when the write fails.
    pub async fn detach(&self, project_id: ProjectId, task_id: TaskId) -> TaskLinkageResult<Project> {
        let operation = LinkageOperation::Detach;
        let mut project = self.project_or_error(project_id, operation).await?;
        if project.remove_task(task_id, &*self.clock) {
            self.write_membership(&project, operation).await?;
            debug!(%project_id, %task_id, "detached task");
        }
        Ok(project)
    }

    /// Deletes a task after removing its id from every project listing it.
    ///
    /// A back-reference to a project that no longer exists is logged and
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLinkageError::TaskNotFound`] when the task does not
    /// resolve and [`TaskLinkageError::Store`] when a write fails.
    pub async fn delete_task_cascade(&self, task_id: TaskId) -> TaskLinkageResult<CascadeDeletion> {
        let operation = LinkageOperation::DeleteCascade;
        let task = self.task_or_error(task_id, operation).await?;
        let mut detached_from = Vec::new();

        if let Some(project_id) = task.project_id() {
            match self.detach(project_id, task_id).await {
                Ok(_) => detached_from.push(project_id),
                Err(TaskLinkageError::ProjectNotFound { .. }) => {
                    warn!(%task_id, %project_id, "deleted task referenced a missing project");
                }
                Err(err) => return Err(err),
            }
        }

        // Attach does not detach previous owners, so other projects may
        // still list the task.
        let projects: Vec<Project> = typed::fetch_all(&*self.store).await?;
        for mut project in projects {
            if detached_from.contains(&project.id()) {
                continue;
            }
            if project.remove_task(task_id, &*self.clock) {
                self.write_membership(&project, operation).await?;
                detached_from.push(project.id());
            }
        }

        let outcome = self
            .store
            .delete_by_id(Collection::Tasks, &DocumentId::from(task_id))
            .await?;
        if !outcome.is_deleted() {
            return Err(TaskLinkageError::TaskNotFound { task_id, operation });
        }

        info!(%task_id, detached = detached_from.len(), "deleted task");
        Ok(CascadeDeletion {
            task,
            detached_from,
        })
    }

    /// Resolves the project a task points at.
    ///
    /// Returns `Ok(None)` when the task is unassigned or its project no
    /// longer exists.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLinkageError::TaskNotFound`] when the task does not
    /// resolve.
    pub async fn project_for_task(&self, task_id: TaskId) -> TaskLinkageResult<Option<Project>> {
        let task = self.task_or_error(task_id, LinkageOperation::Lookup).await?;
        let Some(project_id) = task.project_id() else {
            return Ok(None);
        };
        Ok(typed::fetch(&*self.store, &DocumentId::from(project_id)).await?)
    }

    /// Scans every project and task for reference disagreements.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLinkageError::Store`] when either collection cannot be
    /// read.
    pub async fn audit(&self) -> TaskLinkageResult<LinkageReport> {
        let projects: Vec<Project> = typed::fetch_all(&*self.store).await?;
        let tasks: Vec<Task> = typed::fetch_all(&*self.store).await?;
        let report = audit_links(&projects, &tasks);
        for issue in report.issues() {
            warn!(?issue, "linkage inconsistency");
        }
        Ok(report)
    }

    async fn write_membership(
        &self,
        project: &Project,
        operation: LinkageOperation,
    ) -> TaskLinkageResult<()> {
        let outcome =
            typed::patch_fields(&*self.store, project, &PROJECT_MEMBERSHIP_FIELDS).await?;
        if !outcome.is_matched() {
            return Err(TaskLinkageError::ProjectNotFound {
                project_id: project.id(),
                operation,
            });
        }
        Ok(())
    }

    async fn write_back_reference(
        &self,
        task: &Task,
        operation: LinkageOperation,
    ) -> TaskLinkageResult<()> {
        let outcome = typed::patch_fields(&*self.store, task, &TASK_LINK_FIELDS).await?;
        if !outcome.is_matched() {
            return Err(TaskLinkageError::TaskNotFound {
                task_id: task.id(),
                operation,
            });
        }
        Ok(())
    }

    async fn project_or_error(
        &self,
        project_id: ProjectId,
        operation: LinkageOperation,
    ) -> TaskLinkageResult<Project> {
        typed::fetch(&*self.store, &DocumentId::from(project_id))
            .await?
            .ok_or(TaskLinkageError::ProjectNotFound {
                project_id,
                operation,
            })
    }

    async fn task_or_error(
        &self,
        task_id: TaskId,
        operation: LinkageOperation,
    ) -> TaskLinkageResult<Task> {
        typed::fetch(&*self.store, &DocumentId::from(task_id))
            .await?
            .ok_or(TaskLinkageError::TaskNotFound { task_id, operation })
    }
}

/// Compares project membership against task back-references.
#[must_use]
pub fn audit_links(projects: &[Project], tasks: &[Task]) -> LinkageReport {
    let tasks_by_id: HashMap<TaskId, &Task> = tasks.iter().map(|task| (task.id(), task)).collect();
    let projects_by_id: HashMap<ProjectId, &Project> = projects
        .iter()
        .map(|project| (project.id(), project))
        .collect();
    let mut issues = Vec::new();

    for project in projects {
        let mut seen = HashSet::new();
        for &task_id in project.task_ids() {
            if !seen.insert(task_id) {
                continue;
            }
            match tasks_by_id.get(&task_id) {
                None => issues.push(LinkageIssue::DanglingTaskId {
                    project_id: project.id(),
                    task_id,
                }),
                Some(task) if task.project_id() != Some(project.id()) => {
                    issues.push(LinkageIssue::MismatchedBackReference {
                        project_id: project.id(),
                        task_id,
                        task_project_id: task.project_id(),
                    });
                }
                Some(_) => {}
            }
        }
    }

    for task in tasks {
        let Some(project_id) = task.project_id() else {
            continue;
        };
        match projects_by_id.get(&project_id) {
            None => issues.push(LinkageIssue::MissingProject {
                task_id: task.id(),
                project_id,
            }),
            Some(project) if !project.contains_task(task.id()) => {
                issues.push(LinkageIssue::UnlistedTask {
                    task_id: task.id(),
                    project_id,
                });
            }
            Some(_) => {}
        }
    }

    LinkageReport { issues }
}
