//! Project aggregate root.

use super::{ProjectId, ProjectName};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Project aggregate root.
///
/// `task_ids` behaves as a set that remembers insertion order for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: ProjectName,
    description: Option<String>,
    task_ids: Vec<TaskId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates an empty project.
    #[must_use]
    pub fn new(name: ProjectName, description: Option<String>, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ProjectId::new(),
            name,
            description,
            task_ids: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the project description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns member task identifiers in insertion order.
    #[must_use]
    pub fn task_ids(&self) -> &[TaskId] {
        &self.task_ids
    }

    /// Returns `true` when the task is listed as a member.
    #[must_use]
    pub fn contains_task(&self, task_id: TaskId) -> bool {
        self.task_ids.contains(&task_id)
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

    /// Adds a member task. Returns `false` when it was already listed.
    pub fn add_task(&mut self, task_id: TaskId, clock: &impl Clock) -> bool {
        if self.contains_task(task_id) {
            return false;
        }
        self.task_ids.push(task_id);
        self.touch(clock);
        true
    }

    /// Removes a member task. Returns `false` when it was not listed.
    pub fn remove_task(&mut self, task_id: TaskId, clock: &impl Clock) -> bool {
        let before = self.task_ids.len();
        self.task_ids.retain(|existing| *existing != task_id);
        if self.task_ids.len() == before {
            return false;
        }
        self.touch(clock);
        true
    }

    /// Replaces the name.
    pub fn rename(&mut self, name: ProjectName, clock: &impl Clock) {
        self.name = name;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
