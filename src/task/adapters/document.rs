//! Document mapping for the task aggregate.

use crate::store::{
    ports::{Collection, DocumentId},
    typed::StoredDocument,
};
use crate::task::domain::{Task, TaskId};

/// Document field holding the owning project identifier.
pub const PROJECT_FIELD: &str = "project_id";

/// Fields written when only the project back-reference changes.
pub const TASK_LINK_FIELDS: [&str; 2] = [PROJECT_FIELD, "updated_at"];

impl From<TaskId> for DocumentId {
    fn from(value: TaskId) -> Self {
        Self::from(value.into_inner())
    }
}

impl StoredDocument for Task {
    const COLLECTION: Collection = Collection::Tasks;

    fn document_id(&self) -> DocumentId {
        self.id().into()
    }
}
