//! Document mapping for the project aggregate.

use crate::project::domain::{Project, ProjectId};
use crate::store::{
    ports::{Collection, DocumentId},
    typed::StoredDocument,
};

/// Document field holding the member task identifiers.
pub const TASK_IDS_FIELD: &str = "task_ids";

/// Fields written when only project membership changes.
pub const PROJECT_MEMBERSHIP_FIELDS: [&str; 2] = [TASK_IDS_FIELD, "updated_at"];

impl From<ProjectId> for DocumentId {
    fn from(value: ProjectId) -> Self {
        Self::from(value.into_inner())
    }
}

impl StoredDocument for Project {
    const COLLECTION: Collection = Collection::Projects;

    fn document_id(&self) -> DocumentId {
        self.id().into()
    }
}
