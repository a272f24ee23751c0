//! Application services for projects and task linkage.

mod catalog;
mod linkage;

pub use catalog::{
    CreateProjectRequest, ProjectDeletion, ProjectService, ProjectServiceError,
    ProjectServiceResult,
};
pub use linkage::{
    CascadeDeletion, LinkageIssue, LinkageOperation, LinkageReport, LinkedTask, TaskLinkageError,
    TaskLinkageResult, TaskLinkageService, audit_links,
};
