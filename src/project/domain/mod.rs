//! Domain model for projects and their task membership.

mod error;
mod ids;
mod project;

pub use error::ProjectDomainError;
pub use ids::{ProjectId, ProjectName};
pub use project::Project;
