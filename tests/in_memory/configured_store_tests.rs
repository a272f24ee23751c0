//! Integration tests for services running on a store selected by config.

use super::helpers::Workspace;
use eyre::{OptionExt, ensure};
use rstest::rstest;
use worktally::{
    config::{AppConfig, StoreConfig},
    project::services::CreateProjectRequest,
    store::adapters::ConfiguredStore,
    task::services::CreateTaskRequest,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn default_config_runs_on_the_memory_backend() -> eyre::Result<()> {
    let config = AppConfig::from_toml_str("[logging]\nfilter = \"worktally=debug\"\n")?;
    ensure!(config.store == StoreConfig::Memory);

    let store = ConfiguredStore::connect(&config.store)?;
    ensure!(matches!(store, ConfiguredStore::Memory(_)));
    let workspace = Workspace::new(store);

    let project = workspace
        .projects
        .create(CreateProjectRequest::new("Configured"))
        .await?;
    let task = workspace.tasks.create(CreateTaskRequest::new("Smoke")).await?;
    workspace.linkage.attach(project.id(), task.id()).await?;

    let stored = workspace
        .projects
        .find_by_id(project.id())
        .await?
        .ok_or_eyre("project is stored")?;
    ensure!(stored.task_ids() == [task.id()]);
    Ok(())
}
