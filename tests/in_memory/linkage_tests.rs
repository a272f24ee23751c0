//! In-memory integration tests for project and task linkage.

use super::helpers::{MemoryWorkspace, workspace};
use eyre::{OptionExt, ensure};
use rstest::rstest;
use worktally::project::services::{CreateProjectRequest, LinkageIssue, TaskLinkageError};
use worktally::task::services::CreateTaskRequest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_a_task_requires_an_explicit_detach(workspace: MemoryWorkspace) -> eyre::Result<()> {
    let origin = workspace.projects.create(CreateProjectRequest::new("X")).await?;
    let target = workspace.projects.create(CreateProjectRequest::new("Y")).await?;
    let task = workspace.tasks.create(CreateTaskRequest::new("A")).await?;

    workspace.linkage.attach(origin.id(), task.id()).await?;
    workspace.linkage.attach(target.id(), task.id()).await?;
    let stale = workspace.linkage.audit().await?;
    ensure!(matches!(
        stale.issues(),
        [LinkageIssue::MismatchedBackReference { .. }]
    ));

    workspace.linkage.detach(origin.id(), task.id()).await?;

    ensure!(workspace.linkage.audit().await?.is_consistent());
    let owner = workspace
        .linkage
        .project_for_task(task.id())
        .await?
        .ok_or_eyre("task has an owner")?;
    ensure!(owner.id() == target.id());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_task_is_not_referenced_anywhere(workspace: MemoryWorkspace) -> eyre::Result<()> {
    let first = workspace.projects.create(CreateProjectRequest::new("Ops")).await?;
    let second = workspace.projects.create(CreateProjectRequest::new("Infra")).await?;
    let doomed = workspace.tasks.create(CreateTaskRequest::new("Rotate keys")).await?;
    let kept = workspace.tasks.create(CreateTaskRequest::new("Patch hosts")).await?;
    workspace.linkage.attach(first.id(), doomed.id()).await?;
    workspace.linkage.attach(second.id(), doomed.id()).await?;
    workspace.linkage.attach(second.id(), kept.id()).await?;

    workspace.linkage.delete_task_cascade(doomed.id()).await?;

    for project in workspace.projects.list().await? {
        ensure!(!project.contains_task(doomed.id()));
    }
    let members = workspace.projects.tasks_of(second.id()).await?;
    ensure!(members.iter().map(|task| task.id()).eq([kept.id()]));
    ensure!(workspace.linkage.audit().await?.is_consistent());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_task_twice_reports_not_found(workspace: MemoryWorkspace) -> eyre::Result<()> {
    let task = workspace.tasks.create(CreateTaskRequest::new("Once")).await?;
    workspace.linkage.delete_task_cascade(task.id()).await?;

    let result = workspace.linkage.delete_task_cascade(task.id()).await;

    ensure!(matches!(result, Err(TaskLinkageError::TaskNotFound { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn linkage_keeps_tracked_time_intact(workspace: MemoryWorkspace) -> eyre::Result<()> {
    let project = workspace.projects.create(CreateProjectRequest::new("Billing")).await?;
    let task = workspace.tasks.create(CreateTaskRequest::new("Invoice run")).await?;
    workspace.tasks.start(task.id()).await?;
    workspace.clock.advance_minutes(6);
    workspace.tasks.pause(task.id()).await?;

    workspace.linkage.attach(project.id(), task.id()).await?;
    workspace.clock.advance_minutes(4);
    let resumed = workspace.tasks.resume(task.id()).await?;

    ensure!(resumed.project_id() == Some(project.id()));
    ensure!(resumed.pause_events().len() == 1);
    ensure!(resumed.start_events().len() == 2);
    Ok(())
}
