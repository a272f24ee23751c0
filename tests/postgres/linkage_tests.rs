//! End-to-end linkage and time tracking on the `PostgreSQL` store.

use super::helpers::{PgContext, Workspace, pg_context};
use eyre::{OptionExt, ensure};
use rstest::rstest;
use worktally::{project::services::CreateProjectRequest, task::services::CreateTaskRequest};

#[rstest]
fn tracked_task_survives_attach_and_cascade(pg_context: PgContext) -> eyre::Result<()> {
    let workspace = Workspace::new(pg_context.store.clone());
    pg_context.rt.block_on(async {
        let project = workspace
            .projects
            .create(CreateProjectRequest::new("Database upgrade"))
            .await?;
        let task = workspace
            .tasks
            .create(CreateTaskRequest::new("Rehearse failover"))
            .await?;

        workspace.linkage.attach(project.id(), task.id()).await?;
        workspace.tasks.start(task.id()).await?;
        workspace.clock.advance_minutes(10);
        workspace.tasks.pause(task.id()).await?;
        workspace.clock.advance_minutes(5);
        workspace.tasks.resume(task.id()).await?;
        workspace.clock.advance_minutes(10);
        let completed = workspace.tasks.complete(task.id()).await?;

        ensure!(completed.project_id() == Some(project.id()));
        let total = completed.total_time().ok_or_eyre("completion freezes the total")?;
        ensure!(total.completion_label() == "Minutes: 20");

        let deletion = workspace.linkage.delete_task_cascade(task.id()).await?;
        ensure!(deletion.detached_from == vec![project.id()]);
        let stored = workspace
            .projects
            .find_by_id(project.id())
            .await?
            .ok_or_eyre("project outlives the task")?;
        ensure!(stored.task_ids().is_empty());
        Ok::<_, eyre::Report>(())
    })
}
