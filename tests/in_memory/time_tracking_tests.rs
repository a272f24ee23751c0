//! In-memory integration tests for task lifecycle and tracked time.

use super::helpers::{MemoryWorkspace, t0, workspace};
use chrono::TimeDelta;
use eyre::{OptionExt, ensure};
use rstest::rstest;
use worktally::task::{
    domain::{TaskDomainError, TaskStatus},
    services::{CreateTaskRequest, TaskLifecycleError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn paused_minutes_are_excluded_from_net_time(workspace: MemoryWorkspace) -> eyre::Result<()> {
    let task = workspace
        .tasks
        .create(CreateTaskRequest::new("Prepare board deck"))
        .await?;

    workspace.tasks.start(task.id()).await?;
    workspace.clock.advance_minutes(10);
    workspace.tasks.pause(task.id()).await?;
    workspace.clock.advance_minutes(5);
    workspace.tasks.resume(task.id()).await?;
    workspace.clock.advance_minutes(10);
    let completed = workspace.tasks.complete(task.id()).await?;

    let total = completed.total_time().ok_or_eyre("completion freezes the total")?;
    ensure!(completed.status() == TaskStatus::Completed);
    ensure!(completed.complete_event() == Some(t0() + TimeDelta::minutes(25)));
    ensure!(total.net_minutes_display() == "20.00");
    ensure!(total.completion_label() == "Minutes: 20");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uninterrupted_work_is_fully_counted(workspace: MemoryWorkspace) -> eyre::Result<()> {
    let task = workspace
        .tasks
        .create(CreateTaskRequest::new("Reply to auditors"))
        .await?;

    workspace.tasks.start(task.id()).await?;
    workspace.clock.advance_minutes(5);
    let completed = workspace.tasks.complete(task.id()).await?;

    let total = completed.total_time().ok_or_eyre("completion freezes the total")?;
    ensure!(total.completion_label() == "Minutes: 5");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tracked_time_is_stable_after_completion(workspace: MemoryWorkspace) -> eyre::Result<()> {
    let task = workspace
        .tasks
        .create(CreateTaskRequest::new("Close the books"))
        .await?;
    workspace.tasks.start(task.id()).await?;
    workspace.clock.advance_minutes(30);
    workspace.tasks.complete(task.id()).await?;

    workspace.clock.advance_minutes(90);
    let later = workspace.tasks.tracked_time(task.id()).await?;

    ensure!(later.net() == TimeDelta::minutes(30));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_task_cannot_be_restarted(workspace: MemoryWorkspace) -> eyre::Result<()> {
    let task = workspace
        .tasks
        .create(CreateTaskRequest::new("One-off fix"))
        .await?;
    workspace.tasks.start(task.id()).await?;
    workspace.clock.advance_minutes(2);
    let completed = workspace.tasks.complete(task.id()).await?;

    for result in [
        workspace.tasks.start(task.id()).await,
        workspace.tasks.pause(task.id()).await,
        workspace.tasks.resume(task.id()).await,
        workspace.tasks.complete(task.id()).await,
    ] {
        ensure!(matches!(
            result,
            Err(TaskLifecycleError::Domain(TaskDomainError::InvalidTransition {
                status: TaskStatus::Completed,
                ..
            }))
        ));
    }
    ensure!(workspace.tasks.find_by_id(task.id()).await? == Some(completed));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resume_before_start_is_rejected(workspace: MemoryWorkspace) -> eyre::Result<()> {
    let task = workspace
        .tasks
        .create(CreateTaskRequest::new("Not yet"))
        .await?;

    let result = workspace.tasks.resume(task.id()).await;

    ensure!(matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::InvalidTransition { .. }))
    ));
    let stored = workspace
        .tasks
        .find_by_id(task.id())
        .await?
        .ok_or_eyre("task is still stored")?;
    ensure!(stored.start_events().is_empty());
    ensure!(stored.pause_events().is_empty());
    Ok(())
}
