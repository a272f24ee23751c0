//! Then steps for task linkage BDD scenarios.

use super::world::{LinkageWorld, run_async};
use rstest_bdd_macros::then;
use worktally::{
    project::services::{LinkageOperation, TaskLinkageError},
    task::domain::Task,
};

#[then(r#"project "{name}" lists the task once"#)]
fn project_lists_task_once(world: &LinkageWorld, name: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let project = world.stored_project(&name)?;
    let occurrences = project
        .task_ids()
        .iter()
        .filter(|listed| **listed == task_id)
        .count();
    eyre::ensure!(
        occurrences == 1,
        "project {name:?} lists the task {occurrences} times"
    );
    Ok(())
}

#[then(r#"project "{name}" does not list the task"#)]
fn project_does_not_list_task(world: &LinkageWorld, name: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let project = world.stored_project(&name)?;
    eyre::ensure!(
        !project.contains_task(task_id),
        "project {name:?} still lists the task"
    );
    Ok(())
}

#[then(r#"the task points at project "{name}""#)]
fn task_points_at_project(world: &LinkageWorld, name: String) -> Result<(), eyre::Report> {
    let expected = world.project_id(&name)?;
    let task_id = world.task_id()?;
    let stored: Task = run_async(world.workspace.tasks.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("task missing from store"))?;
    eyre::ensure!(
        stored.project_id() == Some(expected),
        "task points at {:?}, expected project {name:?}",
        stored.project_id()
    );
    Ok(())
}

#[then("no project lists the task")]
fn no_project_lists_task(world: &LinkageWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let projects = run_async(world.workspace.projects.list())?;
    if let Some(project) = projects.iter().find(|project| project.contains_task(task_id)) {
        return Err(eyre::eyre!(
            "project {} still lists the deleted task",
            project.name()
        ));
    }
    Ok(())
}

#[then("the task no longer exists")]
fn task_no_longer_exists(world: &LinkageWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let found = run_async(world.workspace.tasks.find_by_id(task_id))?;
    eyre::ensure!(found.is_none(), "deleted task is still stored");
    Ok(())
}

#[then("the linkage fails because the project was not found")]
fn linkage_fails_project_not_found(world: &LinkageWorld) -> Result<(), eyre::Report> {
    let error = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing linkage error"))?;
    if !matches!(
        error,
        TaskLinkageError::ProjectNotFound {
            operation: LinkageOperation::Attach,
            ..
        }
    ) {
        return Err(eyre::eyre!("expected ProjectNotFound error, got {error:?}"));
    }
    Ok(())
}
