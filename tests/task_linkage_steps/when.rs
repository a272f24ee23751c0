//! When steps for task linkage BDD scenarios.

use super::world::{LinkageWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use worktally::project::domain::ProjectId;

#[when(r#"the task is attached to project "{name}""#)]
fn attach_to_project(world: &mut LinkageWorld, name: String) -> Result<(), eyre::Report> {
    let project_id = world.project_id(&name)?;
    let task_id = world.task_id()?;
    let linked = run_async(world.workspace.linkage.attach(project_id, task_id))
        .wrap_err_with(|| format!("attach task to project {name:?}"))?;
    world.task = Some(linked.task);
    Ok(())
}

#[when("the task is attached to an unknown project")]
fn attach_to_unknown_project(world: &mut LinkageWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    match run_async(world.workspace.linkage.attach(ProjectId::new(), task_id)) {
        Ok(_) => Err(eyre::eyre!("attach to an unknown project succeeded")),
        Err(err) => {
            world.last_error = Some(err);
            Ok(())
        }
    }
}

#[when(r#"the task is detached from project "{name}""#)]
fn detach_from_project(world: &mut LinkageWorld, name: String) -> Result<(), eyre::Report> {
    let project_id = world.project_id(&name)?;
    let task_id = world.task_id()?;
    run_async(world.workspace.linkage.detach(project_id, task_id))
        .wrap_err_with(|| format!("detach task from project {name:?}"))?;
    Ok(())
}

#[when("the task is deleted")]
fn delete_task(world: &mut LinkageWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    run_async(world.workspace.linkage.delete_task_cascade(task_id))
        .wrap_err("delete task with cascade")?;
    Ok(())
}
