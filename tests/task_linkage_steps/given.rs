//! Given steps for task linkage BDD scenarios.

use super::world::{LinkageWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use worktally::{project::services::CreateProjectRequest, task::services::CreateTaskRequest};

#[given(r#"a project "{name}""#)]
fn a_project(world: &mut LinkageWorld, name: String) -> Result<(), eyre::Report> {
    let project = run_async(
        world
            .workspace
            .projects
            .create(CreateProjectRequest::new(name.clone())),
    )
    .wrap_err("create project for linkage scenario")?;
    world.projects.insert(name, project.id());
    Ok(())
}

#[given(r#"a task "{title}""#)]
fn a_task(world: &mut LinkageWorld, title: String) -> Result<(), eyre::Report> {
    let task = run_async(world.workspace.tasks.create(CreateTaskRequest::new(title)))
        .wrap_err("create task for linkage scenario")?;
    world.task = Some(task);
    Ok(())
}
