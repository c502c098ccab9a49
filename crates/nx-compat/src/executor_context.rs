use crate::cache::DataCache;
use crate::env::AdapterEnv;
use crate::errors::NxCompatError;
use crate::executor_options::ExecutorOptions;
use crate::loaders::*;
use crate::nx::*;
use crate::nx_converter::*;
use moon_target::{Target, TargetScope};
use tracing::debug;

/// The project and task that moon is currently running.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunningTarget {
    pub project: String,
    pub task: String,
}

impl RunningTarget {
    pub fn parse(value: &str) -> Result<Self, NxCompatError> {
        let target =
            Target::parse(value).map_err(|_| NxCompatError::InvalidTarget(value.to_owned()))?;

        match &target.scope {
            TargetScope::Project(id) => Ok(Self {
                project: id.to_string(),
                task: target.task_id.to_string(),
            }),
            _ => Err(NxCompatError::InvalidTarget(value.to_owned())),
        }
    }
}

/// Assemble the context an Nx executor receives as its second argument.
/// All moon and Nx data is loaded concurrently.
pub async fn build_executor_context(
    cache: &DataCache,
    env: &AdapterEnv,
    executor: &str,
    options: &ExecutorOptions,
) -> Result<ExecutorContext, NxCompatError> {
    let running = RunningTarget::parse(&env.target)?;
    let root = env.workspace_root.as_path();

    debug!(
        project = running.project.as_str(),
        task = running.task.as_str(),
        "Building executor context",
    );

    let (project, project_graph, action_graph, workspace_json, nx_json) = tokio::try_join!(
        load_project_snapshot(&env.project_snapshot),
        load_project_graph(cache, &env.moon_bin, root),
        load_action_graph(cache, &env.moon_bin, root),
        load_workspace_json(cache, root),
        load_nx_json(cache, root),
    )?;

    let Some(task) = project.tasks.get(&running.task) else {
        return Err(NxCompatError::MissingTask {
            project: running.project,
            task: running.task,
        });
    };

    let mut target = task_to_nx_target(task);
    target.executor = Some(executor.to_owned());
    target.options = options.clone();

    let projects = project_graph_to_projects_map(&project_graph);

    Ok(ExecutorContext {
        configuration_name: None,
        cwd: env.working_dir.clone(),
        is_verbose: env.verbose,
        nx_json_configuration: nx_json.as_ref().clone(),
        project_graph: project_graph_to_nx_project_graph(&project_graph),
        project_name: running.project,
        projects_configurations: ProjectsConfigurations {
            projects: projects.clone(),
            version: workspace_json.version,
        },
        root: env.workspace_root.clone(),
        target,
        target_name: running.task,
        task_graph: action_graph_to_nx_task_graph(&action_graph, &project_graph),
        workspace: WorkspaceConfiguration {
            nx_json: nx_json.as_ref().clone(),
            projects,
            version: workspace_json.version,
        },
    })
}
