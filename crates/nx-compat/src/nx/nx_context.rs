// https://nx.dev/extending-nx/recipes/local-executors

use super::nx_graph::{NxProjectGraph, NxTaskGraph};
use super::nx_json::NxJson;
use super::nx_project_json::{NxProject, NxTarget};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Clone, Debug, Default, Serialize)]
pub struct ProjectsConfigurations {
    pub projects: BTreeMap<String, NxProject>,
    pub version: u32,
}

/// Deprecated by Nx but still read by older executors.
#[derive(Clone, Debug, Default, Serialize)]
pub struct WorkspaceConfiguration {
    #[serde(flatten)]
    pub nx_json: NxJson,
    pub projects: BTreeMap<String, NxProject>,
    pub version: u32,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_name: Option<String>,
    pub cwd: PathBuf,
    pub is_verbose: bool,
    pub nx_json_configuration: NxJson,
    pub project_graph: NxProjectGraph,
    pub project_name: String,
    pub projects_configurations: ProjectsConfigurations,
    pub root: PathBuf,
    pub target: NxTarget,
    pub target_name: String,
    pub task_graph: NxTaskGraph,
    pub workspace: WorkspaceConfiguration,
}
