use moon_config::{DependencySource, ProjectType};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

// Only type fields we actually need!

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DependencyConfig {
    pub id: String,
    pub source: DependencySource,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileGroup {
    pub files: Vec<String>,
    pub globs: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum TaskDependency {
    Config { target: String },
    Target(String),
}

impl TaskDependency {
    pub fn target(&self) -> &str {
        match self {
            Self::Config { target } | Self::Target(target) => target,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum TaskCacheOption {
    Enabled(bool),
    // local, remote
    Mode(String),
}

impl Default for TaskCacheOption {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskOptions {
    pub cache: TaskCacheOption,
}

impl TaskOptions {
    pub fn is_cache_enabled(&self) -> bool {
        match &self.cache {
            TaskCacheOption::Enabled(enabled) => *enabled,
            TaskCacheOption::Mode(_) => true,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    pub command: String,
    pub deps: Vec<TaskDependency>,
    pub input_files: Vec<String>,
    pub input_globs: Vec<String>,
    pub input_vars: Vec<String>,
    pub options: TaskOptions,
    pub output_files: Vec<String>,
    pub output_globs: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectConfig {
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub alias: Option<String>, // package.json name
    pub config: ProjectConfig,
    pub dependencies: Vec<DependencyConfig>,
    pub file_groups: BTreeMap<String, FileGroup>,
    pub id: String,
    pub root: PathBuf,
    pub source: String,
    pub tasks: BTreeMap<String, Task>,
    #[serde(rename = "type")]
    pub type_of: ProjectType,
}

/// Graph nodes are either the project ID itself, or an object containing it.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum GraphNode {
    Id(String),
    Node { id: String },
}

impl GraphNode {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Node { id } => id,
        }
    }
}

/// Edges are serialized as `[dependent, dependency]` node indices,
/// with an optional trailing weight.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum GraphEdge {
    Pair(usize, usize),
    Weighted(usize, usize, serde_json::Value),
}

impl GraphEdge {
    pub fn indices(&self) -> (usize, usize) {
        match self {
            Self::Pair(source, target) | Self::Weighted(source, target, _) => (*source, *target),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectGraphInner {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectGraph {
    pub graph: ProjectGraphInner,
    pub projects: BTreeMap<String, Project>,
}
