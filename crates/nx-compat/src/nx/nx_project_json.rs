// https://nx.dev/reference/project-configuration

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NxInput {
    DepOutput {
        #[serde(rename = "dependentTasksOutputFiles")]
        dependent_tasks_output_files: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        transitive: Option<bool>,
    },
    External {
        #[serde(rename = "externalDependencies")]
        external_dependencies: Vec<String>,
    },
    Env {
        env: String,
    },
    Fileset {
        fileset: String,
    },
    Input {
        input: String,
    },
    Runtime {
        runtime: String,
    },
    Source(String),
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NxProjectType {
    Application,
    #[default]
    Library,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NxTarget {
    pub cache: bool,
    pub command: String,
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,
    pub inputs: Vec<NxInput>,
    pub options: Map<String, JsonValue>,
    pub outputs: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NxProject {
    pub implicit_dependencies: Vec<String>,
    pub name: String,
    pub named_inputs: BTreeMap<String, Vec<String>>,
    pub project_type: NxProjectType,
    pub root: String,
    pub source_root: String,
    pub tags: Vec<String>,
    pub targets: BTreeMap<String, NxTarget>,
}
