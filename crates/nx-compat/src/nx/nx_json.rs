// https://nx.dev/reference/nx-json

use super::nx_project_json::NxInput;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

pub type NxNamedInputs = BTreeMap<String, Vec<NxInput>>;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NxAffected {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_base: Option<String>,
}

/// Only fields that we inspect are typed, everything else is
/// passed through to executors untouched.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NxJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected: Option<NxAffected>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_inputs: Option<NxNamedInputs>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_defaults: Option<BTreeMap<String, JsonValue>>,

    #[serde(flatten)]
    pub rest: BTreeMap<String, JsonValue>,
}

fn default_version() -> u32 {
    2
}

/// The legacy `workspace.json` file, which maps project names to roots
/// or inline project configurations.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct WorkspaceJson {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub projects: BTreeMap<String, JsonValue>,
}

impl Default for WorkspaceJson {
    fn default() -> Self {
        Self {
            version: default_version(),
            projects: BTreeMap::new(),
        }
    }
}
