use super::nx_project_json::NxProject;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NxProjectNodeType {
    App,
    E2e,
    Lib,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NxProjectGraphNode {
    pub data: NxProject,
    pub name: String,
    #[serde(rename = "type")]
    pub type_of: NxProjectNodeType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NxDependencyType {
    Static,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NxProjectGraphDependency {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub type_of: NxDependencyType,
}

#[derive(Clone, Debug, Default)]
pub struct NxProjectGraph {
    /// Alias to project ID.
    pub aliases: BTreeMap<String, String>,
    pub dependencies: BTreeMap<String, Vec<NxProjectGraphDependency>>,
    pub external_nodes: BTreeMap<String, JsonValue>,
    /// Aliases point to the same node as their project ID.
    pub nodes: BTreeMap<String, Arc<NxProjectGraphNode>>,
}

// JSON can't express shared references, so nodes are only written under
// their ID. Alias entries are re-linked on the JavaScript side.
impl Serialize for NxProjectGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes = self
            .nodes
            .iter()
            .filter(|(name, _)| !self.aliases.contains_key(*name))
            .map(|(name, node)| (name.as_str(), node.as_ref()))
            .collect::<BTreeMap<_, _>>();

        let mut graph = serializer.serialize_struct("NxProjectGraph", 3)?;
        graph.serialize_field("dependencies", &self.dependencies)?;
        graph.serialize_field("externalNodes", &self.external_nodes)?;
        graph.serialize_field("nodes", &nodes)?;
        graph.end()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NxTaskTarget {
    pub project: String,
    pub target: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NxTask {
    pub id: String,
    pub outputs: Vec<String>,
    pub overrides: Map<String, JsonValue>,
    pub project_root: String,
    pub target: NxTaskTarget,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct NxTaskGraph {
    pub dependencies: BTreeMap<String, Vec<String>>,
    pub roots: Vec<String>,
    pub tasks: BTreeMap<String, NxTask>,
}
