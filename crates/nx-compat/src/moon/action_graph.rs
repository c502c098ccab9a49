use serde::Deserialize;

const RUN_TASK_PREFIXES: [&str; 4] = [
    "RunTarget(",
    "RunTask(",
    "RunInteractiveTask(",
    "RunPersistentTask(",
];

/// What an action graph node does, derived from its label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionNodeKind {
    RunTask { project: String, task: String },
    Other,
}

impl ActionNodeKind {
    /// Parse a label like `RunTask(project:task)`. Labels for setup,
    /// sync, and install actions are all `Other`.
    pub fn parse(label: &str) -> Self {
        if !label.starts_with("Run") {
            return Self::Other;
        }

        let payload = RUN_TASK_PREFIXES
            .iter()
            .find_map(|prefix| label.strip_prefix(prefix))
            .and_then(|inner| inner.strip_suffix(')'));

        match payload.and_then(|target| target.split_once(':')) {
            Some((project, task)) if !project.is_empty() && !task.is_empty() => Self::RunTask {
                project: project.to_owned(),
                task: task.to_owned(),
            },
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ActionNode {
    pub id: u64,
    pub label: String,
}

impl ActionNode {
    pub fn kind(&self) -> ActionNodeKind {
        ActionNodeKind::parse(&self.label)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ActionEdge {
    pub source: u64,
    pub target: u64,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActionGraph {
    pub nodes: Vec<ActionNode>,
    pub edges: Vec<ActionEdge>,
}
