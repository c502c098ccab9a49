// Shapes emitted by `moon project-graph --json`, `moon action-graph --json`,
// and the project snapshot moon writes for each running task.

mod action_graph;
mod project_graph;

pub use action_graph::*;
pub use project_graph::*;
