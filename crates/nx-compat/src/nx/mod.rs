// Shapes that Nx executors expect to receive. These are defined by Nx,
// we only populate them.

mod nx_context;
mod nx_graph;
mod nx_json;
mod nx_project_json;

pub use nx_context::*;
pub use nx_graph::*;
pub use nx_json::*;
pub use nx_project_json::*;
