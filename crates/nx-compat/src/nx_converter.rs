use crate::moon::*;
use crate::nx::*;
use moon_config::{DependencySource, ProjectType};
use serde_json::Map;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub fn task_to_nx_target(task: &Task) -> NxTarget {
    let mut inputs = vec![];

    for file in &task.input_files {
        inputs.push(NxInput::Input {
            input: file.to_owned(),
        });
    }

    for glob in &task.input_globs {
        inputs.push(NxInput::Fileset {
            fileset: glob.to_owned(),
        });
    }

    for var in &task.input_vars {
        inputs.push(NxInput::Env {
            env: var.to_owned(),
        });
    }

    NxTarget {
        cache: task.options.is_cache_enabled(),
        command: task.command.clone(),
        depends_on: task
            .deps
            .iter()
            .map(|dep| dep.target().to_owned())
            .collect(),
        executor: None,
        inputs,
        options: Map::new(),
        outputs: task
            .output_files
            .iter()
            .chain(task.output_globs.iter())
            .cloned()
            .collect(),
    }
}

pub fn project_to_nx_project(project: &Project) -> NxProject {
    NxProject {
        implicit_dependencies: project
            .dependencies
            .iter()
            .filter(|dep| matches!(dep.source, DependencySource::Explicit))
            .map(|dep| dep.id.clone())
            .collect(),
        name: project.id.clone(),
        named_inputs: project
            .file_groups
            .iter()
            .map(|(name, group)| {
                (
                    name.to_owned(),
                    group.files.iter().chain(group.globs.iter()).cloned().collect(),
                )
            })
            .collect(),
        project_type: if matches!(project.type_of, ProjectType::Application) {
            NxProjectType::Application
        } else {
            NxProjectType::Library
        },
        root: project.source.clone(),
        source_root: project.source.clone(),
        tags: project.config.tags.clone(),
        targets: project
            .tasks
            .iter()
            .map(|(name, task)| (name.to_owned(), task_to_nx_target(task)))
            .collect(),
    }
}

fn project_node_type(type_of: &ProjectType) -> NxProjectNodeType {
    match type_of {
        ProjectType::Application => NxProjectNodeType::App,
        ProjectType::Automation => NxProjectNodeType::E2e,
        _ => NxProjectNodeType::Lib,
    }
}

pub fn project_graph_to_nx_project_graph(project_graph: &ProjectGraph) -> NxProjectGraph {
    let mut nx_graph = NxProjectGraph::default();

    for (id, project) in &project_graph.projects {
        let node = Arc::new(NxProjectGraphNode {
            data: project_to_nx_project(project),
            name: id.to_owned(),
            type_of: project_node_type(&project.type_of),
        });

        nx_graph.nodes.insert(id.to_owned(), node);
        nx_graph.dependencies.entry(id.to_owned()).or_default();
    }

    // Registered after all IDs, so an alias can never replace a project
    for (id, project) in &project_graph.projects {
        let Some(alias) = project.alias.as_ref().filter(|alias| *alias != id) else {
            continue;
        };

        if nx_graph.nodes.contains_key(alias) {
            warn!(
                id = id.as_str(),
                alias = alias.as_str(),
                "Project alias collides with another project, skipping alias",
            );

            continue;
        }

        if let Some(node) = nx_graph.nodes.get(id).cloned() {
            nx_graph.nodes.insert(alias.to_owned(), node);
            nx_graph.aliases.insert(alias.to_owned(), id.to_owned());
        }
    }

    let graph = &project_graph.graph;

    for edge in &graph.edges {
        let (source_index, target_index) = edge.indices();

        let (Some(source), Some(target)) = (graph.nodes.get(source_index), graph.nodes.get(target_index))
        else {
            debug!(
                source = source_index,
                target = target_index,
                "Skipping project graph edge with an unknown node",
            );

            continue;
        };

        nx_graph
            .dependencies
            .entry(source.id().to_owned())
            .or_default()
            .push(NxProjectGraphDependency {
                source: source.id().to_owned(),
                target: target.id().to_owned(),
                type_of: NxDependencyType::Static,
            });
    }

    nx_graph
}

pub fn action_graph_to_nx_task_graph(
    action_graph: &ActionGraph,
    project_graph: &ProjectGraph,
) -> NxTaskGraph {
    let mut task_graph = NxTaskGraph::default();

    for node in &action_graph.nodes {
        let ActionNodeKind::RunTask { project, task } = node.kind() else {
            continue;
        };

        let Some((project_config, task_config)) = project_graph
            .projects
            .get(&project)
            .and_then(|config| config.tasks.get(&task).map(|task| (config, task)))
        else {
            debug!(
                id = node.id,
                label = node.label.as_str(),
                "Skipping action for an unknown project or task",
            );

            continue;
        };

        let id = node.id.to_string();
        let target = task_to_nx_target(task_config);

        task_graph.dependencies.insert(id.clone(), vec![]);
        task_graph.tasks.insert(
            id.clone(),
            NxTask {
                id,
                outputs: target.outputs,
                overrides: Map::new(),
                project_root: project_config.source.clone(),
                target: NxTaskTarget {
                    project,
                    target: task,
                },
            },
        );
    }

    for edge in &action_graph.edges {
        // Edges are trusted as-is, the target may not be a task
        if let Some(deps) = task_graph.dependencies.get_mut(&edge.source.to_string()) {
            deps.push(edge.target.to_string());
        }
    }

    // Setup and sync actions aren't tasks, so don't prevent a task from being a root
    task_graph.roots = task_graph
        .dependencies
        .iter()
        .filter(|(_, deps)| deps.iter().all(|dep| !task_graph.tasks.contains_key(dep)))
        .map(|(id, _)| id.to_owned())
        .collect();

    task_graph
}

/// Projects keyed by ID only, without alias entries.
pub fn project_graph_to_projects_map(project_graph: &ProjectGraph) -> BTreeMap<String, NxProject> {
    project_graph
        .projects
        .iter()
        .map(|(id, project)| (id.to_owned(), project_to_nx_project(project)))
        .collect()
}
