use crate::cache::{CacheKey, DataCache};
use crate::errors::NxCompatError;
use crate::moon::{ActionGraph, Project, ProjectGraph};
use crate::nx::{NxJson, WorkspaceJson};
use serde::de::DeserializeOwned;
use starbase_utils::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;
use tracing::debug;

pub const ACTION_GRAPH_KEY: CacheKey<ActionGraph> = CacheKey::new("action-graph");
pub const NX_JSON_KEY: CacheKey<NxJson> = CacheKey::new("nx-json");
pub const PROJECT_GRAPH_KEY: CacheKey<ProjectGraph> = CacheKey::new("project-graph");
pub const WORKSPACE_JSON_KEY: CacheKey<WorkspaceJson> = CacheKey::new("workspace-json");

/// Run a moon sub-command that outputs JSON, and parse it.
pub async fn exec_moon_json<T: DeserializeOwned>(
    moon_bin: &str,
    root: &Path,
    subcommand: &str,
) -> Result<T, NxCompatError> {
    let command = format!("{moon_bin} {subcommand} --json --log off");

    debug!(command = command.as_str(), cwd = ?root, "Running moon command");

    let output = Command::new(moon_bin)
        .args([subcommand, "--json", "--log", "off"])
        .current_dir(root)
        .output()
        .await
        .map_err(|error| NxCompatError::CommandSpawnFailed {
            command: command.clone(),
            error,
        })?;

    if !output.status.success() {
        return Err(NxCompatError::CommandFailed {
            command,
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }

    serde_json::from_slice(&output.stdout)
        .map_err(|error| NxCompatError::InvalidCommandOutput { command, error })
}

/// Load the snapshot of the project that owns the running task.
/// This is written by moon for every run, so is never cached.
pub async fn load_project_snapshot(path: &Path) -> Result<Project, NxCompatError> {
    debug!(path = ?path, "Loading project snapshot");

    Ok(json::read_file(path)?)
}

pub async fn load_project_graph(
    cache: &DataCache,
    moon_bin: &str,
    root: &Path,
) -> Result<Arc<ProjectGraph>, NxCompatError> {
    cache
        .load_and_cache(&PROJECT_GRAPH_KEY, root, || {
            exec_moon_json(moon_bin, root, "project-graph")
        })
        .await
}

pub async fn load_action_graph(
    cache: &DataCache,
    moon_bin: &str,
    root: &Path,
) -> Result<Arc<ActionGraph>, NxCompatError> {
    cache
        .load_and_cache(&ACTION_GRAPH_KEY, root, || {
            exec_moon_json(moon_bin, root, "action-graph")
        })
        .await
}

/// Load both graphs at once, as they're usually needed together.
pub async fn load_graphs(
    cache: &DataCache,
    moon_bin: &str,
    root: &Path,
) -> Result<(Arc<ProjectGraph>, Arc<ActionGraph>), NxCompatError> {
    tokio::try_join!(
        load_project_graph(cache, moon_bin, root),
        load_action_graph(cache, moon_bin, root)
    )
}

async fn load_optional_json<T: DeserializeOwned + Default>(
    path: PathBuf,
) -> Result<T, NxCompatError> {
    if path.exists() {
        debug!(path = ?path, "Loading Nx config");

        Ok(json::read_file(&path)?)
    } else {
        Ok(T::default())
    }
}

pub async fn load_nx_json(cache: &DataCache, root: &Path) -> Result<Arc<NxJson>, NxCompatError> {
    cache
        .load_and_cache(&NX_JSON_KEY, root, || {
            load_optional_json(root.join("nx.json"))
        })
        .await
}

pub async fn load_workspace_json(
    cache: &DataCache,
    root: &Path,
) -> Result<Arc<WorkspaceJson>, NxCompatError> {
    cache
        .load_and_cache(&WORKSPACE_JSON_KEY, root, || {
            load_optional_json(root.join("workspace.json"))
        })
        .await
}
