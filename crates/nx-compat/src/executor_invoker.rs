use crate::errors::NxCompatError;
use crate::executor_options::ExecutorOptions;
use crate::executor_resolver::ResolvedExecutor;
use crate::nx::ExecutorContext;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use starbase_utils::{fs, json};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

const BOOTSTRAP_SCRIPT: &str = include_str!("bootstrap.js");

/// The value returned (or last yielded) by an executor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecutorOutcome {
    pub result: JsonValue,
}

impl ExecutorOutcome {
    /// Only an explicit `success: false` is a failure.
    pub fn is_success(&self) -> bool {
        !matches!(self.result.get("success"), Some(JsonValue::Bool(false)))
    }
}

#[async_trait]
pub trait ExecutorInvoker: Send + Sync {
    async fn invoke(
        &self,
        executor: &ResolvedExecutor,
        options: &ExecutorOptions,
        context: &ExecutorContext,
    ) -> Result<ExecutorOutcome, NxCompatError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BootstrapPayload<'a> {
    context: &'a ExecutorContext,
    export_name: &'a str,
    module_path: &'a Path,
    options: &'a ExecutorOptions,
    project_graph_aliases: &'a BTreeMap<String, String>,
}

/// Written by the bootstrap script. The exit status belongs to the
/// executor, so loading problems are reported here instead.
#[derive(Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
enum BootstrapResult {
    Completed {
        #[serde(default)]
        result: JsonValue,
    },
    MissingExport,
}

/// Imports and calls executors within a Node.js child process,
/// streaming its output through our own stdio.
#[derive(Debug)]
pub struct NodeExecutorInvoker {
    pub node_bin: String,
    pub working_dir: PathBuf,
}

impl NodeExecutorInvoker {
    pub fn new(node_bin: &str, working_dir: &Path) -> Self {
        Self {
            node_bin: node_bin.to_owned(),
            working_dir: working_dir.to_path_buf(),
        }
    }

    fn write_payload(&self, payload: &BootstrapPayload) -> Result<NamedTempFile, NxCompatError> {
        let file = create_temp_file()?;

        json::write_file(file.path(), payload, false)?;

        Ok(file)
    }
}

fn create_temp_file() -> Result<NamedTempFile, NxCompatError> {
    NamedTempFile::new().map_err(|error| NxCompatError::Io {
        path: std::env::temp_dir(),
        error,
    })
}

#[async_trait]
impl ExecutorInvoker for NodeExecutorInvoker {
    async fn invoke(
        &self,
        executor: &ResolvedExecutor,
        options: &ExecutorOptions,
        context: &ExecutorContext,
    ) -> Result<ExecutorOutcome, NxCompatError> {
        let payload_file = self.write_payload(&BootstrapPayload {
            context,
            export_name: &executor.export_name,
            module_path: &executor.module_path,
            options,
            project_graph_aliases: &context.project_graph.aliases,
        })?;
        let result_file = create_temp_file()?;

        debug!(
            executor = %executor.identifier,
            module = ?executor.module_path,
            "Invoking executor with {}",
            self.node_bin,
        );

        let status = Command::new(&self.node_bin)
            .arg("-e")
            .arg(BOOTSTRAP_SCRIPT)
            .env("NX_COMPAT_PAYLOAD", payload_file.path())
            .env("NX_COMPAT_RESULT", result_file.path())
            .current_dir(&self.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|error| NxCompatError::CommandSpawnFailed {
                command: self.node_bin.clone(),
                error,
            })?;

        if !status.success() {
            return Err(NxCompatError::ExecutorFailed {
                executor: executor.identifier.to_string(),
                code: status.code().unwrap_or(-1),
            });
        }

        let output = fs::read_file(result_file.path())?;

        // The executor exited the process itself before returning
        if output.trim().is_empty() {
            return Ok(ExecutorOutcome::default());
        }

        let result: BootstrapResult =
            serde_json::from_str(&output).map_err(|error| NxCompatError::InvalidJson {
                path: result_file.path().to_path_buf(),
                error,
            })?;

        match result {
            BootstrapResult::Completed { result } => Ok(ExecutorOutcome { result }),
            BootstrapResult::MissingExport => Err(NxCompatError::MissingExport {
                export: executor.export_name.clone(),
                path: executor.module_path.clone(),
            }),
        }
    }
}
