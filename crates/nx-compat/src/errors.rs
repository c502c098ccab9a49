use miette::Diagnostic;
use starbase_utils::fs::FsError;
use starbase_utils::json::JsonError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum NxCompatError {
    #[diagnostic(
        code(nx_compat::missing_env_var),
        help("nx-compat must be run through a moon task, e.g. `moon run project:task`.")
    )]
    #[error("Missing required environment variable {0}.")]
    MissingEnvVar(String),

    #[diagnostic(code(nx_compat::invalid_target))]
    #[error("Invalid moon target {0}, expected the format project:task.")]
    InvalidTarget(String),

    #[diagnostic(code(nx_compat::missing_task))]
    #[error("Task {task} does not exist in the snapshot for project {project}.")]
    MissingTask { project: String, task: String },

    #[diagnostic(code(nx_compat::unresolved_package))]
    #[error("Unable to resolve {specifier} from {}.", .from.display())]
    UnresolvedPackage { specifier: String, from: PathBuf },

    #[diagnostic(
        code(nx_compat::invalid_executor),
        help("Executors must be in the format of package:executor, e.g. @nx/js:tsc.")
    )]
    #[error("Invalid executor {0}.")]
    InvalidExecutorFormat(String),

    #[diagnostic(code(nx_compat::missing_executors_manifest))]
    #[error("Package {package} does not provide an executors manifest at {}.", .path.display())]
    MissingExecutorsManifest { package: String, path: PathBuf },

    #[diagnostic(code(nx_compat::missing_executor))]
    #[error("Executor {executor} does not exist in {}.", .path.display())]
    MissingExecutor { executor: String, path: PathBuf },

    #[diagnostic(code(nx_compat::missing_implementation))]
    #[error("Unable to find implementation {implementation} for package {package}.")]
    MissingImplementation {
        implementation: String,
        package: String,
    },

    #[diagnostic(code(nx_compat::missing_export))]
    #[error("Export {export} in {} is missing or is not a function.", .path.display())]
    MissingExport { export: String, path: PathBuf },

    #[diagnostic(
        code(nx_compat::command_spawn_failed),
        help("Is the binary installed and available on PATH?")
    )]
    #[error("Failed to run command `{command}`.")]
    CommandSpawnFailed {
        command: String,
        #[source]
        error: std::io::Error,
    },

    #[diagnostic(code(nx_compat::command_failed))]
    #[error("Command `{command}` failed with exit code {code}.\n{stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[diagnostic(code(nx_compat::invalid_command_output))]
    #[error("Command `{command}` did not output valid JSON.")]
    InvalidCommandOutput {
        command: String,
        #[source]
        error: serde_json::Error,
    },

    #[diagnostic(code(nx_compat::executor_failed))]
    #[error("Executor {executor} failed with exit code {code}.")]
    ExecutorFailed { executor: String, code: i32 },

    #[diagnostic(code(nx_compat::io))]
    #[error("Failed to access {}.", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[diagnostic(code(nx_compat::invalid_json))]
    #[error("Failed to parse {}.", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        error: serde_json::Error,
    },

    #[diagnostic(code(nx_compat::fs))]
    #[error(transparent)]
    Fs(#[from] FsError),

    #[diagnostic(code(nx_compat::json))]
    #[error(transparent)]
    Json(#[from] JsonError),
}

