use crate::errors::NxCompatError;
use std::env;
use std::path::PathBuf;

pub const MOON_PROJECT_SNAPSHOT: &str = "MOON_PROJECT_SNAPSHOT";
pub const MOON_TARGET: &str = "MOON_TARGET";
pub const MOON_WORKING_DIR: &str = "MOON_WORKING_DIR";
pub const MOON_WORKSPACE_ROOT: &str = "MOON_WORKSPACE_ROOT";

/// Read an environment variable that moon sets for every task,
/// and fail if it's missing (we weren't run through moon).
pub fn require_env(name: &str) -> Result<String, NxCompatError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(NxCompatError::MissingEnvVar(name.to_owned())),
    }
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

/// Everything the adapter reads from the process environment.
#[derive(Clone, Debug)]
pub struct AdapterEnv {
    pub moon_bin: String,
    pub node_bin: String,
    pub project_snapshot: PathBuf,
    pub target: String,
    pub verbose: bool,
    pub working_dir: PathBuf,
    pub workspace_root: PathBuf,
}

impl AdapterEnv {
    pub fn from_env() -> Result<Self, NxCompatError> {
        Ok(Self {
            moon_bin: optional_env("NX_COMPAT_MOON_BIN").unwrap_or_else(|| "moon".into()),
            node_bin: optional_env("NX_COMPAT_NODE_BIN").unwrap_or_else(|| "node".into()),
            project_snapshot: PathBuf::from(require_env(MOON_PROJECT_SNAPSHOT)?),
            target: require_env(MOON_TARGET)?,
            verbose: optional_env("NX_VERBOSE_LOGGING").is_some_and(|value| value == "true"),
            working_dir: PathBuf::from(require_env(MOON_WORKING_DIR)?),
            workspace_root: PathBuf::from(require_env(MOON_WORKSPACE_ROOT)?),
        })
    }
}
