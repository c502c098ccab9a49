use crate::errors::NxCompatError;
use crate::fs::FileSystem;
use crate::package_resolver::{join_relative, PackageResolver};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

const OUTPUT_DIR_REWRITES: [Option<&str>; 3] = [None, Some("/lib/"), Some("/build/")];

const MODULE_EXTENSIONS: [&str; 4] = ["", ".js", ".mjs", ".cjs"];

/// An executor in the format of `package:executor`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutorIdentifier {
    pub executor: String,
    pub package: String,
}

impl ExecutorIdentifier {
    pub fn parse(value: &str) -> Result<Self, NxCompatError> {
        match value.split_once(':') {
            Some((package, executor)) if !package.is_empty() && !executor.is_empty() => {
                Ok(Self {
                    executor: executor.to_owned(),
                    package: package.to_owned(),
                })
            }
            _ => Err(NxCompatError::InvalidExecutorFormat(value.to_owned())),
        }
    }
}

impl fmt::Display for ExecutorIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.package, self.executor)
    }
}

/// An executor whose implementation module exists on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedExecutor {
    pub export_name: String,
    pub identifier: ExecutorIdentifier,
    pub module_path: PathBuf,
    pub schema_path: Option<PathBuf>,
}

pub trait ExecutorResolver: Send + Sync {
    fn resolve(&self, identifier: &ExecutorIdentifier) -> Result<ResolvedExecutor, NxCompatError>;
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct PackageJsonWithExecutors {
    builders: Option<String>,
    executors: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExecutorEntry {
    Config {
        implementation: String,
        schema: Option<String>,
    },
    Implementation(String),
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ExecutorsJson {
    builders: BTreeMap<String, ExecutorEntry>,
    executors: BTreeMap<String, ExecutorEntry>,
}

/// Split `path#export` into its parts, defaulting the export to `default`.
pub fn parse_implementation(implementation: &str) -> (&str, &str) {
    match implementation.split_once('#') {
        Some((path, export)) if !export.is_empty() => (path, export),
        Some((path, _)) => (path, "default"),
        None => (implementation, "default"),
    }
}

/// Every location an implementation may have been built to, in priority
/// order: the path as-is, then with `/src/` swapped for `/lib/` and
/// `/build/`, each with no extension, `.js`, `.mjs`, and `.cjs`.
pub fn implementation_candidates(base_dir: &Path, module_path: &str) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(OUTPUT_DIR_REWRITES.len() * MODULE_EXTENSIONS.len());

    for rewrite in OUTPUT_DIR_REWRITES {
        let path = match rewrite {
            Some(dir) => module_path.replacen("/src/", dir, 1),
            None => module_path.to_owned(),
        };

        for ext in MODULE_EXTENSIONS {
            candidates.push(join_relative(base_dir, &format!("{path}{ext}")));
        }
    }

    candidates
}

/// Resolves executors from installed packages, using their `executors.json`.
#[derive(Debug)]
pub struct PackageExecutorResolver {
    fs: Arc<dyn FileSystem>,
    packages: PackageResolver,
    working_dir: PathBuf,
}

impl PackageExecutorResolver {
    pub fn new(fs: Arc<dyn FileSystem>, working_dir: &Path) -> Self {
        Self {
            packages: PackageResolver::new(Arc::clone(&fs)),
            fs,
            working_dir: working_dir.to_path_buf(),
        }
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<T, NxCompatError> {
        let content = self.fs.read_to_string(path)?;

        serde_json::from_str(&content).map_err(|error| NxCompatError::InvalidJson {
            path: path.to_path_buf(),
            error,
        })
    }
}

impl ExecutorResolver for PackageExecutorResolver {
    fn resolve(&self, identifier: &ExecutorIdentifier) -> Result<ResolvedExecutor, NxCompatError> {
        let package_root = self
            .packages
            .resolve_package_root(&identifier.package, &self.working_dir)?;

        debug!(
            package = identifier.package.as_str(),
            root = ?package_root,
            "Resolved package root",
        );

        let package_json: PackageJsonWithExecutors =
            self.read_json(&package_root.join("package.json"))?;

        let manifest_path = join_relative(
            &package_root,
            package_json
                .executors
                .or(package_json.builders)
                .as_deref()
                .unwrap_or("./executors.json"),
        );

        if !self.fs.is_file(&manifest_path) {
            return Err(NxCompatError::MissingExecutorsManifest {
                package: identifier.package.clone(),
                path: manifest_path,
            });
        }

        let mut manifest: ExecutorsJson = self.read_json(&manifest_path)?;

        let Some(entry) = manifest
            .executors
            .remove(&identifier.executor)
            .or_else(|| manifest.builders.remove(&identifier.executor))
        else {
            return Err(NxCompatError::MissingExecutor {
                executor: identifier.executor.clone(),
                path: manifest_path,
            });
        };

        let (implementation, schema) = match entry {
            ExecutorEntry::Config {
                implementation,
                schema,
            } => (implementation, schema),
            ExecutorEntry::Implementation(implementation) => (implementation, None),
        };

        let manifest_dir = manifest_path.parent().unwrap_or(package_root.as_path());
        let (module_path, export_name) = parse_implementation(&implementation);

        for candidate in implementation_candidates(manifest_dir, module_path) {
            trace!(candidate = ?candidate, "Probing for executor implementation");

            if self.fs.is_file(&candidate) {
                debug!(
                    executor = %identifier,
                    module = ?candidate,
                    export = export_name,
                    "Resolved executor implementation",
                );

                return Ok(ResolvedExecutor {
                    export_name: export_name.to_owned(),
                    identifier: identifier.clone(),
                    module_path: candidate,
                    schema_path: schema.map(|schema| join_relative(manifest_dir, &schema)),
                });
            }
        }

        Err(NxCompatError::MissingImplementation {
            implementation,
            package: identifier.package.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_identifiers() {
        assert_eq!(
            ExecutorIdentifier::parse("@nx/js:tsc").unwrap(),
            ExecutorIdentifier {
                executor: "tsc".into(),
                package: "@nx/js".into(),
            }
        );
    }

    #[test]
    fn errors_for_invalid_identifiers() {
        for value in ["badformat", ":tsc", "@nx/js:", ":", ""] {
            assert!(matches!(
                ExecutorIdentifier::parse(value),
                Err(NxCompatError::InvalidExecutorFormat(_))
            ));
        }
    }

    #[test]
    fn parses_implementation_exports() {
        assert_eq!(parse_implementation("./src/impl"), ("./src/impl", "default"));
        assert_eq!(parse_implementation("./src/impl#"), ("./src/impl", "default"));
        assert_eq!(
            parse_implementation("./src/impl#buildExecutor"),
            ("./src/impl", "buildExecutor")
        );
    }

    #[test]
    fn orders_candidates() {
        let candidates = implementation_candidates(Path::new("/pkg"), "./src/build/impl");

        assert_eq!(
            candidates,
            [
                "/pkg/src/build/impl",
                "/pkg/src/build/impl.js",
                "/pkg/src/build/impl.mjs",
                "/pkg/src/build/impl.cjs",
                "/pkg/lib/build/impl",
                "/pkg/lib/build/impl.js",
                "/pkg/lib/build/impl.mjs",
                "/pkg/lib/build/impl.cjs",
                "/pkg/build/build/impl",
                "/pkg/build/build/impl.js",
                "/pkg/build/build/impl.mjs",
                "/pkg/build/build/impl.cjs",
            ]
            .into_iter()
            .map(PathBuf::from)
            .collect::<Vec<_>>()
        );
    }
}
