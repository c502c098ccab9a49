use crate::errors::NxCompatError;
use crate::fs::FileSystem;
use rustc_hash::FxHashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::trace;

/// Join a relative module path onto a directory, normalizing `.` and `..`
/// segments the same way Node.js does when resolving.
pub fn join_relative(base: &Path, relative: &str) -> PathBuf {
    let mut path = base.to_path_buf();

    for component in Path::new(relative).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                path.pop();
            }
            Component::Normal(part) => {
                path.push(part);
            }
            Component::RootDir | Component::Prefix(_) => {
                path = PathBuf::from(component.as_os_str());
            }
        }
    }

    path
}

/// Resolves package specifiers like `@scope/pkg/package.json` by walking up
/// `node_modules` directories from a starting directory. Results are cached
/// for the lifetime of the resolver.
#[derive(Debug)]
pub struct PackageResolver {
    cache: Mutex<FxHashMap<(PathBuf, String), PathBuf>>,
    fs: Arc<dyn FileSystem>,
}

impl PackageResolver {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            cache: Mutex::new(FxHashMap::default()),
            fs,
        }
    }

    /// Locate a file within a package, relative to `from`.
    pub fn resolve(&self, specifier: &str, from: &Path) -> Result<PathBuf, NxCompatError> {
        let key = (from.to_path_buf(), specifier.to_owned());

        if let Some(path) = self
            .cache
            .lock()
            .unwrap_or_else(|error| error.into_inner())
            .get(&key)
        {
            return Ok(path.clone());
        }

        for dir in from.ancestors() {
            let candidate = join_relative(&dir.join("node_modules"), specifier);

            trace!(candidate = ?candidate, "Probing for package file");

            if self.fs.is_file(&candidate) {
                self.cache
                    .lock()
                    .unwrap_or_else(|error| error.into_inner())
                    .insert(key, candidate.clone());

                return Ok(candidate);
            }
        }

        Err(NxCompatError::UnresolvedPackage {
            specifier: specifier.to_owned(),
            from: from.to_path_buf(),
        })
    }

    /// Return the root directory of a package, by locating its `package.json`.
    pub fn resolve_package_root(
        &self,
        package_name: &str,
        from: &Path,
    ) -> Result<PathBuf, NxCompatError> {
        let manifest = self.resolve(&format!("{package_name}/package.json"), from)?;

        Ok(manifest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(manifest))
    }
}
