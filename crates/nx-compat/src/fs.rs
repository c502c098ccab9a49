use crate::errors::NxCompatError;
use rustc_hash::FxHashMap;
use starbase_utils::fs;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Read-only view of the file system, so that package resolution and
/// implementation probing can be tested without touching disk.
pub trait FileSystem: Send + Sync + Debug {
    fn is_file(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> Result<String, NxCompatError>;
}

#[derive(Clone, Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String, NxCompatError> {
        Ok(fs::read_file(path)?)
    }
}

/// In-memory file system, keyed by absolute file path.
#[derive(Clone, Debug, Default)]
pub struct MockFileSystem {
    files: Arc<RwLock<FxHashMap<PathBuf, String>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap_or_else(|error| error.into_inner())
            .insert(path.as_ref().to_path_buf(), content.into());
    }
}

impl FileSystem for MockFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        self.files
            .read()
            .unwrap_or_else(|error| error.into_inner())
            .contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String, NxCompatError> {
        self.files
            .read()
            .unwrap_or_else(|error| error.into_inner())
            .get(path)
            .cloned()
            .ok_or_else(|| NxCompatError::Io {
                path: path.to_path_buf(),
                error: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}
