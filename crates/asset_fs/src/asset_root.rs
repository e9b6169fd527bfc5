//! Mapping between logical paths and the on-disk project asset directory

use crate::LogicalPath;
use std::path::{Component, Path, PathBuf};

/// Binds a logical prefix such as `/Assets` to a file-system directory
#[derive(Debug, Clone)]
pub struct AssetRoot {
    logical_root: LogicalPath,
    fs_root: PathBuf,
}

impl AssetRoot {
    pub fn new<P: Into<PathBuf>>(logical_root: LogicalPath, fs_root: P) -> Self {
        Self {
            logical_root,
            fs_root: fs_root.into(),
        }
    }

    pub fn logical_root(&self) -> &LogicalPath {
        &self.logical_root
    }

    pub fn fs_root(&self) -> &Path {
        &self.fs_root
    }

    /// Whether `path` lives under the logical root
    pub fn contains(&self, path: &LogicalPath) -> bool {
        path.starts_with(&self.logical_root)
    }

    /// Resolve a logical path to its location on disk
    pub fn to_fs_path(&self, path: &LogicalPath) -> Option<PathBuf> {
        if !self.contains(path) {
            return None;
        }

        let mut fs_path = self.fs_root.clone();
        for component in path.components().skip(self.logical_root.depth()) {
            fs_path.push(component);
        }
        Some(fs_path)
    }

    /// Map an on-disk path under the asset directory back to its logical path
    pub fn to_logical(&self, path: &Path) -> Option<LogicalPath> {
        let relative = path.strip_prefix(&self.fs_root).ok()?;

        let mut logical = self.logical_root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(name) => {
                    logical = logical.join(name.to_string_lossy());
                }
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(logical)
    }
}
