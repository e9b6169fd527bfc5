//! Shared fixtures for the crate's tests

use asset_fs::{AssetRoot, DefaultFileSystem, DirEntry, FileSystem, FsError, LogicalPath};
use parking_lot::Mutex;
use std::fs;
use std::io;
use std::path::Path;
use tempfile::TempDir;

use crate::metadata::{AssetHandle, AssetMetadata, AssetTypeId, PathMetadata};

pub const SCENE: u32 = 1;
pub const TEXTURE: u32 = 3;
pub const SOUND: u32 = 5;

pub fn asset_record(path: &str, type_id: u32, handle: u64) -> PathMetadata {
    PathMetadata::asset(
        LogicalPath::new(path),
        AssetMetadata {
            type_id: AssetTypeId(type_id),
            handle: AssetHandle(handle),
            source_path: None,
            has_resource: false,
            importable: false,
        },
    )
}

pub fn write_asset(path: &Path, type_id: u32, handle: u64) {
    fs::write(path, format!("asset_type = {}\nasset_handle = {}\n", type_id, handle)).unwrap();
}

/// `/Assets` with `Sounds/`, `Textures/tree.zasset` and `main.zasset`
pub fn sample_project() -> (TempDir, AssetRoot) {
    let temp = TempDir::new().unwrap();
    let assets = temp.path().join("Assets");
    fs::create_dir_all(assets.join("Sounds")).unwrap();
    fs::create_dir_all(assets.join("Textures")).unwrap();
    write_asset(&assets.join("Textures/tree.zasset"), TEXTURE, 100);
    write_asset(&assets.join("main.zasset"), SCENE, 101);

    let root = AssetRoot::new(LogicalPath::new("/Assets"), assets);
    (temp, root)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Create,
    Rename,
    Delete,
}

/// Real file system that can be told to fail one kind of mutation
#[derive(Default)]
pub struct FailingFileSystem {
    inner: DefaultFileSystem,
    failures: Mutex<Vec<Failure>>,
}

impl FailingFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, failure: Failure) {
        self.failures.lock().push(failure);
    }

    fn check(&self, failure: Failure) -> asset_fs::Result<()> {
        if self.failures.lock().contains(&failure) {
            return Err(FsError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "injected failure")));
        }
        Ok(())
    }
}

impl FileSystem for FailingFileSystem {
    fn read_dir(&self, path: &Path) -> asset_fs::Result<Vec<DirEntry>> {
        self.inner.read_dir(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn create_dir(&self, path: &Path) -> asset_fs::Result<()> {
        self.check(Failure::Create)?;
        self.inner.create_dir(path)
    }

    fn delete_path(&self, path: &Path) -> asset_fs::Result<()> {
        self.check(Failure::Delete)?;
        self.inner.delete_path(path)
    }

    fn rename_path(&self, from: &Path, to: &Path) -> asset_fs::Result<()> {
        self.check(Failure::Rename)?;
        self.inner.rename_path(from, to)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> asset_fs::Result<()> {
        self.inner.copy_file(from, to)
    }

    fn read_to_string(&self, path: &Path) -> asset_fs::Result<String> {
        self.inner.read_to_string(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> asset_fs::Result<()> {
        self.check(Failure::Create)?;
        self.inner.write_file(path, contents)
    }

    fn show_in_file_browser(&self, path: &Path) -> asset_fs::Result<()> {
        tracing::debug!("show_in_file_browser suppressed in tests: {}", path.display());
        Ok(())
    }
}
