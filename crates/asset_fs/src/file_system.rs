//! File-system primitives the asset browser mutates through
//!
//! Everything is routed through the [`FileSystem`] trait so the browser core
//! can be driven against a fake in tests.

use crate::{FsError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory entry returned by [`FileSystem::read_dir`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
    /// Lowercase extension without the dot, empty for none
    pub extension: String,
}

impl DirEntry {
    /// Create a new entry from an on-disk path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            is_dir: metadata.is_dir(),
            extension,
        })
    }
}

/// File-system operations trait
pub trait FileSystem: Send + Sync {
    /// List the direct entries of a directory
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    fn exists(&self, path: &Path) -> bool;

    /// Create a new directory (parents included)
    fn create_dir(&self, path: &Path) -> Result<()>;

    /// Delete a file, or a directory recursively
    fn delete_path(&self, path: &Path) -> Result<()>;

    /// Rename a file or directory; never overwrites
    fn rename_path(&self, from: &Path, to: &Path) -> Result<()>;

    /// Copy a single file; never overwrites
    fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Reveal a path in the platform file manager
    fn show_in_file_browser(&self, path: &Path) -> Result<()>;
}

/// `std::fs` backed implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFileSystem;

impl DefaultFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for DefaultFileSystem {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        if !path.exists() {
            return Err(FsError::NotFound(path.to_path_buf()));
        }

        if !path.is_dir() {
            return Err(FsError::InvalidPath(format!("Not a directory: {}", path.display())));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            match DirEntry::from_path(entry.path()) {
                Ok(e) => entries.push(e),
                Err(e) => {
                    // Skip entries we can't read (broken links, races)
                    tracing::debug!("Skipping unreadable entry {}: {}", entry.path().display(), e);
                }
            }
        }

        Ok(entries)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        if path.exists() {
            return Err(FsError::AlreadyExists(path.to_path_buf()));
        }

        fs::create_dir_all(path)?;
        tracing::info!("Created directory: {}", path.display());

        Ok(())
    }

    fn delete_path(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(FsError::NotFound(path.to_path_buf()));
        }

        if path.is_dir() {
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_file(path)?;
        }
        tracing::info!("Deleted: {}", path.display());

        Ok(())
    }

    fn rename_path(&self, from: &Path, to: &Path) -> Result<()> {
        if !from.exists() {
            return Err(FsError::NotFound(from.to_path_buf()));
        }

        if to.exists() && !is_case_only_rename(from, to) {
            return Err(FsError::AlreadyExists(to.to_path_buf()));
        }

        fs::rename(from, to)?;
        tracing::info!("Renamed: {} -> {}", from.display(), to.display());

        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        if !from.is_file() {
            return Err(FsError::NotFound(from.to_path_buf()));
        }

        if to.exists() {
            return Err(FsError::AlreadyExists(to.to_path_buf()));
        }

        fs::copy(from, to)?;
        tracing::info!("Copied: {} -> {}", from.display(), to.display());

        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(FsError::NotFound(path.to_path_buf()));
        }
        Ok(fs::read_to_string(path)?)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents)?;
        Ok(())
    }

    #[cfg(target_os = "windows")]
    fn show_in_file_browser(&self, path: &Path) -> Result<()> {
        std::process::Command::new("explorer")
            .arg("/select,")
            .arg(path.display().to_string())
            .spawn()
            .map_err(|e| FsError::Unsupported(format!("Failed to open Explorer: {}", e)))?;

        tracing::info!("Opened in Explorer: {}", path.display());
        Ok(())
    }

    #[cfg(target_os = "macos")]
    fn show_in_file_browser(&self, path: &Path) -> Result<()> {
        std::process::Command::new("open")
            .arg("-R")
            .arg(path.display().to_string())
            .spawn()
            .map_err(|e| FsError::Unsupported(format!("Failed to open Finder: {}", e)))?;

        tracing::info!("Opened in Finder: {}", path.display());
        Ok(())
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    fn show_in_file_browser(&self, path: &Path) -> Result<()> {
        // No standard "select file" here, open the containing folder
        let folder = if path.is_dir() {
            path
        } else {
            path.parent().unwrap_or(path)
        };

        std::process::Command::new("xdg-open")
            .arg(folder.display().to_string())
            .spawn()
            .map_err(|e| FsError::Unsupported(format!("Failed to open file manager: {}", e)))?;

        tracing::info!("Opened in file manager: {}", folder.display());
        Ok(())
    }
}

/// `to` only differs from `from` in letter case and no separate entry
/// spelled exactly `to` exists, i.e. both name the same entry on a
/// case-insensitive file system
fn is_case_only_rename(from: &Path, to: &Path) -> bool {
    let (Some(from_name), Some(to_name)) = (from.file_name(), to.file_name()) else {
        return false;
    };
    if from.parent() != to.parent() || from_name == to_name {
        return false;
    }
    if from_name.to_string_lossy().to_lowercase() != to_name.to_string_lossy().to_lowercase() {
        return false;
    }

    match to.parent().map(fs::read_dir) {
        Some(Ok(entries)) => !entries.flatten().any(|entry| entry.file_name() == to_name),
        _ => false,
    }
}
