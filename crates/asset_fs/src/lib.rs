//! Asset browser file system abstraction layer
//!
//! Provides:
//! - LogicalPath: forward-slash asset paths rooted at the project prefix
//! - AssetRoot: mapping between logical paths and the on-disk asset directory
//! - FileSystem: the file-system primitives the browser mutates through
//! - File name validation and sanitization

mod logical_path;
mod asset_root;
mod file_system;
mod sanitize;

pub use logical_path::{LogicalPath, Ancestors};
pub use asset_root::AssetRoot;
pub use file_system::{FileSystem, DefaultFileSystem, DirEntry};
pub use sanitize::{sanitize_filename, validate_file_name, SanitizeMode};

use std::path::PathBuf;
use thiserror::Error;

/// File system errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, FsError>;
