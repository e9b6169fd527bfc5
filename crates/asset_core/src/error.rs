//! Browser error types and user-facing notifications

use asset_fs::{FsError, LogicalPath};
use std::path::PathBuf;
use thiserror::Error;

use crate::metadata::AssetTypeId;

/// Errors raised by the asset manager collaborator
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("File system error: {0}")]
    Io(#[from] FsError),

    #[error("Invalid asset header in {path}: {reason}")]
    InvalidHeader { path: PathBuf, reason: String },

    #[error("Unknown asset type: {0:?}")]
    UnknownType(AssetTypeId),

    #[error("Unsupported import format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Main browser error type
#[derive(Error, Debug)]
pub enum BrowserError {
    // ===== Recoverable (warn the user, keep running) =====
    #[error("Path not found: {0}")]
    NotFound(LogicalPath),

    #[error("Path already exists: {0}")]
    NameConflict(LogicalPath),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("File system error: {0}")]
    Io(#[from] FsError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    // ===== Programming errors (mirror and store disagree) =====
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

impl BrowserError {
    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, BrowserError::InvariantViolation(_))
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            BrowserError::NameConflict(path) => {
                format!("Failed to rename {}. Path already exists.", path.file_name())
            }
            BrowserError::NotFound(path) => format!("{} no longer exists", path),
            BrowserError::InvalidName(reason) => format!("Invalid name: {}", reason),
            BrowserError::Io(FsError::AlreadyExists(path)) => {
                format!("{} already exists on disk", path.display())
            }
            _ => self.to_string(),
        }
    }

    /// Report a broken mirror/store invariant; fatal in debug builds
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!("Invariant violated: {}", message);
        if cfg!(debug_assertions) {
            panic!("Invariant violated: {}", message);
        }
        BrowserError::InvariantViolation(message)
    }
}

/// Coarse classification of a collaborator failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorKind {
    Conflict,
    Missing,
    Other,
}

impl BrowserError {
    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            BrowserError::NameConflict(_)
            | BrowserError::Io(FsError::AlreadyExists(_))
            | BrowserError::Asset(AssetError::Io(FsError::AlreadyExists(_))) => ErrorKind::Conflict,
            BrowserError::NotFound(_)
            | BrowserError::Io(FsError::NotFound(_))
            | BrowserError::Asset(AssetError::Io(FsError::NotFound(_))) => ErrorKind::Missing,
            _ => ErrorKind::Other,
        }
    }
}

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Message surfaced to the user by the rendering layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&BrowserError> for Notification {
    fn from(e: &BrowserError) -> Self {
        if e.is_recoverable() {
            Notification::warning(e.user_message())
        } else {
            Notification::error(e.user_message())
        }
    }
}
