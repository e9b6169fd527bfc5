//! Per-path metadata records
//!
//! A record is either a directory or an asset. Kind-specific fields are only
//! reachable through [`PathMetadata::as_directory`] / [`PathMetadata::as_asset`],
//! which return `None` for the other variant.

use asset_fs::LogicalPath;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::asset_manager::{AssetHeader, AssetTypeInfo};
use crate::thumbnails::TextureId;

/// Asset type identifier, as registered with the asset manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetTypeId(pub u32);

/// Unique handle stored in every asset file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetHandle(pub u64);

impl AssetHandle {
    /// Fresh random non-zero handle; kept within 63 bits so TOML can store it
    pub fn generate() -> Self {
        let (hi, lo) = uuid::Uuid::new_v4().as_u64_pair();
        match (hi ^ lo) & i64::MAX as u64 {
            0 => Self(1),
            v => Self(v),
        }
    }
}

/// Key into the UI framework's persisted tree-node state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeNodeId(pub u64);

impl TreeNodeId {
    pub fn for_path(path: &LogicalPath) -> Self {
        Self(path.node_id())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryMetadata {
    /// Whether the node is open in the directory tree
    pub is_tree_expanded: bool,
    pub(crate) has_any_sub_directory: bool,
    pub(crate) tree_node_id: TreeNodeId,
}

impl DirectoryMetadata {
    pub fn has_any_sub_directory(&self) -> bool {
        self.has_any_sub_directory
    }

    pub fn tree_node_id(&self) -> TreeNodeId {
        self.tree_node_id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetMetadata {
    pub type_id: AssetTypeId,
    pub handle: AssetHandle,
    /// Original file an imported asset was created from
    pub source_path: Option<PathBuf>,
    /// A resource file lives next to the asset file
    pub has_resource: bool,
    pub importable: bool,
}

impl AssetMetadata {
    pub fn from_header(header: &AssetHeader, type_info: Option<&AssetTypeInfo>) -> Self {
        Self {
            type_id: header.asset_type,
            handle: header.asset_handle,
            source_path: header.source_path.clone(),
            has_resource: type_info.map(|t| t.has_resource).unwrap_or(false),
            importable: type_info.map(|t| t.importable()).unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathKind {
    Directory(DirectoryMetadata),
    Asset(AssetMetadata),
}

/// Metadata record for one live path
#[derive(Debug, Clone, PartialEq)]
pub struct PathMetadata {
    path: LogicalPath,
    name: String,
    kind: PathKind,
    /// Non-owning handle, the texture itself belongs to the thumbnail provider
    pub thumbnail: Option<TextureId>,
}

impl PathMetadata {
    pub fn directory(path: LogicalPath) -> Self {
        let tree_node_id = TreeNodeId::for_path(&path);
        Self {
            name: display_name(&path, false).to_string(),
            path,
            kind: PathKind::Directory(DirectoryMetadata {
                is_tree_expanded: false,
                has_any_sub_directory: false,
                tree_node_id,
            }),
            thumbnail: None,
        }
    }

    pub fn asset(path: LogicalPath, asset: AssetMetadata) -> Self {
        Self {
            name: display_name(&path, true).to_string(),
            path,
            kind: PathKind::Asset(asset),
            thumbnail: None,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: Option<TextureId>) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    pub fn path(&self) -> &LogicalPath {
        &self.path
    }

    /// Display name: folder name, or asset file name without the engine extension
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &PathKind {
        &self.kind
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, PathKind::Directory(_))
    }

    pub fn is_asset(&self) -> bool {
        matches!(self.kind, PathKind::Asset(_))
    }

    pub fn as_directory(&self) -> Option<&DirectoryMetadata> {
        match &self.kind {
            PathKind::Directory(dir) => Some(dir),
            PathKind::Asset(_) => None,
        }
    }

    pub fn as_directory_mut(&mut self) -> Option<&mut DirectoryMetadata> {
        match &mut self.kind {
            PathKind::Directory(dir) => Some(dir),
            PathKind::Asset(_) => None,
        }
    }

    pub fn as_asset(&self) -> Option<&AssetMetadata> {
        match &self.kind {
            PathKind::Asset(asset) => Some(asset),
            PathKind::Directory(_) => None,
        }
    }

    pub fn as_asset_mut(&mut self) -> Option<&mut AssetMetadata> {
        match &mut self.kind {
            PathKind::Asset(asset) => Some(asset),
            PathKind::Directory(_) => None,
        }
    }

    pub fn asset_type_id(&self) -> Option<AssetTypeId> {
        self.as_asset().map(|a| a.type_id)
    }

    /// Logical path of the resource file kept next to a resource asset
    pub fn resource_path(&self) -> Option<LogicalPath> {
        let asset = self.as_asset()?;
        if !asset.has_resource {
            return None;
        }
        Some(self.path.parent()?.join(&self.name))
    }

    /// Same record under a new key; the tree node id follows the path
    pub(crate) fn rekeyed(&self, new_path: LogicalPath) -> Self {
        let mut record = self.clone();
        record.name = display_name(&new_path, self.is_asset()).to_string();
        if let PathKind::Directory(dir) = &mut record.kind {
            dir.tree_node_id = TreeNodeId::for_path(&new_path);
        }
        record.path = new_path;
        record
    }
}

/// Name shown for a path and seeded into the rename editor
pub fn display_name(path: &LogicalPath, is_asset: bool) -> &str {
    if is_asset {
        path.stem()
    } else {
        path.file_name()
    }
}
