//! Asset manager collaborator
//!
//! The browser never parses asset files itself. Reading headers, creating,
//! importing, renaming and deleting assets all go through [`AssetManager`].
//! [`FileAssetManager`] stores a small TOML header per asset file and keeps
//! resource files (textures, meshes, sounds) next to it: `tree.png.zasset`
//! owns `tree.png`.

use asset_fs::{FileSystem, FsError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::AssetError;
use crate::metadata::{AssetHandle, AssetTypeId};

/// Header stored at the start of every asset file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetHeader {
    pub asset_type: AssetTypeId,
    pub asset_handle: AssetHandle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
}

/// Registered asset type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTypeInfo {
    pub id: AssetTypeId,
    /// Human-readable name, e.g. "Physics Material"
    pub name: String,
    /// Lowercase source extensions this type imports from
    pub import_extensions: Vec<String>,
    /// Whether a resource file accompanies the asset file
    pub has_resource: bool,
}

impl AssetTypeInfo {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id: AssetTypeId(id),
            name: name.to_string(),
            import_extensions: Vec::new(),
            has_resource: false,
        }
    }

    /// Resource type imported from the given source extensions
    pub fn resource(id: u32, name: &str, extensions: &[&str]) -> Self {
        Self {
            id: AssetTypeId(id),
            name: name.to_string(),
            import_extensions: extensions.iter().map(|e| e.to_string()).collect(),
            has_resource: true,
        }
    }

    pub fn importable(&self) -> bool {
        !self.import_extensions.is_empty()
    }
}

/// Types known to [`FileAssetManager::new`]
pub fn default_asset_types() -> Vec<AssetTypeInfo> {
    vec![
        AssetTypeInfo::new(1, "Scene"),
        AssetTypeInfo::new(2, "Material"),
        AssetTypeInfo::resource(3, "Texture", &["png", "jpg", "jpeg", "tga", "bmp"]),
        AssetTypeInfo::resource(4, "Mesh", &["obj", "gltf", "glb", "fbx"]),
        AssetTypeInfo::resource(5, "Sound", &["wav", "ogg", "mp3", "flac"]),
        AssetTypeInfo::resource(6, "Shader", &["glsl", "wgsl", "hlsl"]),
        AssetTypeInfo::new(7, "Physics Material"),
    ]
}

/// Asset operations the browser delegates
pub trait AssetManager: Send + Sync {
    fn asset_types(&self) -> &[AssetTypeInfo];

    fn type_info(&self, type_id: AssetTypeId) -> Option<&AssetTypeInfo> {
        self.asset_types().iter().find(|t| t.id == type_id)
    }

    fn type_name(&self, type_id: AssetTypeId) -> Option<&str> {
        self.type_info(type_id).map(|t| t.name.as_str())
    }

    /// Type that imports files with this extension (case-insensitive)
    fn type_for_extension(&self, extension: &str) -> Option<AssetTypeId> {
        let extension = extension.trim_start_matches('.').to_lowercase();
        self.asset_types()
            .iter()
            .find(|t| t.import_extensions.iter().any(|e| *e == extension))
            .map(|t| t.id)
    }

    fn read_header(&self, path: &Path) -> Result<AssetHeader, AssetError>;

    /// Write a fresh asset file of the given type; never overwrites
    fn create_asset_file(&self, type_id: AssetTypeId, path: &Path) -> Result<AssetHeader, AssetError>;

    /// Copy `source` next to `path` as its resource and write the asset file
    fn import_asset(&self, type_id: AssetTypeId, source: &Path, path: &Path) -> Result<AssetHeader, AssetError>;

    /// Delete the asset file together with its resource
    fn delete_asset(&self, path: &Path) -> Result<(), AssetError>;

    /// Rename the asset file together with its resource
    fn rename_asset(&self, from: &Path, to: &Path) -> Result<(), AssetError>;

    fn open_asset_editor(&self, path: &Path) -> Result<(), AssetError>;

    fn save_asset(&self, path: &Path) -> Result<(), AssetError>;
}

/// TOML-header asset manager backed by a [`FileSystem`]
pub struct FileAssetManager {
    fs: Arc<dyn FileSystem>,
    types: Vec<AssetTypeInfo>,
    opened: Mutex<Vec<PathBuf>>,
}

impl FileAssetManager {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self::with_types(fs, default_asset_types())
    }

    pub fn with_types(fs: Arc<dyn FileSystem>, types: Vec<AssetTypeInfo>) -> Self {
        Self {
            fs,
            types,
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Asset files whose editor was opened, oldest first
    pub fn opened_assets(&self) -> Vec<PathBuf> {
        self.opened.lock().clone()
    }

    /// `tree.png.zasset` -> `tree.png`
    fn resource_path(path: &Path) -> PathBuf {
        path.with_extension("")
    }

    fn has_resource(&self, type_id: AssetTypeId) -> bool {
        self.type_info(type_id).map(|t| t.has_resource).unwrap_or(false)
    }

    fn write_header(&self, path: &Path, header: &AssetHeader) -> Result<(), AssetError> {
        let content = toml::to_string_pretty(header).map_err(|e| AssetError::Serialize(e.to_string()))?;
        self.fs.write_file(path, content.as_bytes())?;
        Ok(())
    }

    fn ensure_known(&self, type_id: AssetTypeId) -> Result<(), AssetError> {
        match self.type_info(type_id) {
            Some(_) => Ok(()),
            None => Err(AssetError::UnknownType(type_id)),
        }
    }
}

impl AssetManager for FileAssetManager {
    fn asset_types(&self) -> &[AssetTypeInfo] {
        &self.types
    }

    fn read_header(&self, path: &Path) -> Result<AssetHeader, AssetError> {
        let content = self.fs.read_to_string(path)?;
        let header: AssetHeader = toml::from_str(&content).map_err(|e| AssetError::InvalidHeader {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })?;
        self.ensure_known(header.asset_type)?;
        Ok(header)
    }

    fn create_asset_file(&self, type_id: AssetTypeId, path: &Path) -> Result<AssetHeader, AssetError> {
        self.ensure_known(type_id)?;
        if self.fs.exists(path) {
            return Err(FsError::AlreadyExists(path.to_path_buf()).into());
        }

        let header = AssetHeader {
            asset_type: type_id,
            asset_handle: AssetHandle::generate(),
            source_path: None,
        };
        self.write_header(path, &header)?;
        tracing::info!("Created asset: {}", path.display());
        Ok(header)
    }

    fn import_asset(&self, type_id: AssetTypeId, source: &Path, path: &Path) -> Result<AssetHeader, AssetError> {
        self.ensure_known(type_id)?;
        if self.fs.exists(path) {
            return Err(FsError::AlreadyExists(path.to_path_buf()).into());
        }

        let resource = Self::resource_path(path);
        if self.has_resource(type_id) {
            self.fs.copy_file(source, &resource)?;
        }

        let header = AssetHeader {
            asset_type: type_id,
            asset_handle: AssetHandle::generate(),
            source_path: Some(source.to_path_buf()),
        };
        if let Err(e) = self.write_header(path, &header) {
            if self.has_resource(type_id) {
                let _ = self.fs.delete_path(&resource);
            }
            return Err(e);
        }

        tracing::info!("Imported {} as {}", source.display(), path.display());
        Ok(header)
    }

    fn delete_asset(&self, path: &Path) -> Result<(), AssetError> {
        let has_resource = match self.read_header(path) {
            Ok(header) => self.has_resource(header.asset_type),
            Err(e) => {
                tracing::warn!("Deleting asset with unreadable header {}: {}", path.display(), e);
                false
            }
        };

        self.fs.delete_path(path)?;

        let resource = Self::resource_path(path);
        if has_resource && self.fs.exists(&resource) {
            self.fs.delete_path(&resource)?;
        }
        Ok(())
    }

    fn rename_asset(&self, from: &Path, to: &Path) -> Result<(), AssetError> {
        let has_resource = self
            .read_header(from)
            .map(|h| self.has_resource(h.asset_type))
            .unwrap_or(false);

        self.fs.rename_path(from, to)?;

        let old_resource = Self::resource_path(from);
        if has_resource && self.fs.exists(&old_resource) {
            if let Err(e) = self.fs.rename_path(&old_resource, &Self::resource_path(to)) {
                // Keep asset and resource together
                if let Err(undo) = self.fs.rename_path(to, from) {
                    tracing::error!("Failed to restore {} after resource rename error: {}", from.display(), undo);
                }
                return Err(e.into());
            }
        }
        Ok(())
    }

    fn open_asset_editor(&self, path: &Path) -> Result<(), AssetError> {
        let header = self.read_header(path)?;
        tracing::info!(
            "Opening editor for {} ({})",
            path.display(),
            self.type_name(header.asset_type).unwrap_or("unknown")
        );
        self.opened.lock().push(path.to_path_buf());
        Ok(())
    }

    fn save_asset(&self, path: &Path) -> Result<(), AssetError> {
        let header = self.read_header(path)?;
        self.write_header(path, &header)?;
        tracing::debug!("Saved asset: {}", path.display());
        Ok(())
    }
}
