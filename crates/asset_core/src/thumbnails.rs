//! Thumbnail collaborator
//!
//! Textures are owned by the provider; the browser only keeps [`TextureId`]s.

use asset_fs::LogicalPath;
use xxhash_rust::xxh3::xxh3_64;

use crate::metadata::AssetTypeId;

/// Non-owning handle to a texture held by the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// What a thumbnail is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailKind {
    Directory,
    Asset(AssetTypeId),
}

pub trait ThumbnailProvider: Send + Sync {
    /// Thumbnail for a path, `None` to fall back to the type icon
    fn thumbnail(&self, path: &LogicalPath, kind: ThumbnailKind) -> Option<TextureId>;

    /// Icon shown for an asset type in menus and as a fallback
    fn type_icon(&self, kind: ThumbnailKind) -> TextureId;
}

/// Provider that hands out one fixed icon per directory / asset type
#[derive(Debug, Default, Clone, Copy)]
pub struct IconThumbnailProvider;

impl ThumbnailProvider for IconThumbnailProvider {
    fn thumbnail(&self, _path: &LogicalPath, kind: ThumbnailKind) -> Option<TextureId> {
        Some(self.type_icon(kind))
    }

    fn type_icon(&self, kind: ThumbnailKind) -> TextureId {
        let key = match kind {
            ThumbnailKind::Directory => "icon:directory".to_string(),
            ThumbnailKind::Asset(type_id) => format!("icon:asset:{}", type_id.0),
        };
        TextureId(xxh3_64(key.as_bytes()))
    }
}
