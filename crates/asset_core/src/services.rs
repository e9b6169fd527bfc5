//! Collaborators injected into the browser

use asset_fs::{DefaultFileSystem, FileSystem};
use std::sync::Arc;

use crate::asset_manager::{AssetManager, FileAssetManager};
use crate::thumbnails::{IconThumbnailProvider, ThumbnailProvider};
use crate::tree_state::{MemoryTreeState, TreeStateStore};

pub struct BrowserServices {
    pub fs: Arc<dyn FileSystem>,
    pub assets: Arc<dyn AssetManager>,
    pub thumbnails: Arc<dyn ThumbnailProvider>,
    pub tree_state: Box<dyn TreeStateStore>,
}

impl BrowserServices {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        assets: Arc<dyn AssetManager>,
        thumbnails: Arc<dyn ThumbnailProvider>,
        tree_state: Box<dyn TreeStateStore>,
    ) -> Self {
        Self {
            fs,
            assets,
            thumbnails,
            tree_state,
        }
    }

    /// Default collaborators on top of the given file system
    pub fn with_file_system(fs: Arc<dyn FileSystem>) -> Self {
        let assets = Arc::new(FileAssetManager::new(fs.clone()));
        Self::new(
            fs,
            assets,
            Arc::new(IconThumbnailProvider),
            Box::new(MemoryTreeState::new()),
        )
    }
}

impl Default for BrowserServices {
    fn default() -> Self {
        Self::with_file_system(Arc::new(DefaultFileSystem::new()))
    }
}
