//! Asset browser core
//!
//! This crate contains:
//! - Path metadata records and the store that indexes them
//! - The directory hierarchy mirror of the project's asset directory
//! - Text/type filters and the filtered-view cache
//! - The create/rename/delete operation state machine
//! - The browser controller driven by the rendering layer
//! - Configuration, keybindings and the injected engine services

pub mod metadata;
pub mod error;
pub mod store;
pub mod mirror;
pub mod filter;
pub mod operations;
pub mod asset_manager;
pub mod thumbnails;
pub mod tree_state;
pub mod services;
pub mod config;
pub mod command;
pub mod browser;

#[cfg(test)]
mod test_support;

pub use metadata::{
    display_name, AssetHandle, AssetMetadata, AssetTypeId, DirectoryMetadata, PathKind, PathMetadata, TreeNodeId,
};
pub use error::{AssetError, BrowserError, Notification, NotificationLevel};
pub use store::PathMetadataStore;
pub use mirror::{DirectoryTree, TreeRow};
pub use filter::{matches_filters, FilterCache, TextFilter, TypeFilter, TypeFilterEntry};
pub use operations::{
    available_new_path, NewPathKind, OperationContext, OperationOutcome, OperationState, PathOperations,
    PendingCreation, RenameEditor,
};
pub use asset_manager::{default_asset_types, AssetHeader, AssetManager, AssetTypeInfo, FileAssetManager};
pub use thumbnails::{IconThumbnailProvider, TextureId, ThumbnailKind, ThumbnailProvider};
pub use tree_state::{MemoryTreeState, TreeStateStore};
pub use services::BrowserServices;
pub use config::{BrowserConfig, ProjectConfig, ViewConfig, ViewMode};
pub use command::{BrowserCommand, CommandId, KeyChord, Keymap};
pub use browser::{formatted_asset_type_name, AssetBrowser, Breadcrumb, DragPayload, NewAssetEntry, PathDetails};
