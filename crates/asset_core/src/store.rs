//! PathMetadata store
//!
//! Owns exactly one metadata record per live path. Lookups never create
//! records; only [`PathMetadataStore::insert`] does.

use asset_fs::LogicalPath;
use std::collections::{BTreeSet, HashMap};

use crate::error::BrowserError;
use crate::metadata::{AssetHandle, AssetMetadata, AssetTypeId, DirectoryMetadata, PathMetadata};

#[derive(Debug, Default)]
pub struct PathMetadataStore {
    records: HashMap<LogicalPath, PathMetadata>,
    /// Asset paths grouped by type
    assets_by_type: HashMap<AssetTypeId, BTreeSet<LogicalPath>>,
}

impl PathMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, path: &LogicalPath) -> bool {
        self.records.contains_key(path)
    }

    pub fn get(&self, path: &LogicalPath) -> Option<&PathMetadata> {
        self.records.get(path)
    }

    pub fn get_mut(&mut self, path: &LogicalPath) -> Option<&mut PathMetadata> {
        self.records.get_mut(path)
    }

    /// Directory view of a record; `None` when absent or an asset
    pub fn directory(&self, path: &LogicalPath) -> Option<&DirectoryMetadata> {
        self.get(path).and_then(PathMetadata::as_directory)
    }

    pub fn directory_mut(&mut self, path: &LogicalPath) -> Option<&mut DirectoryMetadata> {
        self.get_mut(path).and_then(PathMetadata::as_directory_mut)
    }

    /// Asset view of a record; `None` when absent or a directory
    pub fn asset(&self, path: &LogicalPath) -> Option<&AssetMetadata> {
        self.get(path).and_then(PathMetadata::as_asset)
    }

    /// Add a record; the path must not be registered yet
    pub fn insert(&mut self, record: PathMetadata) -> Result<(), BrowserError> {
        if self.records.contains_key(record.path()) {
            return Err(BrowserError::NameConflict(record.path().clone()));
        }

        if let Some(type_id) = record.asset_type_id() {
            self.assets_by_type
                .entry(type_id)
                .or_default()
                .insert(record.path().clone());
        }
        self.records.insert(record.path().clone(), record);
        Ok(())
    }

    pub fn remove(&mut self, path: &LogicalPath) -> Option<PathMetadata> {
        let record = self.records.remove(path)?;

        if let Some(type_id) = record.asset_type_id() {
            if let Some(paths) = self.assets_by_type.get_mut(&type_id) {
                paths.remove(path);
                if paths.is_empty() {
                    self.assets_by_type.remove(&type_id);
                }
            }
        }
        Some(record)
    }

    /// Asset paths of one type, in path order
    pub fn assets_of_type(&self, type_id: AssetTypeId) -> impl Iterator<Item = &LogicalPath> {
        self.assets_by_type.get(&type_id).into_iter().flatten()
    }

    pub fn find_by_handle(&self, handle: AssetHandle) -> Option<&PathMetadata> {
        self.records
            .values()
            .find(|r| r.as_asset().map(|a| a.handle == handle).unwrap_or(false))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathMetadata> {
        self.records.values()
    }
}
