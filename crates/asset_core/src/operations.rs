//! Path operation state machine
//!
//! Create, rename and delete are requested in one frame and completed in a
//! later one (the rename editor is committed, the delete dialog confirmed).
//! Pending work is held in three markers:
//!
//! - `path_to_create`: a placeholder shown in the view while its name is typed
//! - `path_to_rename`: the path whose name is being edited
//! - `path_to_delete`: the path awaiting delete confirmation
//!
//! Creation always sets both the create and the rename marker; committing the
//! rename materializes the new path on disk. Every mutation goes disk first,
//! then mirror, and a failure leaves the mirror as it was.

use asset_fs::{validate_file_name, AssetRoot, LogicalPath};
use std::path::{Path, PathBuf};

use crate::error::{AssetError, BrowserError, ErrorKind};
use crate::metadata::{display_name, AssetMetadata, AssetTypeId, PathMetadata};
use crate::mirror::DirectoryTree;
use crate::services::BrowserServices;
use crate::thumbnails::ThumbnailKind;

/// What a pending creation will become
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewPathKind {
    Directory,
    Asset(AssetTypeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCreation {
    /// Placeholder path proposed for the new entry
    pub path: LogicalPath,
    pub kind: NewPathKind,
}

/// Inline name editor shown while a rename is pending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEditor {
    target: LogicalPath,
    original: String,
    text: String,
    focus_requested: bool,
}

impl RenameEditor {
    fn new(target: LogicalPath, original: String) -> Self {
        Self {
            target,
            text: original.clone(),
            original,
            focus_requested: true,
        }
    }

    pub fn target(&self) -> &LogicalPath {
        &self.target
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Restore the name the editor was opened with
    pub fn revert(&mut self) {
        self.text = self.original.clone();
    }

    /// True exactly once after the editor opens, so keyboard focus moves to it
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Idle,
    PendingCreate,
    PendingRename,
    PendingDelete,
}

/// Result of completing (or failing to complete) an operation
#[derive(Debug)]
pub enum OperationOutcome {
    Created(LogicalPath),
    Renamed {
        from: LogicalPath,
        to: LogicalPath,
        /// Every rekeyed path, `(from, to)` first
        moved: Vec<(LogicalPath, LogicalPath)>,
    },
    /// Rename committed with the current name
    Unchanged(LogicalPath),
    Deleted {
        path: LogicalPath,
        removed: Vec<LogicalPath>,
    },
    Cancelled,
    /// Nothing was pending
    Ignored,
    Rejected(BrowserError),
}

impl OperationOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, OperationOutcome::Rejected(_))
    }

    /// True when the mirror changed
    pub fn mutated(&self) -> bool {
        matches!(
            self,
            OperationOutcome::Created(_) | OperationOutcome::Renamed { .. } | OperationOutcome::Deleted { .. }
        )
    }
}

/// Everything a commit needs besides the markers
pub struct OperationContext<'a> {
    pub tree: &'a mut DirectoryTree,
    pub asset_root: &'a AssetRoot,
    pub services: &'a BrowserServices,
    /// Engine asset extension including the dot, e.g. `.zasset`
    pub asset_extension: &'a str,
}

impl OperationContext<'_> {
    fn fs_path(&self, path: &LogicalPath) -> Result<PathBuf, BrowserError> {
        self.asset_root
            .to_fs_path(path)
            .ok_or_else(|| BrowserError::NotFound(path.clone()))
    }
}

#[derive(Debug, Default)]
pub struct PathOperations {
    rename: Option<RenameEditor>,
    create: Option<PendingCreation>,
    delete: Option<LogicalPath>,
}

impl PathOperations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dominant state; a pending delete can coexist with the others
    pub fn state(&self) -> OperationState {
        if self.create.is_some() {
            OperationState::PendingCreate
        } else if self.rename.is_some() {
            OperationState::PendingRename
        } else if self.delete.is_some() {
            OperationState::PendingDelete
        } else {
            OperationState::Idle
        }
    }

    pub fn path_to_create(&self) -> Option<&PendingCreation> {
        self.create.as_ref()
    }

    pub fn path_to_rename(&self) -> Option<&LogicalPath> {
        self.rename.as_ref().map(RenameEditor::target)
    }

    pub fn path_to_delete(&self) -> Option<&LogicalPath> {
        self.delete.as_ref()
    }

    pub fn rename_editor(&self) -> Option<&RenameEditor> {
        self.rename.as_ref()
    }

    pub fn rename_editor_mut(&mut self) -> Option<&mut RenameEditor> {
        self.rename.as_mut()
    }

    /// Whether the view should draw an editor instead of a label for `path`
    pub fn is_renaming(&self, path: &LogicalPath) -> bool {
        self.path_to_rename() == Some(path)
    }

    /// Propose a new directory or asset under `directory` and open the
    /// rename editor on it. Ignored while a create or rename is pending.
    pub fn request_create(
        &mut self,
        tree: &DirectoryTree,
        directory: &LogicalPath,
        kind: NewPathKind,
        base_name: &str,
        asset_extension: &str,
    ) -> Option<LogicalPath> {
        if self.create.is_some() || self.rename.is_some() {
            tracing::debug!("Create request ignored, another edit is pending");
            return None;
        }
        if !tree.is_directory(directory) {
            tracing::warn!("Cannot create in {}: not a directory", directory);
            return None;
        }

        let is_asset = matches!(kind, NewPathKind::Asset(_));
        let extension = is_asset.then_some(asset_extension);
        let path = available_new_path(tree, directory, base_name, extension);

        self.rename = Some(RenameEditor::new(path.clone(), display_name(&path, is_asset).to_string()));
        self.create = Some(PendingCreation {
            path: path.clone(),
            kind,
        });
        tracing::debug!("Pending create: {}", path);
        Some(path)
    }

    /// Open the rename editor on `path`. `None` and unknown paths are ignored.
    pub fn request_rename(&mut self, tree: &DirectoryTree, path: Option<&LogicalPath>) -> bool {
        let Some(path) = path else {
            return false;
        };
        if self.rename.is_some() {
            tracing::debug!("Rename request for {} ignored, another edit is pending", path);
            return false;
        }
        if path == tree.root() {
            tracing::warn!("The asset root cannot be renamed");
            return false;
        }
        let Some(record) = tree.get(path) else {
            tracing::warn!("Rename requested for unknown path {}", path);
            return false;
        };

        self.rename = Some(RenameEditor::new(path.clone(), record.name().to_string()));
        true
    }

    /// Ask for confirmation to delete `path`. `None` and unknown paths are ignored.
    pub fn request_delete(&mut self, tree: &DirectoryTree, path: Option<&LogicalPath>) -> bool {
        let Some(path) = path else {
            return false;
        };
        if self.delete.is_some() {
            tracing::debug!("Delete request for {} ignored, another delete is pending", path);
            return false;
        }
        if path == tree.root() {
            tracing::warn!("The asset root cannot be deleted");
            return false;
        }
        if !tree.contains(path) {
            tracing::warn!("Delete requested for unknown path {}", path);
            return false;
        }

        self.delete = Some(path.clone());
        true
    }

    /// Drop the rename editor, and the pending creation with it
    pub fn cancel_rename(&mut self) -> OperationOutcome {
        let had_edit = self.rename.take().is_some();
        self.create = None;
        if had_edit {
            OperationOutcome::Cancelled
        } else {
            OperationOutcome::Ignored
        }
    }

    pub fn cancel_delete(&mut self) -> OperationOutcome {
        match self.delete.take() {
            Some(_) => OperationOutcome::Cancelled,
            None => OperationOutcome::Ignored,
        }
    }

    /// Commit the rename editor's text.
    ///
    /// With a pending creation this creates the directory or asset file under
    /// the typed name; a name conflict keeps the creation pending with the
    /// editor reverted. Otherwise the target is renamed on disk and in the
    /// mirror; on any failure the rename is dropped and nothing moves.
    pub fn commit_rename(&mut self, ctx: &mut OperationContext<'_>) -> OperationOutcome {
        let Some(editor) = self.rename.clone() else {
            return OperationOutcome::Ignored;
        };

        match self.create.clone() {
            Some(creation) => match commit_creation(ctx, &creation, editor.text()) {
                Ok(path) => {
                    self.rename = None;
                    self.create = None;
                    OperationOutcome::Created(path)
                }
                Err(e) => {
                    tracing::warn!("Failed to create {}: {}", creation.path, e);
                    if matches!(e.kind(), ErrorKind::Conflict) || matches!(e, BrowserError::InvalidName(_)) {
                        if let Some(editor) = self.rename.as_mut() {
                            editor.revert();
                        }
                    } else {
                        self.rename = None;
                        self.create = None;
                    }
                    OperationOutcome::Rejected(e)
                }
            },
            None => {
                self.rename = None;
                match commit_plain_rename(ctx, editor.target(), editor.text()) {
                    Ok(outcome) => {
                        if let OperationOutcome::Renamed { from, to, .. } = &outcome {
                            self.rebase_pending(from, to);
                        }
                        outcome
                    }
                    Err(e) => {
                        tracing::warn!("Failed to rename {}: {}", editor.target(), e);
                        OperationOutcome::Rejected(e)
                    }
                }
            }
        }
    }

    /// Point a pending delete at its new location after `from` was renamed to `to`
    pub fn rebase_pending(&mut self, from: &LogicalPath, to: &LogicalPath) {
        if let Some(rebased) = self.delete.as_ref().and_then(|d| d.rebase(from, to)) {
            tracing::debug!("Pending delete follows rename: {}", rebased);
            self.delete = Some(rebased);
        }
    }

    /// Delete the path awaiting confirmation, from disk then from the mirror
    pub fn confirm_delete(&mut self, ctx: &mut OperationContext<'_>) -> OperationOutcome {
        let Some(path) = self.delete.take() else {
            return OperationOutcome::Ignored;
        };

        match commit_delete(ctx, &path) {
            Ok(removed) => {
                // A pending rename inside the deleted subtree has nothing left to edit
                if self.path_to_rename().map(|r| r.starts_with(&path)).unwrap_or(false) {
                    self.rename = None;
                    self.create = None;
                }
                OperationOutcome::Deleted { path, removed }
            }
            Err(e) => {
                tracing::warn!("Failed to delete {}: {}", path, e);
                OperationOutcome::Rejected(e)
            }
        }
    }

    /// Copy an external file into `directory` as a new asset of the type
    /// registered for its extension
    pub fn import_asset(
        &self,
        ctx: &mut OperationContext<'_>,
        directory: &LogicalPath,
        source: &Path,
    ) -> OperationOutcome {
        match commit_import(ctx, directory, source) {
            Ok(path) => OperationOutcome::Created(path),
            Err(e) => {
                tracing::warn!("Failed to import {}: {}", source.display(), e);
                OperationOutcome::Rejected(e)
            }
        }
    }
}

/// First free path under `directory`: `base`, `base1`, `base2`...
/// with `extension` appended for assets
pub fn available_new_path(
    tree: &DirectoryTree,
    directory: &LogicalPath,
    base_name: &str,
    extension: Option<&str>,
) -> LogicalPath {
    let candidate = |suffix: Option<usize>| {
        let mut name = base_name.to_string();
        if let Some(n) = suffix {
            name.push_str(&n.to_string());
        }
        if let Some(ext) = extension {
            name.push_str(ext);
        }
        directory.join(name)
    };

    let mut path = candidate(None);
    let mut n = 0;
    while tree.sibling_named(directory, path.file_name()).is_some() {
        n += 1;
        path = candidate(Some(n));
    }
    path
}

fn validated_name(name: &str) -> Result<(), BrowserError> {
    validate_file_name(name).map_err(|e| BrowserError::InvalidName(e.to_string()))
}

/// File name on disk for a typed display name
fn file_name_for(name: &str, is_asset: bool, asset_extension: &str) -> String {
    if is_asset {
        format!("{}{}", name, asset_extension)
    } else {
        name.to_string()
    }
}

fn commit_creation(
    ctx: &mut OperationContext<'_>,
    creation: &PendingCreation,
    name: &str,
) -> Result<LogicalPath, BrowserError> {
    validated_name(name)?;

    let directory = creation
        .path
        .parent()
        .ok_or_else(|| BrowserError::NotFound(creation.path.clone()))?;
    if !ctx.tree.is_directory(&directory) {
        return Err(BrowserError::NotFound(directory));
    }

    let is_asset = matches!(creation.kind, NewPathKind::Asset(_));
    let path = directory.join(file_name_for(name, is_asset, ctx.asset_extension));
    if ctx.tree.sibling_named(&directory, path.file_name()).is_some() {
        return Err(BrowserError::NameConflict(path));
    }
    let fs_path = ctx.fs_path(&path)?;

    let record = match creation.kind {
        NewPathKind::Directory => {
            ctx.services.fs.create_dir(&fs_path)?;
            PathMetadata::directory(path.clone())
                .with_thumbnail(ctx.services.thumbnails.thumbnail(&path, ThumbnailKind::Directory))
        }
        NewPathKind::Asset(type_id) => {
            let header = ctx.services.assets.create_asset_file(type_id, &fs_path)?;
            let type_info = ctx.services.assets.type_info(type_id);
            PathMetadata::asset(path.clone(), AssetMetadata::from_header(&header, type_info))
                .with_thumbnail(ctx.services.thumbnails.thumbnail(&path, ThumbnailKind::Asset(type_id)))
        }
    };

    if let Err(e) = ctx.tree.insert(record) {
        undo_disk_creation(ctx, &fs_path, is_asset);
        return Err(e);
    }

    tracing::info!("Created {}", path);
    Ok(path)
}

fn undo_disk_creation(ctx: &OperationContext<'_>, fs_path: &Path, is_asset: bool) {
    let result = if is_asset {
        ctx.services.assets.delete_asset(fs_path).map_err(BrowserError::from)
    } else {
        ctx.services.fs.delete_path(fs_path).map_err(BrowserError::from)
    };
    if let Err(e) = result {
        tracing::error!("Failed to remove {} after mirror error: {}", fs_path.display(), e);
    }
}

fn commit_plain_rename(
    ctx: &mut OperationContext<'_>,
    target: &LogicalPath,
    name: &str,
) -> Result<OperationOutcome, BrowserError> {
    let is_asset = ctx
        .tree
        .get(target)
        .map(PathMetadata::is_asset)
        .ok_or_else(|| BrowserError::NotFound(target.clone()))?;
    validated_name(name)?;

    let directory = target
        .parent()
        .ok_or_else(|| BrowserError::NotFound(target.clone()))?;
    let new_path = directory.join(file_name_for(name, is_asset, ctx.asset_extension));
    if new_path == *target {
        return Ok(OperationOutcome::Unchanged(new_path));
    }
    // A case-only rename of the target itself is allowed
    if ctx.tree.sibling_named(&directory, new_path.file_name()).is_some_and(|p| p != target) {
        return Err(BrowserError::NameConflict(new_path));
    }

    let from_fs = ctx.fs_path(target)?;
    let to_fs = ctx.fs_path(&new_path)?;
    rename_on_disk(ctx, &from_fs, &to_fs, is_asset)?;

    match ctx.tree.rename(target, &new_path) {
        Ok(moved) => {
            tracing::info!("Renamed {} -> {}", target, new_path);
            Ok(OperationOutcome::Renamed {
                from: target.clone(),
                to: new_path,
                moved,
            })
        }
        Err(e) => {
            if let Err(undo) = rename_on_disk(ctx, &to_fs, &from_fs, is_asset) {
                tracing::error!("Failed to restore {} after mirror error: {}", from_fs.display(), undo);
            }
            Err(e)
        }
    }
}

fn rename_on_disk(ctx: &OperationContext<'_>, from: &Path, to: &Path, is_asset: bool) -> Result<(), BrowserError> {
    if is_asset {
        ctx.services.assets.rename_asset(from, to)?;
    } else {
        ctx.services.fs.rename_path(from, to)?;
    }
    Ok(())
}

fn commit_delete(ctx: &mut OperationContext<'_>, path: &LogicalPath) -> Result<Vec<LogicalPath>, BrowserError> {
    let is_asset = ctx
        .tree
        .get(path)
        .map(PathMetadata::is_asset)
        .ok_or_else(|| BrowserError::NotFound(path.clone()))?;
    let fs_path = ctx.fs_path(path)?;

    let result = if is_asset {
        ctx.services.assets.delete_asset(&fs_path).map_err(BrowserError::from)
    } else {
        ctx.services.fs.delete_path(&fs_path).map_err(BrowserError::from)
    };
    match result {
        Ok(()) => {}
        // Already gone on disk; drop it from the mirror too
        Err(e) if e.kind() == ErrorKind::Missing => {
            tracing::warn!("{} was already removed from disk", fs_path.display());
        }
        Err(e) => return Err(e),
    }

    let removed = ctx.tree.remove(path)?;
    tracing::info!("Deleted {} ({} paths)", path, removed.len());
    Ok(removed.into_iter().map(|r| r.path().clone()).collect())
}

fn commit_import(
    ctx: &mut OperationContext<'_>,
    directory: &LogicalPath,
    source: &Path,
) -> Result<LogicalPath, BrowserError> {
    if !ctx.tree.is_directory(directory) {
        return Err(BrowserError::NotFound(directory.clone()));
    }

    let extension = source
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    let type_id = ctx
        .services
        .assets
        .type_for_extension(&extension)
        .ok_or_else(|| AssetError::UnsupportedFormat(source.display().to_string()))?;

    let file_name = source
        .file_name()
        .map(|n| asset_fs::sanitize_filename(&n.to_string_lossy(), asset_fs::SanitizeMode::Underscore))
        .ok_or_else(|| BrowserError::InvalidName(source.display().to_string()))?;
    let path = directory.join(file_name_for(&file_name, true, ctx.asset_extension));
    if ctx.tree.sibling_named(directory, path.file_name()).is_some() {
        return Err(BrowserError::NameConflict(path));
    }
    let fs_path = ctx.fs_path(&path)?;

    let header = ctx.services.assets.import_asset(type_id, source, &fs_path)?;
    let type_info = ctx.services.assets.type_info(type_id);
    let record = PathMetadata::asset(path.clone(), AssetMetadata::from_header(&header, type_info))
        .with_thumbnail(ctx.services.thumbnails.thumbnail(&path, ThumbnailKind::Asset(type_id)));

    if let Err(e) = ctx.tree.insert(record) {
        undo_disk_creation(ctx, &fs_path, true);
        return Err(e);
    }

    tracing::info!("Imported {} as {}", source.display(), path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_project, FailingFileSystem, Failure, SCENE};
    use std::sync::Arc;

    fn p(path: &str) -> LogicalPath {
        LogicalPath::new(path)
    }

    struct Harness {
        _temp: tempfile::TempDir,
        root: AssetRoot,
        tree: DirectoryTree,
        services: BrowserServices,
        fs: Arc<FailingFileSystem>,
        ops: PathOperations,
    }

    impl Harness {
        fn new() -> Self {
            let (temp, root) = sample_project();
            let fs = Arc::new(FailingFileSystem::new());
            let services = BrowserServices::with_file_system(fs.clone());
            let tree = DirectoryTree::bootstrap(
                &root,
                ".zasset",
                services.fs.as_ref(),
                services.assets.as_ref(),
                services.thumbnails.as_ref(),
            )
            .unwrap();
            Self {
                _temp: temp,
                root,
                tree,
                services,
                fs,
                ops: PathOperations::new(),
            }
        }

        fn commit(&mut self, text: &str) -> OperationOutcome {
            if let Some(editor) = self.ops.rename_editor_mut() {
                editor.set_text(text);
            }
            let mut ctx = OperationContext {
                tree: &mut self.tree,
                asset_root: &self.root,
                services: &self.services,
                asset_extension: ".zasset",
            };
            self.ops.commit_rename(&mut ctx)
        }

        fn confirm_delete(&mut self) -> OperationOutcome {
            let mut ctx = OperationContext {
                tree: &mut self.tree,
                asset_root: &self.root,
                services: &self.services,
                asset_extension: ".zasset",
            };
            self.ops.confirm_delete(&mut ctx)
        }

        fn on_disk(&self, path: &str) -> bool {
            self.root.to_fs_path(&p(path)).map(|f| f.exists()).unwrap_or(false)
        }
    }

    #[test]
    fn test_available_new_path_probes_suffixes() {
        let mut h = Harness::new();
        let assets = p("/Assets");
        assert_eq!(available_new_path(&h.tree, &assets, "NewFolder", None), p("/Assets/NewFolder"));

        h.tree.insert(PathMetadata::directory(p("/Assets/NewFolder"))).unwrap();
        assert_eq!(available_new_path(&h.tree, &assets, "NewFolder", None), p("/Assets/NewFolder1"));
        assert_eq!(
            available_new_path(&h.tree, &assets, "main", Some(".zasset")),
            p("/Assets/main1.zasset")
        );
    }

    #[test]
    fn test_create_folder_commit() {
        let mut h = Harness::new();
        let placeholder = h
            .ops
            .request_create(&h.tree, &p("/Assets"), NewPathKind::Directory, "NewFolder", ".zasset")
            .unwrap();
        assert_eq!(placeholder, p("/Assets/NewFolder"));
        assert_eq!(h.ops.state(), OperationState::PendingCreate);
        assert_eq!(h.ops.rename_editor().unwrap().text(), "NewFolder");

        let outcome = h.commit("Materials");
        assert!(matches!(outcome, OperationOutcome::Created(ref path) if *path == p("/Assets/Materials")));
        assert_eq!(h.ops.state(), OperationState::Idle);
        assert!(h.tree.is_directory(&p("/Assets/Materials")));
        assert!(h.on_disk("/Assets/Materials"));
        assert!(h.tree.check_consistency().is_ok());
    }

    #[test]
    fn test_create_asset_appends_extension() {
        let mut h = Harness::new();
        h.ops
            .request_create(&h.tree, &p("/Assets"), NewPathKind::Asset(AssetTypeId(SCENE)), "NewScene", ".zasset")
            .unwrap();
        assert_eq!(h.ops.rename_editor().unwrap().text(), "NewScene");

        let outcome = h.commit("Level1");
        assert!(matches!(outcome, OperationOutcome::Created(_)));
        let record = h.tree.get(&p("/Assets/Level1.zasset")).unwrap();
        assert_eq!(record.asset_type_id(), Some(AssetTypeId(SCENE)));
        assert_eq!(record.name(), "Level1");
        assert!(h.on_disk("/Assets/Level1.zasset"));
    }

    #[test]
    fn test_create_conflict_keeps_edit_pending() {
        let mut h = Harness::new();
        h.ops
            .request_create(&h.tree, &p("/Assets"), NewPathKind::Directory, "NewFolder", ".zasset")
            .unwrap();

        let outcome = h.commit("Sounds");
        assert!(matches!(outcome, OperationOutcome::Rejected(BrowserError::NameConflict(_))));
        assert_eq!(h.ops.state(), OperationState::PendingCreate);
        assert_eq!(h.ops.rename_editor().unwrap().text(), "NewFolder");
        assert!(!h.tree.contains(&p("/Assets/NewFolder")));

        assert!(matches!(h.ops.cancel_rename(), OperationOutcome::Cancelled));
        assert_eq!(h.ops.state(), OperationState::Idle);
        assert!(!h.on_disk("/Assets/NewFolder"));
    }

    #[test]
    fn test_second_create_ignored_while_pending() {
        let mut h = Harness::new();
        assert!(h
            .ops
            .request_create(&h.tree, &p("/Assets"), NewPathKind::Directory, "NewFolder", ".zasset")
            .is_some());
        assert!(h
            .ops
            .request_create(&h.tree, &p("/Assets"), NewPathKind::Directory, "NewFolder", ".zasset")
            .is_none());
        assert!(!h.ops.request_rename(&h.tree, Some(&p("/Assets/main.zasset"))));
    }

    #[test]
    fn test_rename_asset() {
        let mut h = Harness::new();
        assert!(h.ops.request_rename(&h.tree, Some(&p("/Assets/Textures/tree.zasset"))));
        assert_eq!(h.ops.rename_editor().unwrap().text(), "tree");

        let outcome = h.commit("oak");
        match outcome {
            OperationOutcome::Renamed { from, to, moved } => {
                assert_eq!(from, p("/Assets/Textures/tree.zasset"));
                assert_eq!(to, p("/Assets/Textures/oak.zasset"));
                assert_eq!(moved.len(), 1);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(h.on_disk("/Assets/Textures/oak.zasset"));
        assert!(!h.on_disk("/Assets/Textures/tree.zasset"));
        assert_eq!(h.ops.state(), OperationState::Idle);
    }

    #[test]
    fn test_rename_to_same_name_is_noop() {
        let mut h = Harness::new();
        h.ops.request_rename(&h.tree, Some(&p("/Assets/Sounds")));
        let outcome = h.commit("Sounds");
        assert!(matches!(outcome, OperationOutcome::Unchanged(ref path) if *path == p("/Assets/Sounds")));
        assert!(h.on_disk("/Assets/Sounds"));
    }

    #[test]
    fn test_rename_conflict_is_rejected() {
        let mut h = Harness::new();
        h.ops.request_rename(&h.tree, Some(&p("/Assets/Textures")));
        let outcome = h.commit("Sounds");

        assert!(matches!(outcome, OperationOutcome::Rejected(BrowserError::NameConflict(_))));
        assert_eq!(h.ops.state(), OperationState::Idle);
        assert!(h.tree.contains(&p("/Assets/Textures/tree.zasset")));
        assert!(h.on_disk("/Assets/Textures"));
    }

    #[test]
    fn test_rename_conflict_ignores_case() {
        let mut h = Harness::new();
        h.ops.request_rename(&h.tree, Some(&p("/Assets/Textures")));
        let outcome = h.commit("sounds");

        assert!(matches!(outcome, OperationOutcome::Rejected(BrowserError::NameConflict(_))));
        assert!(h.tree.contains(&p("/Assets/Textures/tree.zasset")));
        assert!(!h.tree.contains(&p("/Assets/sounds")));
    }

    #[test]
    fn test_case_only_rename() {
        let mut h = Harness::new();
        h.ops.request_rename(&h.tree, Some(&p("/Assets/main.zasset")));
        let outcome = h.commit("Main");

        assert!(matches!(outcome, OperationOutcome::Renamed { ref to, .. } if *to == p("/Assets/Main.zasset")));
        assert!(h.tree.contains(&p("/Assets/Main.zasset")));
        assert!(!h.tree.contains(&p("/Assets/main.zasset")));
        assert!(h.on_disk("/Assets/Main.zasset"));
        assert!(h.tree.check_consistency().is_ok());
    }

    #[test]
    fn test_create_conflict_ignores_case() {
        let mut h = Harness::new();
        h.ops
            .request_create(&h.tree, &p("/Assets"), NewPathKind::Directory, "NewFolder", ".zasset")
            .unwrap();

        let outcome = h.commit("textures");
        assert!(matches!(outcome, OperationOutcome::Rejected(BrowserError::NameConflict(_))));
        assert_eq!(h.ops.state(), OperationState::PendingCreate);
        assert!(!h.tree.contains(&p("/Assets/textures")));
    }

    #[test]
    fn test_rename_moves_pending_delete_inside_subtree() {
        let mut h = Harness::new();
        assert!(h.ops.request_delete(&h.tree, Some(&p("/Assets/Textures/tree.zasset"))));
        assert!(h.ops.request_rename(&h.tree, Some(&p("/Assets/Textures"))));

        assert!(matches!(h.commit("Images"), OperationOutcome::Renamed { .. }));
        assert_eq!(h.ops.path_to_delete(), Some(&p("/Assets/Images/tree.zasset")));

        assert!(h.confirm_delete().mutated());
        assert!(!h.tree.contains(&p("/Assets/Images/tree.zasset")));
        assert!(!h.on_disk("/Assets/Images/tree.zasset"));
        assert!(h.tree.is_directory(&p("/Assets/Images")));
        assert!(h.tree.check_consistency().is_ok());
    }

    #[test]
    fn test_rename_moves_pending_delete_of_target() {
        let mut h = Harness::new();
        h.ops.request_delete(&h.tree, Some(&p("/Assets/main.zasset")));
        h.ops.request_rename(&h.tree, Some(&p("/Assets/main.zasset")));

        assert!(matches!(h.commit("Arena"), OperationOutcome::Renamed { .. }));
        assert_eq!(h.ops.path_to_delete(), Some(&p("/Assets/Arena.zasset")));

        match h.confirm_delete() {
            OperationOutcome::Deleted { path, removed } => {
                assert_eq!(path, p("/Assets/Arena.zasset"));
                assert_eq!(removed, vec![p("/Assets/Arena.zasset")]);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!h.on_disk("/Assets/Arena.zasset"));
        assert!(!h.on_disk("/Assets/main.zasset"));
    }

    #[test]
    fn test_rename_keeps_unrelated_pending_delete() {
        let mut h = Harness::new();
        h.ops.request_delete(&h.tree, Some(&p("/Assets/Sounds")));
        h.ops.request_rename(&h.tree, Some(&p("/Assets/Textures")));

        h.commit("Images");
        assert_eq!(h.ops.path_to_delete(), Some(&p("/Assets/Sounds")));
    }

    #[test]
    fn test_rename_invalid_name() {
        let mut h = Harness::new();
        h.ops.request_rename(&h.tree, Some(&p("/Assets/Sounds")));
        let outcome = h.commit("a/b");
        assert!(matches!(outcome, OperationOutcome::Rejected(BrowserError::InvalidName(_))));
        assert!(h.tree.contains(&p("/Assets/Sounds")));
    }

    #[test]
    fn test_rename_io_failure_leaves_mirror() {
        let mut h = Harness::new();
        h.fs.fail(Failure::Rename);
        h.ops.request_rename(&h.tree, Some(&p("/Assets/Textures")));

        let outcome = h.commit("Images");
        assert!(matches!(outcome, OperationOutcome::Rejected(BrowserError::Io(_))));
        assert!(h.tree.contains(&p("/Assets/Textures/tree.zasset")));
        assert!(!h.tree.contains(&p("/Assets/Images")));
        assert!(h.tree.check_consistency().is_ok());
    }

    #[test]
    fn test_empty_requests_are_ignored() {
        let mut h = Harness::new();
        assert!(!h.ops.request_rename(&h.tree, None));
        assert!(!h.ops.request_delete(&h.tree, None));
        assert!(!h.ops.request_delete(&h.tree, Some(&p("/Assets"))));
        assert!(!h.ops.request_delete(&h.tree, Some(&p("/Assets/ghost.zasset"))));
        assert_eq!(h.ops.state(), OperationState::Idle);
        assert!(matches!(h.commit("x"), OperationOutcome::Ignored));
    }

    #[test]
    fn test_delete_directory() {
        let mut h = Harness::new();
        assert!(h.ops.request_delete(&h.tree, Some(&p("/Assets/Textures"))));
        assert_eq!(h.ops.state(), OperationState::PendingDelete);

        match h.confirm_delete() {
            OperationOutcome::Deleted { path, removed } => {
                assert_eq!(path, p("/Assets/Textures"));
                assert_eq!(removed, vec![p("/Assets/Textures"), p("/Assets/Textures/tree.zasset")]);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!h.on_disk("/Assets/Textures"));
        assert_eq!(h.ops.state(), OperationState::Idle);
        assert!(h.tree.check_consistency().is_ok());
    }

    #[test]
    fn test_delete_cancel_and_failure() {
        let mut h = Harness::new();
        h.ops.request_delete(&h.tree, Some(&p("/Assets/Sounds")));
        assert!(matches!(h.ops.cancel_delete(), OperationOutcome::Cancelled));
        assert!(h.tree.contains(&p("/Assets/Sounds")));

        h.fs.fail(Failure::Delete);
        h.ops.request_delete(&h.tree, Some(&p("/Assets/Sounds")));
        assert!(h.confirm_delete().is_rejected());
        assert!(h.tree.contains(&p("/Assets/Sounds")));
        assert!(h.on_disk("/Assets/Sounds"));
        assert_eq!(h.ops.state(), OperationState::Idle);
    }

    #[test]
    fn test_delete_clears_rename_inside_subtree() {
        let mut h = Harness::new();
        h.ops.request_rename(&h.tree, Some(&p("/Assets/Textures/tree.zasset")));
        h.ops.request_delete(&h.tree, Some(&p("/Assets/Textures")));
        assert!(h.ops.path_to_rename().is_some());
        assert!(h.ops.path_to_delete().is_some());

        assert!(h.confirm_delete().mutated());
        assert_eq!(h.ops.state(), OperationState::Idle);
    }

    #[test]
    fn test_import_asset() {
        let mut h = Harness::new();
        let source_dir = tempfile::TempDir::new().unwrap();
        let source = source_dir.path().join("rock.png");
        std::fs::write(&source, b"png").unwrap();

        let mut ctx = OperationContext {
            tree: &mut h.tree,
            asset_root: &h.root,
            services: &h.services,
            asset_extension: ".zasset",
        };
        let outcome = h.ops.import_asset(&mut ctx, &p("/Assets/Textures"), &source);
        assert!(matches!(outcome, OperationOutcome::Created(ref path) if *path == p("/Assets/Textures/rock.png.zasset")));
        assert!(h.on_disk("/Assets/Textures/rock.png"));

        let unsupported = source_dir.path().join("notes.txt");
        std::fs::write(&unsupported, b"txt").unwrap();
        let mut ctx = OperationContext {
            tree: &mut h.tree,
            asset_root: &h.root,
            services: &h.services,
            asset_extension: ".zasset",
        };
        let outcome = h.ops.import_asset(&mut ctx, &p("/Assets"), &unsupported);
        assert!(matches!(outcome, OperationOutcome::Rejected(BrowserError::Asset(AssetError::UnsupportedFormat(_)))));
    }
}
