//! Browser controller
//!
//! Owns the mirror, filters, selection and pending operations, and turns
//! user input (clicks, key presses, editor commits) into state changes. The
//! rendering layer reads from it each frame and reports input back; no
//! rendering happens here.

use asset_fs::{AssetRoot, LogicalPath};
use std::path::{Path, PathBuf};

use crate::command::{BrowserCommand, KeyChord, Keymap};
use crate::config::{BrowserConfig, ViewMode};
use crate::error::{BrowserError, Notification};
use crate::filter::{FilterCache, TextFilter, TypeFilter};
use crate::metadata::{AssetHandle, AssetTypeId, PathMetadata, TreeNodeId};
use crate::mirror::{DirectoryTree, TreeRow};
use crate::operations::{
    available_new_path, NewPathKind, OperationContext, OperationOutcome, PathOperations, RenameEditor,
};
use crate::services::BrowserServices;
use crate::thumbnails::{TextureId, ThumbnailKind};

/// One segment of the path bar above the right column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub name: String,
    pub path: LogicalPath,
}

/// Summary shown in the tooltip / details pane for a path
#[derive(Debug, Clone, PartialEq)]
pub struct PathDetails {
    pub path: LogicalPath,
    pub name: String,
    /// Asset type name, or "Folder"
    pub kind_name: String,
    pub fs_path: Option<PathBuf>,
    pub source_path: Option<PathBuf>,
    /// File the asset was imported into, for resource asset types
    pub resource_path: Option<PathBuf>,
    pub handle: Option<AssetHandle>,
    pub child_count: usize,
}

/// Data carried while an asset is dragged out of the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    /// Payload id; drop targets accept by asset type name
    pub type_name: String,
    pub asset_type: AssetTypeId,
    pub handle: AssetHandle,
    pub path: LogicalPath,
}

/// Entry of the "create asset" context menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssetEntry {
    pub type_id: AssetTypeId,
    pub name: String,
    pub icon: TextureId,
}

pub struct AssetBrowser {
    config: BrowserConfig,
    asset_root: AssetRoot,
    tree: DirectoryTree,
    services: BrowserServices,
    operations: PathOperations,
    text_filter: TextFilter,
    type_filter: TypeFilter,
    filter_cache: FilterCache,
    keymap: Keymap,
    view_mode: ViewMode,
    selected_directory: LogicalPath,
    selected_path: Option<LogicalPath>,
    /// Scroll the selected path into view on the next frame
    focus_selected_path: bool,
    /// Directory double-clicked this frame, opened once the frame's drawing is done
    directory_to_open: Option<LogicalPath>,
    panel_focused: bool,
    notifications: Vec<Notification>,
}

impl AssetBrowser {
    /// Scan the configured asset directory and restore the tree's open/closed state
    pub fn new(config: BrowserConfig, services: BrowserServices) -> Result<Self, BrowserError> {
        let asset_root = config.asset_root();
        let mut tree = DirectoryTree::bootstrap(
            &asset_root,
            &config.project.asset_extension,
            services.fs.as_ref(),
            services.assets.as_ref(),
            services.thumbnails.as_ref(),
        )?;

        let restored: Vec<(LogicalPath, bool)> = tree
            .store()
            .iter()
            .filter_map(|record| {
                let id = record.as_directory()?.tree_node_id();
                Some((record.path().clone(), services.tree_state.is_expanded(id)?))
            })
            .collect();
        for (path, expanded) in restored {
            tree.set_tree_expanded(&path, expanded);
        }

        let type_filter = TypeFilter::new(
            services
                .assets
                .asset_types()
                .iter()
                .map(|t| (t.id, t.name.clone())),
        );
        let keymap = Keymap::new(&config.keybindings);
        let view_mode = config.browser.view_mode;
        let selected_directory = tree.root().clone();

        Ok(Self {
            config,
            asset_root,
            tree,
            services,
            operations: PathOperations::new(),
            text_filter: TextFilter::default(),
            type_filter,
            filter_cache: FilterCache::new(),
            keymap,
            view_mode,
            selected_directory,
            selected_path: None,
            focus_selected_path: false,
            directory_to_open: None,
            panel_focused: false,
            notifications: Vec::new(),
        })
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn asset_root(&self) -> &AssetRoot {
        &self.asset_root
    }

    pub fn tree(&self) -> &DirectoryTree {
        &self.tree
    }

    pub fn get(&self, path: &LogicalPath) -> Option<&PathMetadata> {
        self.tree.get(path)
    }

    pub fn services(&self) -> &BrowserServices {
        &self.services
    }

    pub fn operations(&self) -> &PathOperations {
        &self.operations
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn thumbnail_width(&self) -> f32 {
        self.config.thumbnail_width(self.view_mode)
    }

    pub fn set_panel_focused(&mut self, focused: bool) {
        self.panel_focused = focused;
    }

    // ===== Selection and navigation =====

    pub fn selected_directory(&self) -> &LogicalPath {
        &self.selected_directory
    }

    pub fn selected_path(&self) -> Option<&LogicalPath> {
        self.selected_path.as_ref()
    }

    /// Click on a directory in the left-column tree
    pub fn select_directory(&mut self, dir: &LogicalPath) -> bool {
        if !self.tree.is_directory(dir) {
            return false;
        }
        self.selected_directory = dir.clone();
        true
    }

    /// Click on an item in the right column
    pub fn select_path(&mut self, path: Option<&LogicalPath>) {
        self.selected_path = path.filter(|p| self.tree.contains(p)).cloned();
    }

    /// Select `path` from outside the browser: show its directory and scroll to it
    pub fn browse_to(&mut self, path: &LogicalPath) -> bool {
        let Some(parent) = path.parent().filter(|_| self.tree.contains(path)) else {
            return false;
        };
        self.expand_ancestors(&parent);
        self.selected_directory = parent;
        self.selected_path = Some(path.clone());
        self.focus_selected_path = true;
        true
    }

    /// Show `dir` in the right column, expanding its whole ancestor chain in the tree
    pub fn open_directory(&mut self, dir: &LogicalPath) -> bool {
        if !self.tree.is_directory(dir) {
            tracing::warn!("Cannot open {}: not a directory", dir);
            return false;
        }

        self.expand_ancestors(dir);
        self.selected_directory = dir.clone();
        self.selected_path = None;
        true
    }

    fn expand_ancestors(&mut self, dir: &LogicalPath) {
        let root = self.tree.root().clone();
        for ancestor in dir.ancestors().take_while(|a| a.starts_with(&root)) {
            self.set_tree_node_expanded(&ancestor, true);
        }
    }

    /// Defer opening a directory until [`AssetBrowser::process_deferred`]
    pub fn queue_directory_open(&mut self, dir: &LogicalPath) {
        self.directory_to_open = Some(dir.clone());
    }

    /// Run work deferred to the end of the frame
    pub fn process_deferred(&mut self) {
        if let Some(dir) = self.directory_to_open.take() {
            self.open_directory(&dir);
        }
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let root = self.tree.root();
        let mut crumbs: Vec<Breadcrumb> = self
            .selected_directory
            .ancestors()
            .take_while(|a| a.starts_with(root))
            .map(|path| Breadcrumb {
                name: path.file_name().to_string(),
                path,
            })
            .collect();
        crumbs.reverse();
        crumbs
    }

    pub fn jump_to_breadcrumb(&mut self, index: usize) -> bool {
        match self.breadcrumbs().into_iter().nth(index) {
            Some(crumb) => self.select_directory(&crumb.path),
            None => false,
        }
    }

    // ===== Directory tree =====

    pub fn directory_tree_rows(&self) -> Vec<TreeRow> {
        self.tree.tree_rows()
    }

    /// Open or close a tree node, mirroring the state into the persisted store
    pub fn set_tree_node_expanded(&mut self, dir: &LogicalPath, expanded: bool) -> bool {
        if !self.tree.set_tree_expanded(dir, expanded) {
            return false;
        }
        self.services
            .tree_state
            .set_expanded(TreeNodeId::for_path(dir), expanded);
        true
    }

    pub fn toggle_tree_node(&mut self, dir: &LogicalPath) -> bool {
        let expanded = match self.tree.store().directory(dir) {
            Some(meta) => meta.is_tree_expanded,
            None => return false,
        };
        self.set_tree_node_expanded(dir, !expanded)
    }

    // ===== Filters and the right-column view =====

    pub fn text_filter(&self) -> &TextFilter {
        &self.text_filter
    }

    pub fn type_filter(&self) -> &TypeFilter {
        &self.type_filter
    }

    pub fn set_text_filter(&mut self, input: &str) -> bool {
        self.text_filter.set(input)
    }

    pub fn set_type_filter(&mut self, type_id: AssetTypeId, active: bool) -> bool {
        self.type_filter.set_active(type_id, active)
    }

    pub fn is_any_filter_active(&self) -> bool {
        self.text_filter.is_active() || self.type_filter.is_active()
    }

    pub fn clear_all_filters(&mut self) -> bool {
        let text = self.text_filter.clear();
        let types = self.type_filter.clear();
        text || types
    }

    /// Paths to draw in the right column, in display order.
    ///
    /// With a filter active this is the cached filtered view of the selected
    /// directory; otherwise its children, followed by the placeholder of a
    /// pending creation.
    pub fn visible_paths(&mut self) -> Vec<LogicalPath> {
        if self.is_any_filter_active() {
            return self
                .filter_cache
                .get_view(
                    &self.tree,
                    &self.selected_directory,
                    &self.text_filter,
                    &self.type_filter,
                    self.config.browser.filter_recursively,
                )
                .to_vec();
        }

        let mut paths = self.tree.children_of(&self.selected_directory).to_vec();
        if let Some(creation) = self.operations.path_to_create() {
            if creation.path.parent().as_ref() == Some(&self.selected_directory) {
                paths.push(creation.path.clone());
            }
        }
        paths
    }

    pub fn filter_recompute_count(&self) -> u64 {
        self.filter_cache.recompute_count()
    }

    /// Index to scroll to after a selection was made from outside; reported once
    pub fn scroll_target(&mut self) -> Option<usize> {
        if !std::mem::take(&mut self.focus_selected_path) {
            return None;
        }
        let selected = self.selected_path.clone()?;
        self.visible_paths().iter().position(|p| *p == selected)
    }

    // ===== Keyboard =====

    /// Dispatch a key press; ignored unless the panel has focus and no name is being edited
    pub fn handle_key(&mut self, chord: &KeyChord) -> bool {
        if !self.panel_focused || self.operations.rename_editor().is_some() {
            return false;
        }
        match self.keymap.resolve(chord) {
            Some(command) => self.execute(command),
            None => false,
        }
    }

    pub fn execute(&mut self, command: BrowserCommand) -> bool {
        let selected = self.selected_path.clone();
        match command {
            BrowserCommand::OpenSelected => self.request_open(selected.as_ref()),
            BrowserCommand::RenameSelected => self.request_rename(selected.as_ref()),
            BrowserCommand::DeleteSelected => self.request_delete(selected.as_ref()),
            BrowserCommand::NewFolder => self.request_create_folder().is_some(),
            BrowserCommand::ClearFilters => self.clear_all_filters(),
            BrowserCommand::SetViewMode(mode) => {
                self.set_view_mode(mode);
                true
            }
        }
    }

    // ===== Path operations =====

    /// Open an asset's editor, or a directory in the right column
    pub fn request_open(&mut self, path: Option<&LogicalPath>) -> bool {
        let Some(path) = path else {
            return false;
        };
        match self.tree.get(path) {
            Some(record) if record.is_directory() => {
                let path = path.clone();
                self.open_directory(&path)
            }
            Some(_) => self.open_asset(path),
            None => false,
        }
    }

    fn open_asset(&mut self, path: &LogicalPath) -> bool {
        let result = match self.asset_root.to_fs_path(path) {
            Some(fs_path) => self.services.assets.open_asset_editor(&fs_path).map_err(BrowserError::from),
            None => Err(BrowserError::NotFound(path.clone())),
        };
        self.report(result).is_some()
    }

    pub fn request_rename(&mut self, path: Option<&LogicalPath>) -> bool {
        self.operations.request_rename(&self.tree, path)
    }

    pub fn request_delete(&mut self, path: Option<&LogicalPath>) -> bool {
        self.operations.request_delete(&self.tree, path)
    }

    pub fn request_create_folder(&mut self) -> Option<LogicalPath> {
        let base = self.config.browser.new_folder_name.clone();
        self.request_create(NewPathKind::Directory, &base)
    }

    /// Propose a `New<Type>` asset in the selected directory
    pub fn request_create_asset(&mut self, type_id: AssetTypeId) -> Option<LogicalPath> {
        let type_name = self.services.assets.type_name(type_id)?.to_string();
        let base = format!("New{}", formatted_asset_type_name(&type_name));
        self.request_create(NewPathKind::Asset(type_id), &base)
    }

    fn request_create(&mut self, kind: NewPathKind, base: &str) -> Option<LogicalPath> {
        let path = self.operations.request_create(
            &self.tree,
            &self.selected_directory,
            kind,
            base,
            &self.config.project.asset_extension,
        )?;
        // A filtered view would hide the placeholder
        self.clear_all_filters();
        self.selected_path = None;
        Some(path)
    }

    pub fn rename_editor(&self) -> Option<&RenameEditor> {
        self.operations.rename_editor()
    }

    pub fn rename_editor_mut(&mut self) -> Option<&mut RenameEditor> {
        self.operations.rename_editor_mut()
    }

    /// Commit the rename editor with `name`
    pub fn commit_rename(&mut self, name: &str) -> OperationOutcome {
        if let Some(editor) = self.operations.rename_editor_mut() {
            editor.set_text(name);
        }
        self.run(|ops, ctx| ops.commit_rename(ctx))
    }

    pub fn cancel_rename(&mut self) -> OperationOutcome {
        self.operations.cancel_rename()
    }

    pub fn confirm_delete(&mut self) -> OperationOutcome {
        self.run(|ops, ctx| ops.confirm_delete(ctx))
    }

    pub fn cancel_delete(&mut self) -> OperationOutcome {
        self.operations.cancel_delete()
    }

    /// Import an external file into the selected directory
    pub fn import_asset(&mut self, source: &Path) -> OperationOutcome {
        let directory = self.selected_directory.clone();
        self.run(|ops, ctx| ops.import_asset(ctx, &directory, source))
    }

    fn run<F>(&mut self, operation: F) -> OperationOutcome
    where
        F: FnOnce(&mut PathOperations, &mut OperationContext<'_>) -> OperationOutcome,
    {
        let mut ctx = OperationContext {
            tree: &mut self.tree,
            asset_root: &self.asset_root,
            services: &self.services,
            asset_extension: &self.config.project.asset_extension,
        };
        let outcome = operation(&mut self.operations, &mut ctx);
        self.apply_outcome(&outcome);
        outcome
    }

    /// Reconcile selection, tree state and the filter cache after an operation
    fn apply_outcome(&mut self, outcome: &OperationOutcome) {
        match outcome {
            OperationOutcome::Created(path) => {
                self.selected_path = Some(path.clone());
                self.focus_selected_path = true;
            }
            OperationOutcome::Renamed { from, to, moved } => {
                for (old, new) in moved {
                    if !self.tree.is_directory(new) {
                        continue;
                    }
                    let old_id = TreeNodeId::for_path(old);
                    if let Some(expanded) = self.services.tree_state.is_expanded(old_id) {
                        self.services
                            .tree_state
                            .set_expanded(TreeNodeId::for_path(new), expanded);
                        self.services.tree_state.forget(old_id);
                    }
                }
                if let Some(dir) = self.selected_directory.rebase(from, to) {
                    self.selected_directory = dir;
                }
                if let Some(dir) = self.directory_to_open.as_ref().and_then(|d| d.rebase(from, to)) {
                    self.directory_to_open = Some(dir);
                }
                self.selected_path = Some(to.clone());
                self.focus_selected_path = true;
            }
            OperationOutcome::Unchanged(path) => {
                self.selected_path = Some(path.clone());
            }
            OperationOutcome::Deleted { path, removed } => {
                for removed_path in removed {
                    self.services.tree_state.forget(TreeNodeId::for_path(removed_path));
                }
                if self.selected_path.as_ref().map(|s| s.starts_with(path)).unwrap_or(false) {
                    self.selected_path = None;
                }
                if self.selected_directory.starts_with(path) {
                    self.selected_directory = path
                        .parent()
                        .filter(|p| self.tree.is_directory(p))
                        .unwrap_or_else(|| self.tree.root().clone());
                }
                if self.directory_to_open.as_ref().map(|d| d.starts_with(path)).unwrap_or(false) {
                    self.directory_to_open = None;
                }
            }
            OperationOutcome::Rejected(e) => {
                self.notifications.push(Notification::from(e));
            }
            OperationOutcome::Cancelled | OperationOutcome::Ignored => {}
        }

        if outcome.mutated() {
            self.filter_cache.invalidate();
        }
    }

    // ===== Asset actions =====

    pub fn save_asset(&mut self, path: &LogicalPath) -> bool {
        let result = match self.tree.get(path) {
            Some(record) if record.is_asset() => match self.asset_root.to_fs_path(path) {
                Some(fs_path) => self.services.assets.save_asset(&fs_path).map_err(BrowserError::from),
                None => Err(BrowserError::NotFound(path.clone())),
            },
            _ => Err(BrowserError::NotFound(path.clone())),
        };
        self.report(result).is_some()
    }

    /// Save every asset below `dir`; returns how many were saved
    pub fn save_all_in_directory(&mut self, dir: &LogicalPath) -> usize {
        let assets: Vec<LogicalPath> = self
            .tree
            .descendants(dir)
            .into_iter()
            .filter(|p| self.tree.get(p).map(PathMetadata::is_asset).unwrap_or(false))
            .collect();

        let saved = assets.iter().filter(|p| self.save_asset(p)).count();
        tracing::info!("Saved {} of {} assets in {}", saved, assets.len(), dir);
        saved
    }

    pub fn show_in_file_browser(&mut self, path: &LogicalPath) -> bool {
        let result = match self.asset_root.to_fs_path(path) {
            Some(fs_path) if self.tree.contains(path) => {
                self.services.fs.show_in_file_browser(&fs_path).map_err(BrowserError::from)
            }
            _ => Err(BrowserError::NotFound(path.clone())),
        };
        self.report(result).is_some()
    }

    pub fn path_details(&self, path: &LogicalPath) -> Option<PathDetails> {
        let record = self.tree.get(path)?;
        let asset = record.as_asset();
        let kind_name = match asset {
            Some(a) => self
                .services
                .assets
                .type_name(a.type_id)
                .unwrap_or("Unknown")
                .to_string(),
            None => "Folder".to_string(),
        };

        Some(PathDetails {
            path: path.clone(),
            name: record.name().to_string(),
            kind_name,
            fs_path: self.asset_root.to_fs_path(path),
            source_path: asset.and_then(|a| a.source_path.clone()),
            resource_path: record.resource_path().and_then(|r| self.asset_root.to_fs_path(&r)),
            handle: asset.map(|a| a.handle),
            child_count: self.tree.children_of(path).len(),
        })
    }

    /// Drag payload for an asset; directories cannot be dragged
    pub fn drag_payload(&self, path: &LogicalPath) -> Option<DragPayload> {
        let asset = self.tree.get(path)?.as_asset()?;
        let type_name = self.services.assets.type_name(asset.type_id)?.to_string();
        Some(DragPayload {
            type_name,
            asset_type: asset.type_id,
            handle: asset.handle,
            path: path.clone(),
        })
    }

    /// Asset types offered in the "create" context menu
    pub fn creatable_asset_types(&self) -> Vec<NewAssetEntry> {
        self.services
            .assets
            .asset_types()
            .iter()
            .filter(|t| !t.importable())
            .map(|t| NewAssetEntry {
                type_id: t.id,
                name: t.name.clone(),
                icon: self.services.thumbnails.type_icon(ThumbnailKind::Asset(t.id)),
            })
            .collect()
    }

    /// First free name for a new entry in the selected directory
    pub fn available_new_path_name(&self, base_name: &str, is_asset: bool) -> LogicalPath {
        let extension = is_asset.then_some(self.config.project.asset_extension.as_str());
        available_new_path(&self.tree, &self.selected_directory, base_name, extension)
    }

    // ===== Notifications =====

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn report<T>(&mut self, result: Result<T, BrowserError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("{}", e);
                self.notifications.push(Notification::from(&e));
                None
            }
        }
    }
}

/// "static mesh" -> "StaticMesh"
pub fn formatted_asset_type_name(type_name: &str) -> String {
    type_name
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
