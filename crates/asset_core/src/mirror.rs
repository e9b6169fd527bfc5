//! Directory hierarchy mirror
//!
//! In-memory copy of the project asset directory. Every directory keeps an
//! ordered list of its direct children (directories first, then by
//! case-insensitive name) and every listed path has exactly one record in the
//! [`PathMetadataStore`]. The mirror is only mutated through [`DirectoryTree::insert`],
//! [`DirectoryTree::remove`] and [`DirectoryTree::rename`], each of which keeps
//! both structures in step.

use asset_fs::{AssetRoot, DirEntry, FileSystem, LogicalPath};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::asset_manager::AssetManager;
use crate::error::BrowserError;
use crate::metadata::{AssetHandle, AssetMetadata, PathMetadata, TreeNodeId};
use crate::store::PathMetadataStore;
use crate::thumbnails::{TextureId, ThumbnailKind, ThumbnailProvider};

/// One visible row of the left-column directory tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub path: LogicalPath,
    pub name: String,
    pub depth: usize,
    /// No sub-directories; never shown as expanded
    pub is_leaf: bool,
    pub is_expanded: bool,
    pub node_id: TreeNodeId,
    pub thumbnail: Option<TextureId>,
}

#[derive(Debug)]
pub struct DirectoryTree {
    root: LogicalPath,
    children: HashMap<LogicalPath, Vec<LogicalPath>>,
    store: PathMetadataStore,
}

/// Collaborators used while scanning the asset directory
struct Scan<'a> {
    fs: &'a dyn FileSystem,
    assets: &'a dyn AssetManager,
    thumbnails: &'a dyn ThumbnailProvider,
    extension: String,
    seen_handles: HashSet<AssetHandle>,
}

impl DirectoryTree {
    /// Empty tree holding only the (expanded) root directory
    pub fn new(root: LogicalPath) -> Self {
        let mut store = PathMetadataStore::new();
        let mut record = PathMetadata::directory(root.clone());
        if let Some(dir) = record.as_directory_mut() {
            dir.is_tree_expanded = true;
        }
        // Empty store, cannot conflict
        let _ = store.insert(record);

        let mut children = HashMap::new();
        children.insert(root.clone(), Vec::new());

        Self { root, children, store }
    }

    /// Build the mirror by walking the asset directory depth-first.
    ///
    /// Files without the engine asset extension are ignored. Asset files with
    /// an unreadable header or a handle already seen are skipped with a warning.
    pub fn bootstrap(
        asset_root: &AssetRoot,
        asset_extension: &str,
        fs: &dyn FileSystem,
        assets: &dyn AssetManager,
        thumbnails: &dyn ThumbnailProvider,
    ) -> Result<Self, BrowserError> {
        let root = asset_root.logical_root().clone();
        let mut tree = Self::new(root.clone());
        if let Some(record) = tree.store.get_mut(&root) {
            record.thumbnail = thumbnails.thumbnail(&root, ThumbnailKind::Directory);
        }

        let mut scan = Scan {
            fs,
            assets,
            thumbnails,
            extension: asset_extension.trim_start_matches('.').to_lowercase(),
            seen_handles: HashSet::new(),
        };

        let entries = fs.read_dir(asset_root.fs_root())?;
        tree.scan_directory(&mut scan, &root, entries);

        tracing::info!(
            "Asset tree built from {}: {} paths",
            asset_root.fs_root().display(),
            tree.len()
        );
        Ok(tree)
    }

    fn scan_directory(&mut self, scan: &mut Scan<'_>, dir: &LogicalPath, mut entries: Vec<DirEntry>) {
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        for entry in entries {
            let path = dir.join(&entry.name);

            if entry.is_dir {
                let record = PathMetadata::directory(path.clone())
                    .with_thumbnail(scan.thumbnails.thumbnail(&path, ThumbnailKind::Directory));
                if let Err(e) = self.insert(record) {
                    tracing::warn!("Skipping directory {}: {}", entry.path.display(), e);
                    continue;
                }

                match scan.fs.read_dir(&entry.path) {
                    Ok(sub_entries) => self.scan_directory(scan, &path, sub_entries),
                    Err(e) => tracing::warn!("Skipping unreadable directory {}: {}", entry.path.display(), e),
                }
            } else if entry.extension == scan.extension {
                let header = match scan.assets.read_header(&entry.path) {
                    Ok(header) => header,
                    Err(e) => {
                        tracing::warn!("Skipping asset {}: {}", entry.path.display(), e);
                        continue;
                    }
                };

                if !scan.seen_handles.insert(header.asset_handle) {
                    tracing::warn!(
                        "Skipping asset {}: duplicate handle {}",
                        entry.path.display(),
                        header.asset_handle.0
                    );
                    continue;
                }

                let type_info = scan.assets.type_info(header.asset_type);
                let record = PathMetadata::asset(path.clone(), AssetMetadata::from_header(&header, type_info))
                    .with_thumbnail(scan.thumbnails.thumbnail(&path, ThumbnailKind::Asset(header.asset_type)));
                if let Err(e) = self.insert(record) {
                    tracing::warn!("Skipping asset {}: {}", entry.path.display(), e);
                }
            }
        }
    }

    pub fn root(&self) -> &LogicalPath {
        &self.root
    }

    pub fn store(&self) -> &PathMetadataStore {
        &self.store
    }

    /// Number of live paths, root included
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn get(&self, path: &LogicalPath) -> Option<&PathMetadata> {
        self.store.get(path)
    }

    /// Mutable record access; the path itself cannot be changed through it
    pub fn get_mut(&mut self, path: &LogicalPath) -> Option<&mut PathMetadata> {
        self.store.get_mut(path)
    }

    pub fn contains(&self, path: &LogicalPath) -> bool {
        self.store.contains(path)
    }

    pub fn is_directory(&self, path: &LogicalPath) -> bool {
        self.store.directory(path).is_some()
    }

    /// Ordered direct children; empty for unknown paths and assets
    pub fn children_of(&self, dir: &LogicalPath) -> &[LogicalPath] {
        self.children.get(dir).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Membership test against the directory's child list
    pub fn contains_in_directory(&self, dir: &LogicalPath, path: &LogicalPath) -> bool {
        self.children_of(dir).contains(path)
    }

    /// Child of `dir` whose file name matches `file_name` ignoring case
    pub fn sibling_named(&self, dir: &LogicalPath, file_name: &str) -> Option<&LogicalPath> {
        let wanted = file_name.to_uppercase();
        self.children_of(dir)
            .iter()
            .find(|child| child.file_name().to_uppercase() == wanted)
    }

    /// All paths below `dir`, pre-order, in display order
    pub fn descendants(&self, dir: &LogicalPath) -> Vec<LogicalPath> {
        let mut out = Vec::new();
        self.collect_descendants(dir, &mut out);
        out
    }

    fn collect_descendants(&self, dir: &LogicalPath, out: &mut Vec<LogicalPath>) {
        for child in self.children_of(dir) {
            out.push(child.clone());
            self.collect_descendants(child, out);
        }
    }

    /// Register a new path under an existing directory
    pub fn insert(&mut self, record: PathMetadata) -> Result<(), BrowserError> {
        let path = record.path().clone();
        if self.store.contains(&path) {
            return Err(BrowserError::NameConflict(path));
        }

        let parent = path
            .parent()
            .filter(|p| p.starts_with(&self.root))
            .ok_or_else(|| BrowserError::NotFound(path.clone()))?;
        if !self.is_directory(&parent) {
            return Err(BrowserError::NotFound(parent));
        }

        let is_directory = record.is_directory();
        self.store.insert(record)?;
        if is_directory {
            self.children.insert(path.clone(), Vec::new());
        }
        self.attach(&parent, path);

        if is_directory {
            if let Some(dir) = self.store.directory_mut(&parent) {
                dir.has_any_sub_directory = true;
            }
        }
        Ok(())
    }

    /// Remove a path and, for directories, its whole subtree.
    ///
    /// Returns the removed records, the path itself first.
    pub fn remove(&mut self, path: &LogicalPath) -> Result<Vec<PathMetadata>, BrowserError> {
        if *path == self.root {
            return Err(BrowserError::invariant(format!("cannot remove the asset root {}", path)));
        }
        if !self.store.contains(path) {
            return Err(BrowserError::NotFound(path.clone()));
        }

        let parent = match path.parent() {
            Some(parent) if self.detach(&parent, path) => parent,
            _ => {
                return Err(BrowserError::invariant(format!(
                    "{} is not listed under its parent directory",
                    path
                )))
            }
        };

        let mut subtree = vec![path.clone()];
        self.collect_descendants(path, &mut subtree);

        let mut removed = Vec::with_capacity(subtree.len());
        for p in &subtree {
            self.children.remove(p);
            if let Some(record) = self.store.remove(p) {
                removed.push(record);
            }
        }

        self.refresh_has_sub_directory(&parent);
        Ok(removed)
    }

    /// Move `old` (and its subtree) to `new`.
    ///
    /// Nothing is changed unless the whole move can be applied. Returns every
    /// rekeyed `(old, new)` pair, the moved path first.
    pub fn rename(
        &mut self,
        old: &LogicalPath,
        new: &LogicalPath,
    ) -> Result<Vec<(LogicalPath, LogicalPath)>, BrowserError> {
        if old == new {
            return Ok(Vec::new());
        }
        if *old == self.root {
            return Err(BrowserError::invariant(format!("cannot rename the asset root {}", old)));
        }
        if !self.store.contains(old) {
            return Err(BrowserError::NotFound(old.clone()));
        }
        if self.store.contains(new) {
            return Err(BrowserError::NameConflict(new.clone()));
        }
        if new.starts_with(old) {
            return Err(BrowserError::InvalidName(format!("cannot move {} into itself", old)));
        }

        let new_parent = match new.parent() {
            Some(parent) if self.is_directory(&parent) => parent,
            Some(parent) => return Err(BrowserError::NotFound(parent)),
            None => return Err(BrowserError::NotFound(new.clone())),
        };
        let old_parent = match old.parent() {
            Some(parent) if self.contains_in_directory(&parent, old) => parent,
            _ => {
                return Err(BrowserError::invariant(format!(
                    "{} is not listed under its parent directory",
                    old
                )))
            }
        };

        // Stage every rekeyed record and child list before touching anything
        let mut subtree = vec![old.clone()];
        self.collect_descendants(old, &mut subtree);

        let mut moves = Vec::with_capacity(subtree.len());
        for path in subtree {
            let target = path
                .rebase(old, new)
                .ok_or_else(|| BrowserError::invariant(format!("{} is not under {}", path, old)))?;
            if self.store.contains(&target) {
                return Err(BrowserError::NameConflict(target));
            }
            moves.push((path, target));
        }

        let mut records = Vec::with_capacity(moves.len());
        let mut child_lists = Vec::new();
        for (from, to) in &moves {
            let record = self
                .store
                .get(from)
                .ok_or_else(|| BrowserError::invariant(format!("{} is listed but has no metadata", from)))?;
            records.push(record.rekeyed(to.clone()));

            if let Some(list) = self.children.get(from) {
                let rebased: Vec<LogicalPath> = list.iter().filter_map(|c| c.rebase(old, new)).collect();
                child_lists.push((from.clone(), to.clone(), rebased));
            }
        }

        // Swap records, restoring the previous ones if any insert fails
        let mut previous = Vec::with_capacity(moves.len());
        for (from, _) in &moves {
            if let Some(record) = self.store.remove(from) {
                previous.push(record);
            }
        }
        for (i, record) in records.into_iter().enumerate() {
            if let Err(e) = self.store.insert(record) {
                for (_, to) in &moves[..i] {
                    self.store.remove(to);
                }
                for record in previous {
                    let _ = self.store.insert(record);
                }
                return Err(e);
            }
        }

        self.detach(&old_parent, old);
        for (from, to, list) in child_lists {
            self.children.remove(&from);
            self.children.insert(to, list);
        }
        self.attach(&new_parent, new.clone());

        self.refresh_has_sub_directory(&old_parent);
        self.refresh_has_sub_directory(&new_parent);

        tracing::debug!("Mirror moved {} -> {} ({} paths)", old, new, moves.len());
        Ok(moves)
    }

    /// Set the tree-expanded flag of a directory; false if `dir` is not one
    pub fn set_tree_expanded(&mut self, dir: &LogicalPath, expanded: bool) -> bool {
        match self.store.directory_mut(dir) {
            Some(meta) => {
                meta.is_tree_expanded = expanded;
                true
            }
            None => false,
        }
    }

    /// Visible rows of the directory tree, honoring each node's expanded flag
    pub fn tree_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        self.push_tree_rows(&self.root, 0, &mut rows);
        rows
    }

    fn push_tree_rows(&self, dir: &LogicalPath, depth: usize, rows: &mut Vec<TreeRow>) {
        let Some(record) = self.store.get(dir) else {
            return;
        };
        let Some(meta) = record.as_directory() else {
            return;
        };

        let is_leaf = !meta.has_any_sub_directory;
        let is_expanded = meta.is_tree_expanded && !is_leaf;
        rows.push(TreeRow {
            path: dir.clone(),
            name: record.name().to_string(),
            depth,
            is_leaf,
            is_expanded,
            node_id: meta.tree_node_id,
            thumbnail: record.thumbnail,
        });

        if is_expanded {
            for child in self.children_of(dir) {
                if self.is_directory(child) {
                    self.push_tree_rows(child, depth + 1, rows);
                }
            }
        }
    }

    fn attach(&mut self, parent: &LogicalPath, path: LogicalPath) {
        let store = &self.store;
        let siblings = self.children.entry(parent.clone()).or_default();
        let pos = siblings
            .binary_search_by(|probe| compare_entries(store, probe, &path))
            .unwrap_or_else(|pos| pos);
        siblings.insert(pos, path);
    }

    fn detach(&mut self, parent: &LogicalPath, path: &LogicalPath) -> bool {
        let Some(siblings) = self.children.get_mut(parent) else {
            return false;
        };
        match siblings.iter().position(|p| p == path) {
            Some(pos) => {
                siblings.remove(pos);
                true
            }
            None => false,
        }
    }

    fn refresh_has_sub_directory(&mut self, dir: &LogicalPath) {
        let has_sub = self.children_of(dir).iter().any(|c| self.is_directory(c));
        if let Some(meta) = self.store.directory_mut(dir) {
            meta.has_any_sub_directory = has_sub;
        }
    }

    /// Cross-check the child lists against the store
    #[cfg(test)]
    pub(crate) fn check_consistency(&self) -> Result<(), String> {
        let mut listed = 1;
        for (dir, children) in &self.children {
            if !self.is_directory(dir) {
                return Err(format!("child list for non-directory {}", dir));
            }
            for pair in children.windows(2) {
                if compare_entries(&self.store, &pair[0], &pair[1]) != Ordering::Less {
                    return Err(format!("{} and {} out of order", pair[0], pair[1]));
                }
            }
            for child in children {
                if child.parent().as_ref() != Some(dir) {
                    return Err(format!("{} listed under {}", child, dir));
                }
                if !self.store.contains(child) {
                    return Err(format!("{} listed without metadata", child));
                }
            }
            let has_sub = children.iter().any(|c| self.is_directory(c));
            if self.store.directory(dir).map(|d| d.has_any_sub_directory) != Some(has_sub) {
                return Err(format!("stale sub-directory flag on {}", dir));
            }
            listed += children.len();
        }
        if listed != self.store.len() {
            return Err(format!("{} listed paths, {} records", listed, self.store.len()));
        }
        Ok(())
    }
}

/// Directories first, then case-insensitive name, then exact name
fn compare_entries(store: &PathMetadataStore, a: &LogicalPath, b: &LogicalPath) -> Ordering {
    let a_dir = store.directory(a).is_some();
    let b_dir = store.directory(b).is_some();
    b_dir
        .cmp(&a_dir)
        .then_with(|| a.file_name().to_uppercase().cmp(&b.file_name().to_uppercase()))
        .then_with(|| a.file_name().cmp(b.file_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset_manager::FileAssetManager;
    use crate::metadata::AssetTypeId;
    use crate::test_support::{asset_record, write_asset, SCENE, TEXTURE};
    use crate::thumbnails::IconThumbnailProvider;
    use asset_fs::DefaultFileSystem;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn p(path: &str) -> LogicalPath {
        LogicalPath::new(path)
    }

    fn names(tree: &DirectoryTree, dir: &str) -> Vec<String> {
        tree.children_of(&p(dir)).iter().map(|c| c.file_name().to_string()).collect()
    }

    fn sample_tree() -> DirectoryTree {
        let mut tree = DirectoryTree::new(p("/Assets"));
        tree.insert(PathMetadata::directory(p("/Assets/Textures"))).unwrap();
        tree.insert(PathMetadata::directory(p("/Assets/Textures/Trees"))).unwrap();
        tree.insert(asset_record("/Assets/Textures/Trees/oak.zasset", TEXTURE, 1)).unwrap();
        tree.insert(asset_record("/Assets/Textures/tree.zasset", TEXTURE, 2)).unwrap();
        tree.insert(PathMetadata::directory(p("/Assets/Sounds"))).unwrap();
        tree.insert(asset_record("/Assets/main.zasset", SCENE, 3)).unwrap();
        tree
    }

    #[test]
    fn test_children_sorted_directories_first() {
        let mut tree = DirectoryTree::new(p("/Assets"));
        tree.insert(asset_record("/Assets/alpha.zasset", SCENE, 1)).unwrap();
        tree.insert(PathMetadata::directory(p("/Assets/zeta"))).unwrap();
        tree.insert(asset_record("/Assets/Beta.zasset", SCENE, 2)).unwrap();
        tree.insert(PathMetadata::directory(p("/Assets/Alpha"))).unwrap();

        assert_eq!(names(&tree, "/Assets"), vec!["Alpha", "zeta", "alpha.zasset", "Beta.zasset"]);
        assert!(tree.check_consistency().is_ok());
    }

    #[test]
    fn test_sibling_named_ignores_case() {
        let tree = sample_tree();
        assert_eq!(tree.sibling_named(&p("/Assets"), "SOUNDS"), Some(&p("/Assets/Sounds")));
        assert_eq!(tree.sibling_named(&p("/Assets"), "Main.zasset"), Some(&p("/Assets/main.zasset")));
        assert_eq!(tree.sibling_named(&p("/Assets"), "trees"), None);
        assert_eq!(tree.sibling_named(&p("/Assets/Missing"), "x"), None);
    }

    #[test]
    fn test_insert_requires_parent_and_unique_path() {
        let mut tree = sample_tree();
        let orphan = tree.insert(PathMetadata::directory(p("/Assets/Missing/Child")));
        assert!(matches!(orphan, Err(BrowserError::NotFound(ref parent)) if parent.as_str() == "/Assets/Missing"));

        let duplicate = tree.insert(PathMetadata::directory(p("/Assets/Sounds")));
        assert!(matches!(duplicate, Err(BrowserError::NameConflict(_))));

        let under_asset = tree.insert(PathMetadata::directory(p("/Assets/main.zasset/x")));
        assert!(matches!(under_asset, Err(BrowserError::NotFound(_))));
        assert!(tree.check_consistency().is_ok());
    }

    #[test]
    fn test_unknown_directory_has_no_children() {
        let tree = sample_tree();
        assert!(tree.children_of(&p("/Assets/Nope")).is_empty());
        assert!(tree.children_of(&p("/Assets/main.zasset")).is_empty());
        assert!(tree.get(&p("/Assets/Nope")).is_none());
    }

    #[test]
    fn test_remove_directory_recursively() {
        let mut tree = sample_tree();
        let removed = tree.remove(&p("/Assets/Textures")).unwrap();

        assert_eq!(removed.len(), 4);
        assert_eq!(removed[0].path().as_str(), "/Assets/Textures");
        for path in ["/Assets/Textures", "/Assets/Textures/Trees", "/Assets/Textures/Trees/oak.zasset"] {
            assert!(!tree.contains(&p(path)));
        }
        assert_eq!(names(&tree, "/Assets"), vec!["Sounds", "main.zasset"]);
        assert!(tree.check_consistency().is_ok());
    }

    #[test]
    fn test_remove_recomputes_sub_directory_flag() {
        let mut tree = sample_tree();
        let textures = p("/Assets/Textures");
        assert!(tree.store().directory(&textures).unwrap().has_any_sub_directory());

        tree.remove(&p("/Assets/Textures/Trees")).unwrap();
        assert!(!tree.store().directory(&textures).unwrap().has_any_sub_directory());

        tree.remove(&p("/Assets/Sounds")).unwrap();
        tree.remove(&textures).unwrap();
        assert!(!tree.store().directory(&p("/Assets")).unwrap().has_any_sub_directory());
    }

    #[test]
    fn test_remove_missing_path() {
        let mut tree = sample_tree();
        assert!(matches!(tree.remove(&p("/Assets/ghost.zasset")), Err(BrowserError::NotFound(_))));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "Invariant violated")]
    fn test_remove_root_is_fatal_in_debug() {
        let mut tree = sample_tree();
        let _ = tree.remove(&p("/Assets"));
    }

    #[test]
    fn test_rename_directory_rekeys_subtree() {
        let mut tree = sample_tree();
        tree.set_tree_expanded(&p("/Assets/Textures/Trees"), true);

        let moves = tree.rename(&p("/Assets/Textures"), &p("/Assets/Images")).unwrap();
        assert_eq!(moves.len(), 4);
        assert_eq!(moves[0], (p("/Assets/Textures"), p("/Assets/Images")));

        assert!(!tree.contains(&p("/Assets/Textures")));
        assert!(tree.contains(&p("/Assets/Images/Trees/oak.zasset")));
        assert_eq!(names(&tree, "/Assets"), vec!["Images", "Sounds", "main.zasset"]);
        assert_eq!(names(&tree, "/Assets/Images"), vec!["Trees", "tree.zasset"]);

        let trees = tree.store().directory(&p("/Assets/Images/Trees")).unwrap();
        assert!(trees.is_tree_expanded);
        assert_eq!(trees.tree_node_id(), TreeNodeId::for_path(&p("/Assets/Images/Trees")));

        let oak = tree.get(&p("/Assets/Images/Trees/oak.zasset")).unwrap();
        assert_eq!(oak.asset_type_id(), Some(AssetTypeId(TEXTURE)));
        assert!(tree.check_consistency().is_ok());
    }

    #[test]
    fn test_rename_moves_to_new_parent() {
        let mut tree = sample_tree();
        tree.rename(&p("/Assets/Textures/Trees"), &p("/Assets/Sounds/Trees")).unwrap();

        assert_eq!(names(&tree, "/Assets/Textures"), vec!["tree.zasset"]);
        assert_eq!(names(&tree, "/Assets/Sounds"), vec!["Trees"]);
        assert!(!tree.store().directory(&p("/Assets/Textures")).unwrap().has_any_sub_directory());
        assert!(tree.store().directory(&p("/Assets/Sounds")).unwrap().has_any_sub_directory());
        assert!(tree.check_consistency().is_ok());
    }

    #[test]
    fn test_rename_conflict_leaves_tree_untouched() {
        let mut tree = sample_tree();
        let before = tree.descendants(&p("/Assets"));

        let result = tree.rename(&p("/Assets/Textures"), &p("/Assets/Sounds"));
        assert!(matches!(result, Err(BrowserError::NameConflict(_))));
        assert_eq!(tree.descendants(&p("/Assets")), before);

        let into_self = tree.rename(&p("/Assets/Textures"), &p("/Assets/Textures/Trees/Textures"));
        assert!(matches!(into_self, Err(BrowserError::InvalidName(_))));
        assert_eq!(tree.descendants(&p("/Assets")), before);
        assert!(tree.check_consistency().is_ok());
    }

    #[test]
    fn test_rename_asset_resorts_siblings() {
        let mut tree = sample_tree();
        tree.insert(asset_record("/Assets/zebra.zasset", SCENE, 9)).unwrap();
        tree.rename(&p("/Assets/zebra.zasset"), &p("/Assets/aardvark.zasset")).unwrap();

        assert_eq!(names(&tree, "/Assets"), vec!["Sounds", "Textures", "aardvark.zasset", "main.zasset"]);
        assert_eq!(tree.get(&p("/Assets/aardvark.zasset")).unwrap().name(), "aardvark");
    }

    #[test]
    fn test_descendants_pre_order() {
        let tree = sample_tree();
        let all: Vec<String> = tree.descendants(&p("/Assets")).into_iter().map(String::from).collect();
        assert_eq!(
            all,
            vec![
                "/Assets/Sounds",
                "/Assets/Textures",
                "/Assets/Textures/Trees",
                "/Assets/Textures/Trees/oak.zasset",
                "/Assets/Textures/tree.zasset",
                "/Assets/main.zasset",
            ]
        );
    }

    #[test]
    fn test_tree_rows_follow_expansion() {
        let mut tree = sample_tree();
        let rows: Vec<_> = tree.tree_rows().into_iter().map(|r| (r.name, r.depth)).collect();
        assert_eq!(
            rows,
            vec![("Assets".to_string(), 0), ("Sounds".to_string(), 1), ("Textures".to_string(), 1)]
        );

        tree.set_tree_expanded(&p("/Assets/Textures"), true);
        tree.set_tree_expanded(&p("/Assets/Sounds"), true);
        let rows = tree.tree_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3].path.as_str(), "/Assets/Textures/Trees");
        assert_eq!(rows[3].depth, 2);

        let sounds = rows.iter().find(|r| r.name == "Sounds").unwrap();
        assert!(sounds.is_leaf);
        assert!(!sounds.is_expanded);
        assert!(!tree.set_tree_expanded(&p("/Assets/main.zasset"), true));
    }

    #[test]
    fn test_bootstrap_from_disk() {
        let temp = TempDir::new().unwrap();
        let root_dir = temp.path().join("Assets");
        fs::create_dir_all(root_dir.join("Sounds")).unwrap();
        fs::create_dir_all(root_dir.join("Textures")).unwrap();
        write_asset(&root_dir.join("Textures/tree.zasset"), TEXTURE, 11);
        write_asset(&root_dir.join("main.zasset"), SCENE, 12);
        write_asset(&root_dir.join("copy.zasset"), SCENE, 12);
        fs::write(root_dir.join("broken.zasset"), "garbage").unwrap();
        fs::write(root_dir.join("notes.txt"), "not an asset").unwrap();

        let fs_ops = Arc::new(DefaultFileSystem::new());
        let assets = FileAssetManager::new(fs_ops.clone());
        let root = AssetRoot::new(p("/Assets"), &root_dir);
        let tree = DirectoryTree::bootstrap(&root, ".zasset", fs_ops.as_ref(), &assets, &IconThumbnailProvider).unwrap();

        // copy.zasset sorts first and keeps handle 12; main.zasset is the duplicate
        assert_eq!(names(&tree, "/Assets"), vec!["Sounds", "Textures", "copy.zasset"]);
        assert_eq!(names(&tree, "/Assets/Textures"), vec!["tree.zasset"]);
        assert_eq!(tree.len(), 5);
        assert!(tree.get(&p("/Assets/Textures/tree.zasset")).unwrap().thumbnail.is_some());
        assert!(tree.check_consistency().is_ok());
    }

    #[test]
    fn test_bootstrap_missing_root() {
        let temp = TempDir::new().unwrap();
        let fs_ops = Arc::new(DefaultFileSystem::new());
        let assets = FileAssetManager::new(fs_ops.clone());
        let root = AssetRoot::new(p("/Assets"), temp.path().join("nowhere"));

        let result = DirectoryTree::bootstrap(&root, ".zasset", fs_ops.as_ref(), &assets, &IconThumbnailProvider);
        assert!(matches!(result, Err(BrowserError::Io(_))));
    }
}
