//! Text/type filters and the filtered-view cache

use asset_fs::LogicalPath;

use crate::metadata::{AssetTypeId, PathMetadata};
use crate::mirror::DirectoryTree;

/// Space-separated words; `-word` excludes. Matching ignores case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFilter {
    input: String,
    include: Vec<String>,
    exclude: Vec<String>,
}

impl TextFilter {
    pub fn new(input: &str) -> Self {
        let mut filter = Self::default();
        filter.set(input);
        filter
    }

    /// Replace the filter text; returns whether it changed
    pub fn set(&mut self, input: &str) -> bool {
        if self.input == input {
            return false;
        }

        self.input = input.to_string();
        self.include.clear();
        self.exclude.clear();
        for word in input.split_whitespace() {
            match word.strip_prefix('-') {
                Some("") => {}
                Some(negated) => self.exclude.push(negated.to_lowercase()),
                None => self.include.push(word.to_lowercase()),
            }
        }
        true
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_active(&self) -> bool {
        !self.include.is_empty() || !self.exclude.is_empty()
    }

    pub fn clear(&mut self) -> bool {
        self.set("")
    }

    /// Every include word must be present and no exclude word may be
    pub fn passes(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.include.iter().all(|w| name.contains(w.as_str())) && !self.exclude.iter().any(|w| name.contains(w.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeFilterEntry {
    pub type_id: AssetTypeId,
    pub type_name: String,
    pub active: bool,
}

/// Per-asset-type toggles; with none active every type passes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilter {
    entries: Vec<TypeFilterEntry>,
}

impl TypeFilter {
    pub fn new<I: IntoIterator<Item = (AssetTypeId, String)>>(types: I) -> Self {
        let entries = types
            .into_iter()
            .map(|(type_id, type_name)| TypeFilterEntry {
                type_id,
                type_name,
                active: false,
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[TypeFilterEntry] {
        &self.entries
    }

    /// Toggle one type; returns whether anything changed
    pub fn set_active(&mut self, type_id: AssetTypeId, active: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.type_id == type_id) {
            Some(entry) if entry.active != active => {
                entry.active = active;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.entries.iter().any(|e| e.active)
    }

    pub fn active_types(&self) -> Vec<AssetTypeId> {
        self.entries.iter().filter(|e| e.active).map(|e| e.type_id).collect()
    }

    pub fn passes(&self, type_id: AssetTypeId) -> bool {
        !self.is_active() || self.entries.iter().any(|e| e.active && e.type_id == type_id)
    }

    pub fn clear(&mut self) -> bool {
        let mut changed = false;
        for entry in &mut self.entries {
            changed |= entry.active;
            entry.active = false;
        }
        changed
    }
}

/// Whether a record shows up in a filtered view. Directories never do.
pub fn matches_filters(record: &PathMetadata, text: &TextFilter, types: &TypeFilter) -> bool {
    match record.asset_type_id() {
        Some(type_id) => types.passes(type_id) && text.passes(record.name()),
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewKey {
    scope: LogicalPath,
    text: String,
    types: Vec<AssetTypeId>,
    recursive: bool,
}

/// Last computed filtered view, reused while its inputs are unchanged
#[derive(Debug, Default)]
pub struct FilterCache {
    key: Option<ViewKey>,
    paths: Vec<LogicalPath>,
    force_refresh: bool,
    recompute_count: u64,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filtered asset paths for `scope`, recomputed only when the inputs
    /// changed or the cache was invalidated
    pub fn get_view(
        &mut self,
        tree: &DirectoryTree,
        scope: &LogicalPath,
        text: &TextFilter,
        types: &TypeFilter,
        recursive: bool,
    ) -> &[LogicalPath] {
        let key = ViewKey {
            scope: scope.clone(),
            text: text.input().to_string(),
            types: types.active_types(),
            recursive,
        };

        if self.force_refresh || self.key.as_ref() != Some(&key) {
            let candidates = if recursive {
                tree.descendants(scope)
            } else {
                tree.children_of(scope).to_vec()
            };
            self.paths = candidates
                .into_iter()
                .filter(|p| tree.get(p).map(|r| matches_filters(r, text, types)).unwrap_or(false))
                .collect();
            self.key = Some(key);
            self.force_refresh = false;
            self.recompute_count += 1;
            tracing::trace!("Filtered view recomputed for {}: {} paths", scope, self.paths.len());
        }

        &self.paths
    }

    /// Force the next [`FilterCache::get_view`] to recompute
    pub fn invalidate(&mut self) {
        self.force_refresh = true;
    }

    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }
}
