//! LogicalPath - the identity of a directory or asset inside the project
//!
//! A logical path is a normalized, forward-slash delimited string such as
//! `/Assets/Textures/tree.zasset`. Two paths are equal iff their normalized
//! strings are equal.

use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh3::xxh3_64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LogicalPath(String);

impl LogicalPath {
    /// Create a logical path, normalizing separators and `.`/`..` segments
    pub fn new<S: AsRef<str>>(path: S) -> Self {
        let mut segments: Vec<&str> = Vec::new();
        for segment in path.as_ref().split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }

        let mut normalized = String::with_capacity(path.as_ref().len() + 1);
        for segment in &segments {
            normalized.push('/');
            normalized.push_str(segment);
        }
        if normalized.is_empty() {
            normalized.push('/');
        }

        Self(normalized)
    }

    /// The `/` path above every project prefix
    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Final segment, including any extension
    pub fn file_name(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// Final segment without its last extension (`tree.png.zasset` -> `tree.png`)
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        }
    }

    /// Last extension without the dot
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(idx) if idx > 0 => Some(&name[idx + 1..]),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<LogicalPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => None,
        }
    }

    /// Append a relative path (may contain several segments)
    pub fn join<S: AsRef<str>>(&self, name: S) -> LogicalPath {
        Self::new(format!("{}/{}", self.0, name.as_ref()))
    }

    /// Component-aware prefix test: `/Assets/Tex` does not start with `/Assets/Te`
    pub fn starts_with(&self, prefix: &LogicalPath) -> bool {
        if prefix.is_root() || self == prefix {
            return true;
        }
        self.0.len() > prefix.0.len()
            && self.0.starts_with(&prefix.0)
            && self.0.as_bytes()[prefix.0.len()] == b'/'
    }

    /// Replace the `old` prefix with `new`, keeping the relative suffix
    pub fn rebase(&self, old: &LogicalPath, new: &LogicalPath) -> Option<LogicalPath> {
        if !self.starts_with(old) {
            return None;
        }
        let suffix = if old.is_root() {
            &self.0[..]
        } else {
            &self.0[old.0.len()..]
        };
        Some(Self::new(format!("{}{}", new.0, suffix)))
    }

    /// Iterate this path, then each parent up to `/`
    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: Some(self.clone()),
        }
    }

    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    pub fn depth(&self) -> usize {
        self.components().count()
    }

    /// Stable hash of the path, used as an id in persisted UI state
    pub fn node_id(&self) -> u64 {
        xxh3_64(self.0.as_bytes())
    }
}

/// Iterator returned by [`LogicalPath::ancestors`]
pub struct Ancestors {
    next: Option<LogicalPath>,
}

impl Iterator for Ancestors {
    type Item = LogicalPath;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}

impl From<String> for LogicalPath {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl From<&str> for LogicalPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<LogicalPath> for String {
    fn from(path: LogicalPath) -> Self {
        path.0
    }
}

impl AsRef<str> for LogicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(LogicalPath::new("Assets\\Textures//tree.zasset/").as_str(), "/Assets/Textures/tree.zasset");
        assert_eq!(LogicalPath::new("/Assets/./Sounds/../Textures").as_str(), "/Assets/Textures");
        assert_eq!(LogicalPath::new("").as_str(), "/");
        assert_eq!(LogicalPath::new("/Assets"), LogicalPath::new("Assets/"));
    }

    #[test]
    fn test_name_parts() {
        let path = LogicalPath::new("/Assets/Textures/tree.png.zasset");
        assert_eq!(path.file_name(), "tree.png.zasset");
        assert_eq!(path.stem(), "tree.png");
        assert_eq!(path.extension(), Some("zasset"));

        let dir = LogicalPath::new("/Assets/NewFolder");
        assert_eq!(dir.stem(), "NewFolder");
        assert_eq!(dir.extension(), None);
    }

    #[test]
    fn test_parent_chain() {
        let path = LogicalPath::new("/Assets/Textures/tree.zasset");
        let chain: Vec<String> = path.ancestors().map(String::from).collect();
        assert_eq!(chain, vec!["/Assets/Textures/tree.zasset", "/Assets/Textures", "/Assets", "/"]);
        assert_eq!(LogicalPath::root().parent(), None);
    }

    #[test]
    fn test_starts_with_is_component_aware() {
        let textures = LogicalPath::new("/Assets/Textures");
        assert!(LogicalPath::new("/Assets/Textures/a.zasset").starts_with(&textures));
        assert!(textures.starts_with(&textures));
        assert!(!LogicalPath::new("/Assets/TexturesOld").starts_with(&textures));
    }

    #[test]
    fn test_rebase() {
        let old = LogicalPath::new("/Assets/Textures");
        let new = LogicalPath::new("/Assets/Images");
        let path = LogicalPath::new("/Assets/Textures/Trees/oak.zasset");
        assert_eq!(path.rebase(&old, &new), Some(LogicalPath::new("/Assets/Images/Trees/oak.zasset")));
        assert_eq!(old.rebase(&old, &new), Some(new.clone()));
        assert_eq!(LogicalPath::new("/Assets/Sounds").rebase(&old, &new), None);
    }

    #[test]
    fn test_node_id_consistency() {
        let a = LogicalPath::new("/Assets/Textures");
        let b = LogicalPath::new("Assets\\Textures");
        assert_eq!(a.node_id(), b.node_id());
        assert_ne!(a.node_id(), LogicalPath::new("/Assets/Sounds").node_id());
    }
}
