//! File name validation and sanitization
//!
//! Names typed into the rename editor are validated before anything touches
//! the disk; names of imported files are sanitized instead.

use crate::{FsError, Result};

/// Mode for sanitizing filenames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeMode {
    /// Replace forbidden characters with full-width equivalents
    FullWidth,
    /// Replace forbidden characters with underscores
    Underscore,
}

/// Reserved device names on Windows
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL",
    "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8", "COM9",
    "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Characters that can never appear in an asset or folder name
const FORBIDDEN_CHARS: &[(char, char)] = &[
    ('\\', '＼'),
    ('/', '／'),
    (':', '：'),
    ('*', '＊'),
    ('?', '？'),
    ('"', '＂'),
    ('<', '＜'),
    ('>', '＞'),
    ('|', '｜'),
];

/// Sanitize a filename so it can be used as an asset name
pub fn sanitize_filename(name: &str, mode: SanitizeMode) -> String {
    let mut result = String::with_capacity(name.len());

    for c in name.chars() {
        match get_replacement(c, mode) {
            Some(replacement) => result.push(replacement),
            None => result.push(c),
        }
    }

    if is_reserved(&result) {
        result = format!("_{}", result);
    }

    // Trailing dots and spaces are stripped by some file systems
    while result.ends_with('.') || result.ends_with(' ') {
        result.pop();
    }

    if result.is_empty() {
        result = "_unnamed".to_string();
    }

    result
}

fn get_replacement(c: char, mode: SanitizeMode) -> Option<char> {
    if let Some((_, fullwidth)) = FORBIDDEN_CHARS.iter().find(|(forbidden, _)| *forbidden == c) {
        return Some(match mode {
            SanitizeMode::FullWidth => *fullwidth,
            SanitizeMode::Underscore => '_',
        });
    }

    if c.is_control() {
        return Some('_');
    }

    None
}

fn is_reserved(name: &str) -> bool {
    let name_upper = name.to_uppercase();
    let base_name = name_upper.split('.').next().unwrap_or("");
    RESERVED_NAMES.contains(&base_name)
}

/// Validate a user-typed name, returning the reason it is unusable
pub fn validate_file_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(FsError::InvalidName("name is empty".to_string()));
    }

    if name == "." || name == ".." {
        return Err(FsError::InvalidName(format!("\"{}\" is not a valid name", name)));
    }

    if let Some(c) = name
        .chars()
        .find(|c| c.is_control() || FORBIDDEN_CHARS.iter().any(|(f, _)| f == c))
    {
        return Err(FsError::InvalidName(format!("\"{}\" contains forbidden character {:?}", name, c)));
    }

    if is_reserved(name) {
        return Err(FsError::InvalidName(format!("\"{}\" is a reserved name", name)));
    }

    if name.ends_with('.') || name.ends_with(' ') {
        return Err(FsError::InvalidName(format!("\"{}\" ends with a dot or space", name)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_separator() {
        assert_eq!(sanitize_filename("tree/oak.png", SanitizeMode::Underscore), "tree_oak.png");
        assert_eq!(sanitize_filename("tree:01.png", SanitizeMode::FullWidth), "tree：01.png");
    }

    #[test]
    fn test_sanitize_reserved_and_trailing() {
        assert_eq!(sanitize_filename("CON.png", SanitizeMode::Underscore), "_CON.png");
        assert_eq!(sanitize_filename("rock. ", SanitizeMode::Underscore), "rock");
        assert_eq!(sanitize_filename("...", SanitizeMode::Underscore), "_unnamed");
    }

    #[test]
    fn test_validate() {
        assert!(validate_file_name("NewFolder").is_ok());
        assert!(validate_file_name("tree.png").is_ok());
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name("   ").is_err());
        assert!(validate_file_name("..").is_err());
        assert!(validate_file_name("a/b").is_err());
        assert!(validate_file_name("aux").is_err());
        assert!(validate_file_name("trailing.").is_err());
        assert!(matches!(validate_file_name("x|y"), Err(FsError::InvalidName(_))));
    }
}
