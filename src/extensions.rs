//! Extension Registry
//!
//! Decides which file extensions count as "launchable". The crawler only
//! turns files with a known extension into catalog items.

use std::collections::HashSet;
use std::path::Path;

/// Launchable types registered on Windows hosts
const WINDOWS_EXTENSIONS: &[&str] = &[
    "exe",
    "lnk",
    "url",
    "bat",
    "cmd",
    "msc",
    "cpl",
    "appref-ms",
];

/// Launchable types on macOS hosts
const MACOS_EXTENSIONS: &[&str] = &["app", "command", "tool", "webloc", "url"];

/// Launchable types on Linux and other unix hosts
const UNIX_EXTENSIONS: &[&str] = &["desktop", "appimage", "sh", "url"];

/// Lowercase and strip one leading dot. Returns None for blank input.
pub fn normalize_extension(ext: &str) -> Option<String> {
    let trimmed = ext.trim();
    let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if bare.is_empty() {
        return None;
    }
    Some(bare.to_lowercase())
}

/// Case-insensitive set of known extensions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionRegistry {
    known: HashSet<String>,
}

impl ExtensionRegistry {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = ExtensionRegistry::default();
        registry.extend(extensions);
        registry
    }

    /// The host's launchable file types
    pub fn from_host() -> Self {
        let defaults: &[&str] = if cfg!(target_os = "windows") {
            WINDOWS_EXTENSIONS
        } else if cfg!(target_os = "macos") {
            MACOS_EXTENSIONS
        } else {
            UNIX_EXTENSIONS
        };
        Self::new(defaults.iter().copied())
    }

    pub fn extend<I, S>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.known.extend(
            extensions
                .into_iter()
                .filter_map(|ext| normalize_extension(ext.as_ref())),
        );
    }

    /// `".EXE"`, `"exe"` and `"Exe"` are all the same extension
    pub fn is_known_extension(&self, ext: &str) -> bool {
        normalize_extension(ext)
            .map(|normalized| self.known.contains(&normalized))
            .unwrap_or(false)
    }

    /// Test a path by its extension; paths without one are never known
    pub fn is_known_path(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| self.is_known_extension(&ext.to_string_lossy()))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(".EXE"), Some("exe".to_string()));
        assert_eq!(normalize_extension("Lnk"), Some("lnk".to_string()));
        assert_eq!(normalize_extension(" .url "), Some("url".to_string()));
        assert_eq!(normalize_extension("."), None);
        assert_eq!(normalize_extension(""), None);
    }

    #[test]
    fn test_lookup_is_case_and_dot_insensitive() {
        let registry = ExtensionRegistry::new([".exe", "LNK"]);
        assert!(registry.is_known_extension("exe"));
        assert!(registry.is_known_extension(".EXE"));
        assert!(registry.is_known_extension("Lnk"));
        assert!(registry.is_known_extension(".lnk"));
        assert!(!registry.is_known_extension("txt"));
        assert!(!registry.is_known_extension(""));
        assert!(!registry.is_known_extension("."));
    }

    #[test]
    fn test_is_known_path() {
        let registry = ExtensionRegistry::new(["exe"]);
        assert!(registry.is_known_path(Path::new("/apps/Notepad.EXE")));
        assert!(!registry.is_known_path(Path::new("/apps/readme.txt")));
        assert!(!registry.is_known_path(Path::new("/apps/Makefile")));
        assert!(!registry.is_known_path(Path::new("/apps/.exe")));
    }

    #[test]
    fn test_host_registry_is_not_empty() {
        let registry = ExtensionRegistry::from_host();
        assert!(!registry.is_empty());
        assert!(registry.is_known_extension("url"));
    }

    #[test]
    fn test_extend_adds_user_extensions() {
        let mut registry = ExtensionRegistry::new(["exe"]);
        registry.extend(vec![".JAR".to_string()]);
        assert!(registry.is_known_extension("jar"));
        assert_eq!(registry.len(), 2);
    }
}
