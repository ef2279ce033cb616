//! What a store indexes and where it keeps its files

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::extensions::ExtensionRegistry;
use crate::matcher::MatcherConfig;
use crate::sources::{BookmarkFileSource, ItemSource};

pub struct StoreOptions {
    /// Holds `config.json` and `index.json`
    pub data_dir: PathBuf,
    /// Crawled on every start, before the user's configured paths
    pub roots: Vec<PathBuf>,
    /// Non-filesystem sources, indexed after all roots
    pub sources: Vec<Arc<dyn ItemSource>>,
    /// Base launchable types; `config.json` extensions are added on start
    pub extensions: ExtensionRegistry,
    pub matcher: MatcherConfig,
}

impl StoreOptions {
    /// No roots or extra sources, host extensions
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        StoreOptions {
            data_dir: data_dir.into(),
            roots: Vec::new(),
            sources: Vec::new(),
            extensions: ExtensionRegistry::from_host(),
            matcher: MatcherConfig::default(),
        }
    }

    /// The host's start menus / application folders and Chrome's bookmarks
    pub fn for_host(data_dir: impl Into<PathBuf>) -> Self {
        let mut options = Self::new(data_dir);
        options.roots = host_roots();
        if let Some(bookmarks) = BookmarkFileSource::chrome_default() {
            options.sources.push(Arc::new(bookmarks));
        }
        options
    }

    pub fn with_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.roots
            .extend(roots.into_iter().map(|r| r.as_ref().to_path_buf()));
        self
    }

    pub fn with_source(mut self, source: Arc<dyn ItemSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_extensions(mut self, extensions: ExtensionRegistry) -> Self {
        self.extensions = extensions;
        self
    }
}

impl fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sources: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("StoreOptions")
            .field("data_dir", &self.data_dir)
            .field("roots", &self.roots)
            .field("sources", &sources)
            .field("extensions", &self.extensions.len())
            .field("matcher", &self.matcher)
            .finish()
    }
}

#[cfg(target_os = "windows")]
fn host_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    // All-users start menu
    if let Some(program_data) = std::env::var_os("PROGRAMDATA") {
        roots.push(PathBuf::from(program_data).join(r"Microsoft\Windows\Start Menu"));
    }
    // Per-user start menu and recent items live under roaming AppData
    if let Some(appdata) = dirs::data_dir() {
        roots.push(appdata.join(r"Microsoft\Windows\Start Menu"));
        roots.push(appdata.join(r"Microsoft\Windows\Recent"));
    }
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join("Favorites"));
    }
    roots.extend(dirs::desktop_dir());
    roots
}

#[cfg(target_os = "macos")]
fn host_roots() -> Vec<PathBuf> {
    let mut roots = vec![
        PathBuf::from("/Applications"),
        PathBuf::from("/System/Applications"),
    ];
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join("Applications"));
    }
    roots
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn host_roots() -> Vec<PathBuf> {
    let mut roots = vec![PathBuf::from("/usr/share/applications")];
    if let Some(data) = dirs::data_dir() {
        roots.push(data.join("applications"));
    }
    roots.extend(dirs::desktop_dir());
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "windows")]
    #[test]
    fn test_windows_roots_include_favorites_and_recent() {
        let roots = host_roots();
        assert!(roots.iter().any(|r| r.ends_with("Favorites")));
        assert!(roots.iter().any(|r| r.ends_with(r"Microsoft\Windows\Recent")));
        assert!(roots.iter().any(|r| r.ends_with(r"Microsoft\Windows\Start Menu")));
    }

    #[test]
    fn test_host_options_have_roots_and_bookmarks() {
        let options = StoreOptions::for_host("/tmp/catapult-data");
        assert!(!options.roots.is_empty());
        assert!(options.sources.iter().all(|s| s.name() == "chrome-bookmarks"));
        assert!(!options.extensions.is_empty());
    }
}
