//! External item sources
//!
//! An [`ItemSource`] produces one named batch of catalog items. The store
//! collects a batch outside its lock and swaps it in whole.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ResultExt;
use crate::indexable::{BookmarkItem, IndexableItem};

/// Anything that can hand the store a batch of items
pub trait ItemSource: Send + Sync {
    /// Batch key; re-indexing a source with the same name replaces its batch
    fn name(&self) -> &str;

    /// Fully materialized items. Failures are absorbed and logged.
    fn collect(&self) -> Vec<IndexableItem>;
}

// ============================================================================
// Bookmark tree
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct BookmarkFile {
    #[serde(default)]
    roots: BTreeMap<String, BookmarkNode>,
}

#[derive(Debug, Default, Deserialize)]
struct BookmarkNode {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    node_type: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    children: Vec<BookmarkNode>,
}

impl BookmarkFile {
    /// Pre-order walk: a node before its children, children in order
    fn flatten(&self) -> Vec<&BookmarkNode> {
        let mut nodes = Vec::new();
        let mut stack: Vec<&BookmarkNode> = self.roots.values().rev().collect();

        while let Some(node) = stack.pop() {
            nodes.push(node);
            stack.extend(node.children.iter().rev());
        }

        nodes
    }
}

/// Bookmarks from a browser's JSON bookmark file (Chromium layout)
#[derive(Debug, Clone)]
pub struct BookmarkFileSource {
    name: String,
    path: PathBuf,
    /// Shown as the details line of every item, e.g. "Chrome bookmark"
    label: String,
}

impl BookmarkFileSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        BookmarkFileSource {
            name: name.into(),
            path: path.into(),
            label: label.into(),
        }
    }

    /// Chrome's default profile on this host, if a home directory is known
    pub fn chrome_default() -> Option<Self> {
        let path = if cfg!(target_os = "windows") {
            dirs::data_local_dir()?.join("Google/Chrome/User Data/Default/Bookmarks")
        } else if cfg!(target_os = "macos") {
            dirs::data_dir()?.join("Google/Chrome/Default/Bookmarks")
        } else {
            dirs::config_dir()?.join("google-chrome/Default/Bookmarks")
        };
        Some(Self::new("chrome-bookmarks", path, "Chrome bookmark"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_tree(&self) -> Option<BookmarkFile> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No bookmark file");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read bookmark file");
                return None;
            }
        };

        serde_json::from_str(&content).skip_on_err(self.path.display())
    }
}

impl ItemSource for BookmarkFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn collect(&self) -> Vec<IndexableItem> {
        let Some(tree) = self.read_tree() else {
            return Vec::new();
        };

        tree.flatten()
            .into_iter()
            .filter(|node| node.node_type.eq_ignore_ascii_case("url"))
            .filter_map(|node| {
                let url = node.url.as_deref()?;
                Some(IndexableItem::Bookmark(BookmarkItem::new(
                    node.name.as_str(),
                    url,
                    self.label.as_str(),
                )))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BOOKMARKS: &str = r#"{
        "checksum": "abc",
        "roots": {
            "bookmark_bar": {
                "name": "Bookmarks bar",
                "type": "folder",
                "children": [
                    {"name": "Docs", "type": "url", "url": "https://docs.rs"},
                    {
                        "name": "Rust",
                        "type": "folder",
                        "children": [
                            {"name": "Book", "type": "URL", "url": "https://doc.rust-lang.org/book"}
                        ]
                    },
                    {"name": "Crates", "type": "url", "url": "https://crates.io"}
                ]
            },
            "other": {
                "name": "Other bookmarks",
                "type": "folder",
                "children": [
                    {"name": "News", "type": "url", "url": "https://news.example"},
                    {"name": "Broken", "type": "url"}
                ]
            }
        },
        "version": 1
    }"#;

    fn names(items: &[IndexableItem]) -> Vec<&str> {
        items.iter().map(|i| i.name()).collect()
    }

    #[test]
    fn test_flattens_depth_first_and_keeps_urls() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Bookmarks");
        fs::write(&path, BOOKMARKS).unwrap();

        let source = BookmarkFileSource::new("chrome", &path, "Chrome bookmark");
        let items = source.collect();

        assert_eq!(names(&items), vec!["Docs", "Book", "Crates", "News"]);
        assert_eq!(items[1].boost_identifier(), "https://doc.rust-lang.org/book");
        assert_eq!(items[0].details(), Some("Chrome bookmark"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let source = BookmarkFileSource::new("chrome", dir.path().join("nope"), "Chrome bookmark");
        assert!(source.collect().is_empty());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Bookmarks");
        fs::write(&path, "{\"roots\": [1, 2").unwrap();

        let source = BookmarkFileSource::new("chrome", &path, "Chrome bookmark");
        assert!(source.collect().is_empty());
    }

    #[test]
    fn test_file_without_roots_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Bookmarks");
        fs::write(&path, "{}").unwrap();

        let source = BookmarkFileSource::new("chrome", &path, "Chrome bookmark");
        assert!(source.collect().is_empty());
    }
}
