//! Indexable items
//!
//! Every catalog entry is an [`IndexableItem`]. The variants share exactly two
//! capabilities, a display `name` and a stable `boost_identifier`; anything
//! else a variant needs lives in its own payload.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::actions::{Action, IconHint};
use crate::error::{IndexError, Result};

/// A file found by the crawler. Boosts key on the full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    full_path: PathBuf,
    name: String,
    full_path_text: String,
}

impl FileItem {
    pub fn new(full_path: impl Into<PathBuf>) -> Self {
        let full_path = full_path.into();
        let name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let full_path_text = full_path.to_string_lossy().to_string();
        FileItem {
            full_path,
            name,
            full_path_text,
        }
    }

    pub fn path(&self) -> &Path {
        &self.full_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A registered action. Shares the action itself, not a copy.
#[derive(Clone)]
pub struct ActionItem {
    pub action: Arc<dyn Action>,
}

impl ActionItem {
    pub fn new(action: Arc<dyn Action>) -> Self {
        ActionItem { action }
    }
}

impl fmt::Debug for ActionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionItem")
            .field("name", &self.action.name())
            .field("boost_identifier", &self.action.boost_identifier())
            .finish()
    }
}

/// An entry from an external source such as a browser's bookmarks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkItem {
    pub name: String,
    pub url: String,
    /// Where it came from, e.g. "Chrome bookmark"
    pub source: String,
}

impl BookmarkItem {
    pub fn new(name: impl Into<String>, url: impl Into<String>, source: impl Into<String>) -> Self {
        BookmarkItem {
            name: name.into(),
            url: url.into(),
            source: source.into(),
        }
    }
}

/// Free text standing in for an item, e.g. the query handed to a search action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextItem {
    pub text: String,
}

impl TextItem {
    pub fn new(text: impl Into<String>) -> Self {
        TextItem { text: text.into() }
    }
}

/// Which variant an item is, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    File,
    Action,
    Bookmark,
    Text,
}

#[derive(Debug, Clone)]
pub enum IndexableItem {
    File(FileItem),
    Action(ActionItem),
    Bookmark(BookmarkItem),
    Text(TextItem),
}

impl IndexableItem {
    pub fn file(full_path: impl Into<PathBuf>) -> Self {
        IndexableItem::File(FileItem::new(full_path))
    }

    pub fn action(action: Arc<dyn Action>) -> Self {
        IndexableItem::Action(ActionItem::new(action))
    }

    pub fn text(text: impl Into<String>) -> Self {
        IndexableItem::Text(TextItem::new(text))
    }

    pub fn name(&self) -> &str {
        match self {
            IndexableItem::File(f) => &f.name,
            IndexableItem::Action(a) => a.action.name(),
            IndexableItem::Bookmark(b) => &b.name,
            IndexableItem::Text(t) => &t.text,
        }
    }

    pub fn boost_identifier(&self) -> &str {
        match self {
            IndexableItem::File(f) => &f.full_path_text,
            IndexableItem::Action(a) => a.action.boost_identifier(),
            IndexableItem::Bookmark(b) => &b.url,
            IndexableItem::Text(t) => &t.text,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            IndexableItem::File(_) => ItemKind::File,
            IndexableItem::Action(_) => ItemKind::Action,
            IndexableItem::Bookmark(_) => ItemKind::Bookmark,
            IndexableItem::Text(_) => ItemKind::Text,
        }
    }

    /// Secondary line for the UI
    pub fn details(&self) -> Option<&str> {
        match self {
            IndexableItem::File(f) => Some(&f.full_path_text),
            IndexableItem::Action(a) => a.action.details(),
            IndexableItem::Bookmark(b) => Some(&b.source),
            IndexableItem::Text(_) => None,
        }
    }

    /// What the UI should resolve an icon from
    pub fn icon(&self) -> IconHint {
        match self {
            IndexableItem::File(f) => IconHint::File(f.full_path.clone()),
            IndexableItem::Action(a) => a.action.icon(),
            IndexableItem::Bookmark(b) => IconHint::Url(b.url.clone()),
            IndexableItem::Text(_) => IconHint::None,
        }
    }

    /// Registration contract: a non-blank name and boost identifier
    pub fn validate(&self) -> Result<()> {
        if self.name().trim().is_empty() {
            return Err(IndexError::InvalidItem(format!(
                "{:?} item with identifier '{}' has an empty name",
                self.kind(),
                self.boost_identifier()
            )));
        }
        if self.boost_identifier().trim().is_empty() {
            return Err(IndexError::InvalidItem(format!(
                "{:?} item '{}' has an empty boost identifier",
                self.kind(),
                self.name()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::WebSearchAction;

    #[test]
    fn test_file_item_uses_file_name_and_full_path() {
        let item = IndexableItem::file("/apps/Notepad.exe");
        assert_eq!(item.name(), "Notepad.exe");
        assert_eq!(item.boost_identifier(), "/apps/Notepad.exe");
        assert_eq!(item.kind(), ItemKind::File);
        assert_eq!(item.details(), Some("/apps/Notepad.exe"));
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_text_item_identifies_by_its_text() {
        let item = IndexableItem::text("rust borrow checker");
        assert_eq!(item.name(), "rust borrow checker");
        assert_eq!(item.boost_identifier(), "rust borrow checker");
        assert_eq!(item.icon(), IconHint::None);
    }

    #[test]
    fn test_bookmark_identifies_by_url() {
        let item = IndexableItem::Bookmark(BookmarkItem::new(
            "Docs",
            "https://docs.rs",
            "Chrome bookmark",
        ));
        assert_eq!(item.name(), "Docs");
        assert_eq!(item.boost_identifier(), "https://docs.rs");
        assert_eq!(item.details(), Some("Chrome bookmark"));
    }

    #[test]
    fn test_action_item_delegates_to_action() {
        let item = IndexableItem::action(Arc::new(WebSearchAction::wikipedia()));
        assert_eq!(item.name(), "Wikipedia search");
        assert_eq!(item.boost_identifier(), "Wikipedia search");
        assert_eq!(item.kind(), ItemKind::Action);
        assert!(format!("{:?}", item).contains("Wikipedia search"));
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        assert!(matches!(
            IndexableItem::text("  ").validate(),
            Err(IndexError::InvalidItem(_))
        ));
        let no_url = IndexableItem::Bookmark(BookmarkItem::new("Docs", "", "Chrome bookmark"));
        assert!(matches!(no_url.validate(), Err(IndexError::InvalidItem(_))));
        assert!(IndexableItem::file("/").validate().is_err());
    }
}
