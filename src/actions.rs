//! Action contract
//!
//! Actions are registered with the store as catalog items. The engine only
//! reads `name`, `details` and `boost_identifier`; running an action and
//! drawing its icon are the front-end's business.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::indexable::{IndexableItem, ItemKind};

/// Where the UI should take an icon from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconHint {
    /// No icon
    None,
    /// Shell icon of a file
    File(PathBuf),
    /// Favicon of a URL
    Url(String),
    /// Named icon from the UI's own set
    Named(String),
}

pub trait Action: Send + Sync {
    fn name(&self) -> &str;

    fn details(&self) -> Option<&str> {
        None
    }

    /// Key learned boosts are stored under
    fn boost_identifier(&self) -> &str {
        self.name()
    }

    fn icon(&self) -> IconHint {
        IconHint::None
    }

    /// Parameterless invocation. `None` when the action has none.
    fn run(&self) -> Option<Result<()>> {
        None
    }

    /// Whether [`Action::run_with`] takes items of this kind
    fn accepts(&self, _kind: ItemKind) -> bool {
        false
    }

    /// Invocation on an item. `None` when the item's kind isn't accepted.
    fn run_with(&self, _item: &IndexableItem) -> Option<Result<()>> {
        None
    }
}

/// Opens a site, or a search on it for a free-text item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebSearchAction {
    name: String,
    home_url: String,
    /// Query text is appended URL-encoded
    search_url_prefix: String,
}

impl WebSearchAction {
    pub fn new(
        name: impl Into<String>,
        home_url: impl Into<String>,
        search_url_prefix: impl Into<String>,
    ) -> Self {
        WebSearchAction {
            name: name.into(),
            home_url: home_url.into(),
            search_url_prefix: search_url_prefix.into(),
        }
    }

    pub fn wikipedia() -> Self {
        Self::new(
            "Wikipedia search",
            "https://wikipedia.org/",
            "https://wikipedia.org/wiki/Special:Search?search=",
        )
    }

    pub fn home_url(&self) -> &str {
        &self.home_url
    }

    pub fn search_url(&self, text: &str) -> String {
        format!("{}{}", self.search_url_prefix, urlencoding::encode(text))
    }
}

impl Action for WebSearchAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn icon(&self) -> IconHint {
        IconHint::Url(self.home_url.clone())
    }

    fn run(&self) -> Option<Result<()>> {
        info!(action = %self.name, url = %self.home_url, "Opening site");
        Some(open::that(&self.home_url).map_err(Into::into))
    }

    fn accepts(&self, kind: ItemKind) -> bool {
        kind == ItemKind::Text
    }

    fn run_with(&self, item: &IndexableItem) -> Option<Result<()>> {
        let IndexableItem::Text(text) = item else {
            return None;
        };
        let url = self.search_url(&text.text);
        info!(action = %self.name, url = %url, "Opening search");
        Some(open::that(&url).map_err(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Minimal;

    impl Action for Minimal {
        fn name(&self) -> &str {
            "Lock screen"
        }
    }

    #[test]
    fn test_defaults_make_invocations_optional() {
        let action = Minimal;
        assert_eq!(action.boost_identifier(), "Lock screen");
        assert!(action.details().is_none());
        assert_eq!(action.icon(), IconHint::None);
        assert!(action.run().is_none());
        assert!(!action.accepts(ItemKind::Text));
        assert!(action.run_with(&IndexableItem::text("x")).is_none());
    }

    #[test]
    fn test_search_url_escapes_text() {
        let action = WebSearchAction::wikipedia();
        assert_eq!(
            action.search_url("Rust (language) & co"),
            "https://wikipedia.org/wiki/Special:Search?search=Rust%20%28language%29%20%26%20co"
        );
    }

    #[test]
    fn test_web_search_only_takes_text_items() {
        let action = WebSearchAction::wikipedia();
        assert!(action.accepts(ItemKind::Text));
        assert!(!action.accepts(ItemKind::File));
        assert!(action.run_with(&IndexableItem::file("/apps/x.exe")).is_none());
    }
}
