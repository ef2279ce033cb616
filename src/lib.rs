//! Catapult - a local desktop search and index engine
//!
//! Keeps an in-memory catalog of files, bookmarks, actions and free-text
//! entries, answers fuzzy queries against it with learned per-query boosts,
//! and persists the user's extra crawl roots and boosts across restarts.

pub mod actions;
pub mod boosts;
pub mod config;
pub mod crawler;
pub mod error;
pub mod extensions;
pub mod indexable;
pub mod logging;
pub mod matcher;
pub mod sources;
pub mod store;

pub use error::{IndexError, Result};
pub use indexable::IndexableItem;
pub use matcher::SearchResult;
pub use store::{IndexStore, StoreOptions};
