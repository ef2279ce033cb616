//! Index Store
//!
//! Owns the catalog snapshot and the boost table behind one `RwLock`.
//! Searches take the shared side and run in parallel; indexing, action
//! registration and boost writes take the exclusive side.
//!
//! # Module Structure
//!
//! - `catalog` - per-source batches of items
//! - `options` - `StoreOptions`, the host's well-known roots
//!
//! Every exclusive section acquires the lock once and hands `&mut StoreState`
//! to its helpers; nothing below a section takes the lock again. Sources are
//! collected before the lock is taken and installed in a single swap, and
//! persistence writes happen while the exclusive guard is still held.

mod catalog;
mod options;

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::boosts::{BoostTable, EntryBoost, IndexData};
use crate::config::{ConfigCodec, LoadOrigin, UserConfig};
use crate::crawler::DirectorySource;
use crate::error::{IndexError, Result, ResultExt};
use crate::indexable::IndexableItem;
use crate::matcher::{self, SearchResult};
use crate::sources::ItemSource;

use catalog::Catalog;
pub use options::StoreOptions;

/// Catalog source that registered actions are collected under
pub const ACTIONS_SOURCE: &str = "actions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorePhase {
    /// `start` has not run yet
    Uninitialized,
    /// At least one source is being collected or installed
    Indexing,
    Ready,
}

/// Timing and counts for one indexed source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub name: String,
    pub item_count: usize,
    /// Items dropped for an empty name or boost identifier
    pub rejected: usize,
    pub traverse_ms: u64,
    pub index_ms: u64,
}

impl SourceReport {
    pub fn total_ms(&self) -> u64 {
        self.traverse_ms + self.index_ms
    }
}

#[derive(Debug, Clone)]
pub struct StartReport {
    pub config_origin: LoadOrigin,
    pub index_origin: LoadOrigin,
    pub sources: Vec<SourceReport>,
    pub total_ms: u64,
}

impl StartReport {
    pub fn item_count(&self) -> usize {
        self.sources.iter().map(|s| s.item_count).sum()
    }
}

#[derive(Debug, Default)]
struct StoreState {
    catalog: Catalog,
    boosts: BoostTable,
    config: UserConfig,
    started: bool,
    /// Indexing operations in flight
    indexing: usize,
}

impl StoreState {
    fn phase(&self) -> StorePhase {
        if self.indexing > 0 {
            StorePhase::Indexing
        } else if self.started {
            StorePhase::Ready
        } else {
            StorePhase::Uninitialized
        }
    }
}

/// Marks the store as indexing until dropped
struct IndexingToken<'a> {
    store: &'a IndexStore,
}

impl Drop for IndexingToken<'_> {
    fn drop(&mut self) {
        let mut state = self.store.state.write();
        state.indexing = state.indexing.saturating_sub(1);
    }
}

/// The search-and-index engine. Construct once and share through `Arc`.
pub struct IndexStore {
    options: StoreOptions,
    codec: ConfigCodec,
    state: RwLock<StoreState>,
}

impl IndexStore {
    pub fn new(options: StoreOptions) -> Self {
        let codec = ConfigCodec::new(&options.data_dir);
        IndexStore {
            options,
            codec,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Load persisted state, then index every root, configured path and source.
    ///
    /// Each source gets its own exclusive section, so searches running during
    /// start see the sources installed so far. Fails only when the normalized
    /// config can't be written back.
    #[instrument(skip(self), fields(data_dir = %self.options.data_dir.display()))]
    pub fn start(&self) -> Result<StartReport> {
        let started = Instant::now();
        let _indexing = self.begin_indexing();

        let (config, config_origin, index_origin) = self.load_persisted()?;

        let mut extensions = self.options.extensions.clone();
        extensions.extend(&config.extensions);

        let mut sources: Vec<Arc<dyn ItemSource>> = Vec::new();
        for root in self
            .options
            .roots
            .iter()
            .cloned()
            .chain(config.expanded_paths())
        {
            let name = root.display().to_string();
            sources.push(Arc::new(DirectorySource::new(name, root, extensions.clone())));
        }
        sources.extend(self.options.sources.iter().cloned());

        let reports: Vec<SourceReport> = sources
            .iter()
            .map(|source| self.index_source(source.as_ref()))
            .collect();

        self.state.write().started = true;

        let report = StartReport {
            config_origin,
            index_origin,
            sources: reports,
            total_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            sources = report.sources.len(),
            items = report.item_count(),
            boosts = self.state.read().boosts.len(),
            total_ms = report.total_ms,
            "Index store ready"
        );
        Ok(report)
    }

    /// Single exclusive section: config load and write-back, boost table load
    fn load_persisted(&self) -> Result<(UserConfig, LoadOrigin, LoadOrigin)> {
        let mut state = self.state.write();

        let loaded = self.codec.load_user_config();
        let config = loaded.value.normalized();
        if loaded.origin == LoadOrigin::Unreadable {
            // Defaults must not replace a file we could not even read
            warn!("User config unreadable, leaving it in place");
        } else {
            self.codec.save_user_config(&config).map_err(|e| {
                error!(error = %e, "Failed to write back user config");
                e
            })?;
        }
        state.config = config.clone();

        let index = self.codec.load_index_data();
        state.boosts = usable_boosts(index.value);

        debug!(
            paths = config.paths.len(),
            extensions = config.extensions.len(),
            boosts = state.boosts.len(),
            "Loaded persisted state"
        );
        Ok((config, loaded.origin, index.origin))
    }

    /// Collect a source outside the lock, then swap its batch in atomically.
    /// Invalid items are logged and dropped; the rest of the batch still goes in.
    pub fn index_source(&self, source: &dyn ItemSource) -> SourceReport {
        let _indexing = self.begin_indexing();

        let traverse_start = Instant::now();
        let collected = source.collect();
        let traverse_ms = traverse_start.elapsed().as_millis() as u64;

        let (items, rejected) = validate_batch(source.name(), collected);
        let item_count = items.len();

        let index_start = Instant::now();
        let replaced = {
            let mut state = self.state.write();
            install_batch(&mut state, source.name(), items)
        };
        let index_ms = index_start.elapsed().as_millis() as u64;

        info!(
            source = source.name(),
            items = item_count,
            replaced,
            rejected,
            traverse_ms,
            index_ms,
            "Indexed source"
        );

        SourceReport {
            name: source.name().to_string(),
            item_count,
            rejected,
            traverse_ms,
            index_ms,
        }
    }

    /// Add one item to the live catalog without a rebuild
    pub fn index_action(&self, item: IndexableItem) -> Result<()> {
        if let Err(e) = item.validate() {
            warn!(error = %e, "Rejected item registration");
            return Err(e);
        }

        let name = item.name().to_string();
        let replaced = {
            let mut state = self.state.write();
            state.catalog.upsert(ACTIONS_SOURCE, Arc::new(item))
        };

        info!(item = %name, replaced, "Registered item");
        Ok(())
    }

    /// Remember `boost_identifier` as the preferred result for `search`.
    ///
    /// Writes `index.json` before releasing the lock. If the write fails the
    /// in-memory table is put back and the error returned, so memory and disk
    /// never disagree.
    pub fn add_boost(&self, search: &str, boost_identifier: &str) -> Result<()> {
        if search.trim().is_empty() {
            return Err(IndexError::InvalidBoost("search string is empty".to_string()));
        }
        if boost_identifier.trim().is_empty() {
            return Err(IndexError::InvalidBoost(format!(
                "boost identifier for '{}' is empty",
                search
            )));
        }

        let mut state = self.state.write();
        write_boost(&self.codec, &mut state, search, boost_identifier)
    }

    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let started = Instant::now();
        let state = self.state.read();
        let results = matcher::search(
            query,
            state.catalog.iter(),
            &state.boosts,
            &self.options.matcher,
        );
        drop(state);

        info!(
            query_len = query.chars().count(),
            results = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Search"
        );
        results
    }

    pub fn phase(&self) -> StorePhase {
        self.state.read().phase()
    }

    pub fn item_count(&self) -> usize {
        self.state.read().catalog.len()
    }

    /// Items currently installed for one source
    pub fn source_item_count(&self, source: &str) -> Option<usize> {
        self.state.read().catalog.source_len(source)
    }

    pub fn boost_for(&self, search: &str) -> Option<String> {
        self.state
            .read()
            .boosts
            .boosted_identifier(search)
            .map(str::to_string)
    }

    /// Normalized config as loaded by the last `start`
    pub fn user_config(&self) -> UserConfig {
        self.state.read().config.clone()
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    fn begin_indexing(&self) -> IndexingToken<'_> {
        self.state.write().indexing += 1;
        IndexingToken { store: self }
    }
}

fn validate_batch(source: &str, collected: Vec<IndexableItem>) -> (Vec<Arc<IndexableItem>>, usize) {
    let mut rejected = 0;
    let items = collected
        .into_iter()
        .filter(|item| {
            let valid = item
                .validate()
                .skip_on_err(format_args!("item from {source}"))
                .is_some();
            if !valid {
                rejected += 1;
            }
            valid
        })
        .map(Arc::new)
        .collect();
    (items, rejected)
}

/// Drop persisted boosts with a blank search string or identifier
fn usable_boosts(data: IndexData) -> BoostTable {
    data.boost_entries
        .into_iter()
        .filter(|(search, boost)| {
            let usable = !search.trim().is_empty() && !boost.boost_identifier.trim().is_empty();
            if !usable {
                warn!(
                    search = %search,
                    boost_identifier = %boost.boost_identifier,
                    "Ignoring persisted boost with an empty field"
                );
            }
            usable
        })
        .collect()
}

fn install_batch(state: &mut StoreState, source: &str, items: Vec<Arc<IndexableItem>>) -> usize {
    state.catalog.install(source, items)
}

fn write_boost(
    codec: &ConfigCodec,
    state: &mut StoreState,
    search: &str,
    boost_identifier: &str,
) -> Result<()> {
    let previous = state.boosts.set(search, EntryBoost::new(boost_identifier));

    if let Err(e) = codec.save_index_data(&state.boosts) {
        state.boosts.restore(search, previous);
        error!(search, error = %e, "Failed to persist boost, rolled back");
        return Err(e);
    }

    info!(search, boost_identifier, "Boost saved");
    Ok(())
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
