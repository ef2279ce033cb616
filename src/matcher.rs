//! Fuzzy Matcher/Scorer
//!
//! Scores catalog items against a query using nucleo's subsequence matcher,
//! adds a density bonus for short names, lifts boosted items above every
//! unboosted match and sorts deterministically. Pure: nothing here mutates the
//! catalog or the boost table.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use nucleo_matcher::{Matcher, Utf32Str};
use uuid::Uuid;

use crate::boosts::BoostTable;
use crate::indexable::IndexableItem;

// ============================================
// SCORING WEIGHTS
// ============================================

/// Added at most once per item, scaled by query length over name length
pub const DENSITY_BONUS: f64 = 16.0;

/// Extra highlight weight for a match at a word start
pub const BOUNDARY_WEIGHT: f64 = 1.0;

/// Extra highlight weight for a match directly after another match
pub const CONTIGUOUS_WEIGHT: f64 = 0.5;

/// How far a boosted item lands above the best unboosted score
pub const BOOST_MARGIN: f64 = 1.0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Keep only the top N results. `None` keeps everything that matched.
    pub max_results: Option<usize>,
}

/// One ranked match. `target` points into the catalog snapshot it came from.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub name: String,
    pub score: f64,
    pub target: Arc<IndexableItem>,
    /// Char index in `name` -> emphasis weight
    pub highlight_positions: HashMap<usize, f64>,
    /// Fresh per result, for UI correlation only
    pub id: Uuid,
}

/// Reuses the matcher and its buffers across every item of one search
struct MatchCtx {
    matcher: Matcher,
    needle: String,
    needle_buf: Vec<char>,
    haystack_buf: Vec<char>,
    indices: Vec<u32>,
}

impl MatchCtx {
    fn new(query_lower: &str) -> Self {
        let mut config = nucleo_matcher::Config::DEFAULT;
        // Needle is only lowercased, so haystacks must not be folded further
        config.normalize = false;
        Self {
            matcher: Matcher::new(config),
            needle: query_lower.to_string(),
            needle_buf: Vec::new(),
            haystack_buf: Vec::with_capacity(64),
            indices: Vec::with_capacity(16),
        }
    }

    /// Nucleo score plus the matched char indices, sorted and unique
    fn fuzzy_indices(&mut self, haystack: &str) -> Option<(u16, &[u32])> {
        self.haystack_buf.clear();
        self.indices.clear();
        let haystack = Utf32Str::new(haystack, &mut self.haystack_buf);
        self.needle_buf.clear();
        let needle = Utf32Str::new(&self.needle, &mut self.needle_buf);
        let score = self
            .matcher
            .fuzzy_indices(haystack, needle, &mut self.indices)?;
        self.indices.sort_unstable();
        self.indices.dedup();
        Some((score, &self.indices))
    }
}

/// Word start: first char, after a separator, or a lower-to-upper case change
fn is_word_start(chars: &[char], idx: usize) -> bool {
    if idx == 0 {
        return true;
    }
    let prev = chars[idx - 1];
    let current = chars[idx];
    !prev.is_alphanumeric() || (prev.is_lowercase() && current.is_uppercase())
}

fn highlight_weights(name: &str, indices: &[u32]) -> HashMap<usize, f64> {
    let chars: Vec<char> = name.chars().collect();
    let mut weights = HashMap::with_capacity(indices.len());
    let mut previous: Option<usize> = None;

    for &idx in indices {
        let idx = idx as usize;
        if idx >= chars.len() {
            continue;
        }
        let mut weight = 1.0;
        if is_word_start(&chars, idx) {
            weight += BOUNDARY_WEIGHT;
        }
        if previous.is_some_and(|p| p + 1 == idx) {
            weight += CONTIGUOUS_WEIGHT;
        }
        weights.insert(idx, weight);
        previous = Some(idx);
    }

    weights
}

struct Scored {
    name: String,
    name_chars: usize,
    score: f64,
    boosted: bool,
    catalog_order: usize,
    target: Arc<IndexableItem>,
    highlight_positions: HashMap<usize, f64>,
}

/// Rank every item whose name contains the query's chars in order.
///
/// An empty or whitespace-only query returns nothing. Ties go to the shorter
/// name, then to the earlier catalog position.
pub fn search<'a, I>(
    query: &str,
    catalog: I,
    boosts: &BoostTable,
    config: &MatcherConfig,
) -> Vec<SearchResult>
where
    I: IntoIterator<Item = &'a Arc<IndexableItem>>,
{
    if query.trim().is_empty() {
        return Vec::new();
    }

    let query_lower = query.to_lowercase();
    let query_chars = query.chars().count() as f64;
    let boosted_id = boosts.boosted_identifier(query);
    let mut ctx = MatchCtx::new(&query_lower);

    let mut scored: Vec<Scored> = Vec::new();
    for (catalog_order, item) in catalog.into_iter().enumerate() {
        let name = item.name();
        let Some((base, indices)) = ctx.fuzzy_indices(name) else {
            continue;
        };

        let name_chars = name.chars().count();
        let density = DENSITY_BONUS * query_chars / name_chars.max(1) as f64;
        let highlight_positions = highlight_weights(name, indices);

        scored.push(Scored {
            name: name.to_string(),
            name_chars,
            score: base as f64 + density,
            boosted: boosted_id == Some(item.boost_identifier()),
            catalog_order,
            target: Arc::clone(item),
            highlight_positions,
        });
    }

    apply_boost(&mut scored);

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name_chars.cmp(&b.name_chars))
            .then_with(|| a.catalog_order.cmp(&b.catalog_order))
    });

    if let Some(max) = config.max_results {
        scored.truncate(max);
    }

    scored
        .into_iter()
        .map(|s| SearchResult {
            name: s.name,
            score: s.score,
            target: s.target,
            highlight_positions: s.highlight_positions,
            id: Uuid::new_v4(),
        })
        .collect()
}

/// Lift boosted matches past the best unboosted score of this call
fn apply_boost(scored: &mut [Scored]) {
    if !scored.iter().any(|s| s.boosted) {
        return;
    }

    let best_unboosted = scored
        .iter()
        .filter(|s| !s.boosted)
        .map(|s| s.score)
        .fold(0.0_f64, f64::max);

    for s in scored.iter_mut().filter(|s| s.boosted) {
        s.score += best_unboosted + BOOST_MARGIN;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boosts::EntryBoost;

    fn catalog(paths: &[&str]) -> Vec<Arc<IndexableItem>> {
        paths
            .iter()
            .map(|p| Arc::new(IndexableItem::file(*p)))
            .collect()
    }

    fn run(query: &str, items: &[Arc<IndexableItem>], boosts: &BoostTable) -> Vec<SearchResult> {
        search(query, items, boosts, &MatcherConfig::default())
    }

    fn names(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let items = catalog(&["/apps/Notepad.exe"]);
        assert!(run("", &items, &BoostTable::new()).is_empty());
        assert!(run("   ", &items, &BoostTable::new()).is_empty());
    }

    #[test]
    fn test_subsequence_inclusion_and_exclusion() {
        let items = catalog(&["/apps/Notepad.exe", "/apps/Calculator.exe", "/apps/Paint.exe"]);
        let results = run("npd", &items, &BoostTable::new());
        assert_eq!(names(&results), vec!["Notepad.exe"]);
        assert!(results[0].score > 0.0);

        assert!(run("xyz", &items, &BoostTable::new()).is_empty());
        // Out of order is not a subsequence
        assert!(run("dpn", &items, &BoostTable::new()).is_empty());
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let items = catalog(&["/apps/Notepad.exe"]);
        assert_eq!(run("NOTE", &items, &BoostTable::new()).len(), 1);
        assert_eq!(run("notepad", &items, &BoostTable::new()).len(), 1);
    }

    #[test]
    fn test_spaces_are_part_of_the_query() {
        let items = catalog(&["/apps/Note-taking App.exe"]);
        assert_eq!(run("ng app", &items, &BoostTable::new()).len(), 1);
        // Words are not matched out of order
        assert!(run("app note", &items, &BoostTable::new()).is_empty());
    }

    #[test]
    fn test_highlight_positions_cover_matched_chars() {
        let items = catalog(&["/apps/Notepad.exe"]);
        let results = run("npd", &items, &BoostTable::new());
        let highlights = &results[0].highlight_positions;

        let mut positions: Vec<usize> = highlights.keys().copied().collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 4, 6]);
        assert_eq!(highlights[&0], 1.0 + BOUNDARY_WEIGHT);
        assert_eq!(highlights[&4], 1.0);
        assert_eq!(highlights[&6], 1.0);
    }

    #[test]
    fn test_contiguous_matches_weigh_more() {
        let items = catalog(&["/apps/Notepad.exe"]);
        let results = run("not", &items, &BoostTable::new());
        let highlights = &results[0].highlight_positions;
        assert_eq!(highlights[&0], 1.0 + BOUNDARY_WEIGHT);
        assert_eq!(highlights[&1], 1.0 + CONTIGUOUS_WEIGHT);
        assert_eq!(highlights[&2], 1.0 + CONTIGUOUS_WEIGHT);
    }

    #[test]
    fn test_notepad_ranks_first_without_boost() {
        let items = catalog(&["/apps/Note-taking App.exe", "/apps/Notepad.exe"]);
        let results = run("note", &items, &BoostTable::new());
        assert_eq!(names(&results), vec!["Notepad.exe", "Note-taking App.exe"]);
    }

    #[test]
    fn test_boost_outranks_better_match() {
        let items = catalog(&["/apps/Notepad.exe", "/apps/Note-taking App.exe"]);
        let mut boosts = BoostTable::new();
        boosts.set("note", EntryBoost::new("/apps/Note-taking App.exe"));

        let results = run("note", &items, &boosts);
        assert_eq!(names(&results), vec!["Note-taking App.exe", "Notepad.exe"]);
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_boost_only_applies_to_exact_query() {
        let items = catalog(&["/apps/Notepad.exe", "/apps/Note-taking App.exe"]);
        let mut boosts = BoostTable::new();
        boosts.set("note", EntryBoost::new("/apps/Note-taking App.exe"));

        let results = run("not", &items, &boosts);
        assert_eq!(results[0].name, "Notepad.exe");
    }

    #[test]
    fn test_boost_for_unmatched_item_has_no_effect() {
        let items = catalog(&["/apps/Notepad.exe", "/apps/Paint.exe"]);
        let mut boosts = BoostTable::new();
        boosts.set("note", EntryBoost::new("/apps/Paint.exe"));

        let results = run("note", &items, &boosts);
        assert_eq!(names(&results), vec!["Notepad.exe"]);
    }

    #[test]
    fn test_ties_fall_back_to_catalog_order() {
        let items = catalog(&["/one/Tool.exe", "/two/Tool.exe", "/three/Tool.exe"]);
        let results = run("tool", &items, &BoostTable::new());
        let ids: Vec<&str> = results.iter().map(|r| r.target.boost_identifier()).collect();
        assert_eq!(ids, vec!["/one/Tool.exe", "/two/Tool.exe", "/three/Tool.exe"]);
        assert_eq!(results[0].score, results[2].score);
    }

    #[test]
    fn test_each_result_gets_a_fresh_id() {
        let items = catalog(&["/one/Tool.exe", "/two/Tool.exe"]);
        let results = run("tool", &items, &BoostTable::new());
        assert_ne!(results[0].id, results[1].id);
    }

    #[test]
    fn test_max_results_caps_after_sorting() {
        let items = catalog(&["/apps/Note-taking App.exe", "/apps/Notepad.exe", "/apps/Notes.exe"]);
        let config = MatcherConfig {
            max_results: Some(1),
        };
        let results = search("note", &items, &BoostTable::new(), &config);
        assert_eq!(names(&results), vec!["Notes.exe"]);
    }

    #[test]
    fn test_results_share_catalog_items() {
        let items = catalog(&["/apps/Notepad.exe"]);
        let results = run("note", &items, &BoostTable::new());
        assert!(Arc::ptr_eq(&results[0].target, &items[0]));
    }
}
