//! Learned boosts
//!
//! A boost records that, for an exact search string, the user picked the item
//! with a given boost identifier. The matcher consults the table to lift that
//! item to the top the next time the same string is typed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single learned preference, keyed in the table by the search string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryBoost {
    pub boost_identifier: String,
}

impl EntryBoost {
    pub fn new(boost_identifier: impl Into<String>) -> Self {
        EntryBoost {
            boost_identifier: boost_identifier.into(),
        }
    }
}

/// Persisted boost state (`index.json`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexData {
    #[serde(default)]
    pub boost_entries: HashMap<String, EntryBoost>,
}

/// Borrowed form of [`IndexData`], serialized without cloning the table
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IndexDataRef<'a> {
    pub boost_entries: &'a HashMap<String, EntryBoost>,
}

/// In-memory mapping from search string to boosted target. Last write wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoostTable {
    entries: HashMap<String, EntryBoost>,
}

impl BoostTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the boost for `search`, returning the entry it replaced
    pub fn set(&mut self, search: &str, boost: EntryBoost) -> Option<EntryBoost> {
        self.entries.insert(search.to_string(), boost)
    }

    /// Put back what [`BoostTable::set`] replaced (used to undo a failed write)
    pub fn restore(&mut self, search: &str, previous: Option<EntryBoost>) {
        match previous {
            Some(boost) => {
                self.entries.insert(search.to_string(), boost);
            }
            None => {
                self.entries.remove(search);
            }
        }
    }

    pub fn get(&self, search: &str) -> Option<&EntryBoost> {
        self.entries.get(search)
    }

    /// The boost identifier learned for this exact search string, if any
    pub fn boosted_identifier(&self, search: &str) -> Option<&str> {
        self.entries
            .get(search)
            .map(|boost| boost.boost_identifier.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &EntryBoost)> {
        self.entries.iter()
    }

    pub(crate) fn as_data(&self) -> IndexDataRef<'_> {
        IndexDataRef {
            boost_entries: &self.entries,
        }
    }
}

impl From<IndexData> for BoostTable {
    fn from(data: IndexData) -> Self {
        BoostTable {
            entries: data.boost_entries,
        }
    }
}

impl FromIterator<(String, EntryBoost)> for BoostTable {
    fn from_iter<I: IntoIterator<Item = (String, EntryBoost)>>(iter: I) -> Self {
        BoostTable {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites_previous_entry() {
        let mut table = BoostTable::new();
        assert!(table.set("note", EntryBoost::new("a")).is_none());
        let previous = table.set("note", EntryBoost::new("b"));

        assert_eq!(previous, Some(EntryBoost::new("a")));
        assert_eq!(table.boosted_identifier("note"), Some("b"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_restore_undoes_set() {
        let mut table = BoostTable::new();
        table.set("calc", EntryBoost::new("calc.exe"));

        let previous = table.set("calc", EntryBoost::new("other"));
        table.restore("calc", previous);
        assert_eq!(table.boosted_identifier("calc"), Some("calc.exe"));

        let previous = table.set("new", EntryBoost::new("x"));
        table.restore("new", previous);
        assert!(table.get("new").is_none());
    }

    #[test]
    fn test_keys_are_exact_search_strings() {
        let mut table = BoostTable::new();
        table.set("Note", EntryBoost::new("a"));
        assert!(table.boosted_identifier("note").is_none());
        assert!(table.boosted_identifier("Note ").is_none());
    }

    #[test]
    fn test_index_data_json_shape() {
        let table: BoostTable = [("note".to_string(), EntryBoost::new("C:\\notepad.exe"))]
            .into_iter()
            .collect();
        let json = serde_json::to_value(table.as_data()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"boostEntries": {"note": {"boostIdentifier": "C:\\notepad.exe"}}})
        );

        let data: IndexData = serde_json::from_value(json).unwrap();
        assert_eq!(BoostTable::from(data), table);
    }

    #[test]
    fn test_index_data_tolerates_missing_fields() {
        let data: IndexData = serde_json::from_str("{}").unwrap();
        assert!(data.boost_entries.is_empty());
    }
}
