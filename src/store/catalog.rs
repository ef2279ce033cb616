//! The in-memory catalog: one batch of items per named source.
//!
//! Batches are replaced whole, so a reader holding the store's shared lock
//! sees either a source's old batch or its new one.

use std::sync::Arc;

use crate::indexable::IndexableItem;

#[derive(Debug, Clone)]
struct Batch {
    source: String,
    items: Vec<Arc<IndexableItem>>,
}

/// Sources keep their first-installed position; items keep their collected order
#[derive(Debug, Clone, Default)]
pub(crate) struct Catalog {
    batches: Vec<Batch>,
}

impl Catalog {
    /// Replace the batch for `source`, returning how many items it used to hold
    pub fn install(&mut self, source: &str, items: Vec<Arc<IndexableItem>>) -> usize {
        match self.batches.iter_mut().find(|b| b.source == source) {
            Some(batch) => std::mem::replace(&mut batch.items, items).len(),
            None => {
                self.batches.push(Batch {
                    source: source.to_string(),
                    items,
                });
                0
            }
        }
    }

    /// Add one item to `source`, replacing any item with the same boost identifier.
    /// Returns true when an existing item was replaced.
    pub fn upsert(&mut self, source: &str, item: Arc<IndexableItem>) -> bool {
        let index = match self.batches.iter().position(|b| b.source == source) {
            Some(index) => index,
            None => {
                self.batches.push(Batch {
                    source: source.to_string(),
                    items: Vec::new(),
                });
                self.batches.len() - 1
            }
        };

        let items = &mut self.batches[index].items;
        match items
            .iter()
            .position(|existing| existing.boost_identifier() == item.boost_identifier())
        {
            Some(pos) => {
                items[pos] = item;
                true
            }
            None => {
                items.push(item);
                false
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<IndexableItem>> {
        self.batches.iter().flat_map(|b| b.items.iter())
    }

    pub fn len(&self) -> usize {
        self.batches.iter().map(|b| b.items.len()).sum()
    }

    pub fn source_len(&self, source: &str) -> Option<usize> {
        self.batches
            .iter()
            .find(|b| b.source == source)
            .map(|b| b.items.len())
    }
}
