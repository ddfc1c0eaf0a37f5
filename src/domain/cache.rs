//! Local mirror of the service's sweet collection.

use crate::domain::sweet::{Sweet, SweetId};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// The last successful listing, in service order.
///
/// `replace` is the only mutator: the cache is never patched item by item, so
/// it cannot drift from what the service reported.
#[derive(Debug, Clone, Default)]
pub struct InventoryCache {
    items: Vec<Sweet>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl InventoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a fresh listing. Ids are unique: a repeated id keeps its first
    /// occurrence. Returns the number of duplicates dropped.
    pub fn replace(&mut self, items: Vec<Sweet>) -> usize {
        let total = items.len();
        let mut seen = HashSet::with_capacity(total);
        self.items = items.into_iter().filter(|s| seen.insert(s.id)).collect();
        self.refreshed_at = Some(Utc::now());
        total - self.items.len()
    }

    /// Empties the cache (logout).
    pub fn clear(&mut self) {
        self.items.clear();
        self.refreshed_at = None;
    }

    pub fn items(&self) -> &[Sweet] {
        &self.items
    }

    pub fn get(&self, id: SweetId) -> Option<&Sweet> {
        self.items.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// When the current listing was fetched; `None` before the first load.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }
}
