//! Classified item pool: non-ring classes keyed by class tag, rings apart.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use super::types::{Item, ItemId};

/// Class tag that marks an item as a ring.
pub const RING_CLASS: &str = "Ring";

/// Items grouped for combination generation.
///
/// Non-ring classes are kept in a `BTreeMap` so that every combination
/// lists its class slots in the same (alphabetical) order.
#[derive(Debug, Clone, Default)]
pub struct ItemPool {
    classes: BTreeMap<String, Vec<Arc<Item>>>,
    rings: Vec<Arc<Item>>,
}

impl ItemPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pool from explicit class lists and a ring list.
    pub fn from_parts(
        classes: BTreeMap<String, Vec<Arc<Item>>>,
        rings: Vec<Arc<Item>>,
    ) -> Self {
        Self { classes, rings }
    }

    /// Groups items by class tag, isolating rings.
    ///
    /// Class tags are trimmed; items sharing a trimmed tag land in the
    /// same list in input order.
    pub fn classify<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        let mut pool = Self::new();
        for item in items {
            pool.insert(item);
        }
        pool
    }

    /// Adds one item to the list matching its class.
    pub fn insert(&mut self, item: Item) {
        if item.is_ring() {
            self.rings.push(Arc::new(item));
        } else {
            let class = item.class.trim().to_string();
            self.classes.entry(class).or_default().push(Arc::new(item));
        }
    }

    /// Non-ring class lists.
    pub fn classes(&self) -> &BTreeMap<String, Vec<Arc<Item>>> {
        &self.classes
    }

    /// Ring list as supplied (may contain duplicate ids).
    pub fn rings(&self) -> &[Arc<Item>] {
        &self.rings
    }

    /// Ring list with duplicate ids removed, first occurrence kept.
    pub fn distinct_rings(&self) -> Vec<Arc<Item>> {
        let mut seen: HashSet<ItemId> = HashSet::with_capacity(self.rings.len());
        self.rings
            .iter()
            .filter(|r| seen.insert(r.id))
            .cloned()
            .collect()
    }

    /// Iterates every item in the pool, rings last.
    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.classes
            .values()
            .flatten()
            .chain(self.rings.iter())
            .map(|item| item.as_ref())
    }

    /// Total number of items, rings included.
    pub fn len(&self) -> usize {
        self.classes.values().map(Vec::len).sum::<usize>() + self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a pool restricted to items the user owns.
    pub fn owned_only(&self) -> Self {
        self.retain(|item| item.owned)
    }

    /// Returns a pool without corrupted items.
    pub fn without_corrupted(&self) -> Self {
        self.retain(|item| !item.corrupted)
    }

    /// Returns a pool keeping only items that satisfy `keep`.
    ///
    /// Class entries are preserved even when they become empty so that
    /// generation reports the empty class instead of silently dropping it.
    pub fn retain<F>(&self, keep: F) -> Self
    where
        F: Fn(&Item) -> bool,
    {
        let classes = self
            .classes
            .iter()
            .map(|(class, items)| {
                let kept = items.iter().filter(|i| keep(i)).cloned().collect();
                (class.clone(), kept)
            })
            .collect();
        let rings = self.rings.iter().filter(|i| keep(i)).cloned().collect();
        Self { classes, rings }
    }
}
