//! Item identity and attributes.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::stats::StatVector;

/// Integer identity of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A piece of equipment.
///
/// Two items are equal when their ids are equal, regardless of the other
/// fields.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Equipment class tag, e.g. `"Helmet"` or `"Ring"`.
    pub class: String,
    pub stats: StatVector,
    /// Whether the user owns this item.
    pub owned: bool,
    pub corrupted: bool,
}

impl Item {
    /// Creates an owned, uncorrupted item with empty stats.
    pub fn new(id: u32, name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            id: ItemId(id),
            name: name.into(),
            class: class.into(),
            stats: StatVector::new(),
            owned: true,
            corrupted: false,
        }
    }

    pub fn with_stats(mut self, stats: StatVector) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_owned(mut self, owned: bool) -> Self {
        self.owned = owned;
        self
    }

    pub fn with_corrupted(mut self, corrupted: bool) -> Self {
        self.corrupted = corrupted;
        self
    }

    /// Returns `true` if the class tag names a ring.
    pub fn is_ring(&self) -> bool {
        self.class.trim().eq_ignore_ascii_case(super::pool::RING_CLASS)
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
