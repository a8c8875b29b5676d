//! Core types shared by the generator and its collaborators.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use num_bigint::BigUint;

use crate::error::Result;
use crate::item::{Item, ItemId, StatKey};

/// One candidate loadout.
///
/// Slot order is fixed by the generator: the two rings first, then one
/// item per non-ring class in class-name order. A combination is never
/// modified after it has been handed to a caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combination {
    items: Vec<Arc<Item>>,
}

impl Combination {
    /// Creates a combination from slot-ordered items.
    pub fn new(items: Vec<Arc<Item>>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Arc<Item>] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter().map(|i| i.as_ref())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().map(|i| i.id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    /// Sum of one numeric stat over every item.
    pub fn stat_total(&self, key: StatKey) -> f64 {
        self.items.iter().map(|i| i.stats.numeric(key)).sum()
    }

    pub(crate) fn set_slot(&mut self, slot: usize, item: &Arc<Item>) {
        if !Arc::ptr_eq(&self.items[slot], item) {
            self.items[slot] = Arc::clone(item);
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            f.write_str(&item.name)?;
        }
        Ok(())
    }
}

/// Predicate deciding whether a combination is acceptable.
///
/// Returning `Err` aborts the whole generation run; the error is handed
/// back to the caller unchanged.
///
/// Closures of type `Fn(&Combination) -> Result<bool>` implement this
/// trait directly. Use [`predicate`] to wrap an infallible closure.
pub trait CombinationValidator: Send + Sync {
    fn validate(&self, combination: &Combination) -> Result<bool>;
}

impl<F> CombinationValidator for F
where
    F: Fn(&Combination) -> Result<bool> + Send + Sync,
{
    fn validate(&self, combination: &Combination) -> Result<bool> {
        self(combination)
    }
}

/// Validator that accepts every combination.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl CombinationValidator for AcceptAll {
    fn validate(&self, _combination: &Combination) -> Result<bool> {
        Ok(true)
    }
}

/// Adapter turning an infallible closure into a [`CombinationValidator`].
#[derive(Debug, Clone, Copy)]
pub struct PredicateFn<F>(pub F);

impl<F> CombinationValidator for PredicateFn<F>
where
    F: Fn(&Combination) -> bool + Send + Sync,
{
    fn validate(&self, combination: &Combination) -> Result<bool> {
        Ok((self.0)(combination))
    }
}

/// Wraps an infallible closure as a validator.
///
/// ```
/// use u_loadout::combination::{predicate, CombinationValidator};
///
/// let no_empty = predicate(|c| !c.is_empty());
/// # let _ = &no_empty as &dyn CombinationValidator;
/// ```
pub fn predicate<F>(f: F) -> PredicateFn<F>
where
    F: Fn(&Combination) -> bool + Send + Sync,
{
    PredicateFn(f)
}

/// Cheap pre-filter applied before the user validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterStrategy {
    /// No pre-filter.
    #[default]
    Comprehensive,
    /// At least one item must be tiered.
    Balanced,
    /// Every item must be tiered.
    Strict,
}

impl FilterStrategy {
    pub fn name(self) -> &'static str {
        match self {
            FilterStrategy::Comprehensive => "Comprehensive",
            FilterStrategy::Balanced => "Balanced",
            FilterStrategy::Strict => "Strict",
        }
    }

    /// Whether this strategy consults the tiered item set.
    pub fn needs_tiered_items(self) -> bool {
        !matches!(self, FilterStrategy::Comprehensive)
    }

    /// Applies the strategy to a combination.
    ///
    /// `tiered` is ignored by [`FilterStrategy::Comprehensive`].
    pub fn accepts(self, combination: &Combination, tiered: &HashSet<ItemId>) -> bool {
        match self {
            FilterStrategy::Comprehensive => true,
            FilterStrategy::Balanced => combination.ids().any(|id| tiered.contains(&id)),
            FilterStrategy::Strict => combination.ids().all(|id| tiered.contains(&id)),
        }
    }
}

/// How a generation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// Stopped early through the cancellation flag.
    Cancelled,
}

/// Snapshot of a running generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub processed: u64,
    pub valid: u64,
    pub total: BigUint,
    /// 0.0–100.0.
    pub percent_complete: f64,
    pub elapsed: Duration,
}

/// Receiver of throttled progress reports.
///
/// Reports are delivered on worker threads and may arrive concurrently.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: &ProgressReport);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressReport) + Send + Sync,
{
    fn report(&self, progress: &ProgressReport) {
        self(progress)
    }
}

/// Outcome of a generation run.
#[derive(Debug, Clone)]
pub struct CombinationResult {
    /// Size of the full search space.
    pub total: BigUint,
    /// Combinations examined.
    pub processed: u64,
    /// Combinations that passed the pre-filter and the validator.
    pub valid: u64,
    pub elapsed: Duration,
    /// Stored valid combinations, at most `max_valid_to_store`.
    pub combinations: Vec<Combination>,
    pub status: RunStatus,
}

impl CombinationResult {
    pub fn is_cancelled(&self) -> bool {
        self.status == RunStatus::Cancelled
    }

    /// Number of valid combinations that were counted but not stored.
    pub fn dropped(&self) -> u64 {
        self.valid.saturating_sub(self.combinations.len() as u64)
    }

    /// Share of the search space processed, 0.0–100.0.
    pub fn percent_complete(&self) -> f64 {
        percent(self.processed, &self.total)
    }
}

pub(crate) fn percent(processed: u64, total: &BigUint) -> f64 {
    use num_traits::{ToPrimitive, Zero};

    if total.is_zero() {
        return 100.0;
    }
    let total = total.to_f64().unwrap_or(f64::INFINITY);
    (processed as f64 / total * 100.0).clamp(0.0, 100.0)
}
