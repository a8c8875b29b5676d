//! Weighted, pool-normalized scoring.
//!
//! ```text
//! score = Σ_tier (w_t / Σ w) × Σ_stat norm(Σ_items v) × w_s / Σ w_s
//! norm(x) = (x − min) / (max − min), or 0.5 when max == min
//! ```
//!
//! `min` and `max` are taken over every item of the pool, once, when the
//! engine is built.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use super::types::{StatRange, Tier};
use crate::combination::Combination;
use crate::error::{LoadoutError, Result};
use crate::item::{Item, ItemId, StatKey};

#[derive(Debug, Clone)]
struct CompiledTier {
    /// `w_t / Σ w`.
    share: f64,
    stats: Vec<(StatKey, f64)>,
    stat_weight_sum: f64,
}

/// Scores combinations against a set of tiers.
///
/// # Examples
///
/// ```
/// use u_loadout::item::{Item, StatKey, StatVector};
/// use u_loadout::scoring::{ScoringEngine, Tier};
///
/// let pool = vec![
///     Item::new(1, "Coral Ring", "Ring").with_stats(StatVector::new().with(StatKey::Life, 20.0)),
///     Item::new(2, "Iron Ring", "Ring").with_stats(StatVector::new().with(StatKey::Life, 60.0)),
/// ];
/// let tiers = vec![Tier::new(1, "Life", 100.0).with_stat("Life", 1.0)];
///
/// let engine = ScoringEngine::new(&tiers, &pool).unwrap();
/// assert!(engine.is_ranking_enabled());
/// assert_eq!(engine.tiered_stats(), &[StatKey::Life]);
/// ```
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    tiers: Vec<CompiledTier>,
    ranges: BTreeMap<StatKey, StatRange>,
    tiered: Vec<StatKey>,
}

impl ScoringEngine {
    /// Resolves tier stats and runs the normalization pass over `pool`.
    ///
    /// # Errors
    ///
    /// [`LoadoutError::UnknownStat`] if a tier names no numeric stat.
    pub fn new<'a, I>(tiers: &[Tier], pool: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let weight_sum: f64 = tiers.iter().map(|t| t.weight).sum();

        let mut compiled = Vec::with_capacity(tiers.len());
        let mut tiered: Vec<StatKey> = Vec::new();
        for tier in tiers {
            let mut stats = Vec::with_capacity(tier.stat_weights.len());
            for (name, &weight) in &tier.stat_weights {
                let key = StatKey::from_name(name).ok_or_else(|| LoadoutError::UnknownStat {
                    stat: name.clone(),
                    context: format!("tier '{}'", tier.name),
                })?;
                if weight != 0.0 {
                    stats.push((key, weight));
                    if !tiered.contains(&key) {
                        tiered.push(key);
                    }
                }
            }

            let stat_weight_sum = tier.total_stat_weight();
            if stat_weight_sum == 0.0 {
                debug!(tier = %tier.name, "tier skipped: stat weights sum to zero");
                continue;
            }
            let share = if weight_sum == 0.0 {
                0.0
            } else {
                tier.weight / weight_sum
            };
            compiled.push(CompiledTier {
                share,
                stats,
                stat_weight_sum,
            });
        }
        tiered.sort_unstable();

        let mut ranges: BTreeMap<StatKey, StatRange> = BTreeMap::new();
        for item in pool {
            for &key in &tiered {
                let value = item.stats.numeric(key);
                ranges
                    .entry(key)
                    .and_modify(|r| r.include(value))
                    .or_insert(StatRange {
                        min: value,
                        max: value,
                    });
            }
        }

        debug!(
            tiers = compiled.len(),
            tiered_stats = tiered.len(),
            "scoring engine prepared"
        );

        Ok(Self {
            tiers: compiled,
            ranges,
            tiered,
        })
    }

    /// `false` when scores carry no information (no usable tier or a zero
    /// total tier weight); callers should list combinations unranked.
    pub fn is_ranking_enabled(&self) -> bool {
        self.tiers.iter().any(|t| t.share != 0.0)
    }

    /// Stats with a nonzero weight in at least one tier, sorted.
    pub fn tiered_stats(&self) -> &[StatKey] {
        &self.tiered
    }

    /// Pool-wide range of a tiered stat.
    pub fn range(&self, key: StatKey) -> Option<StatRange> {
        self.ranges.get(&key).copied()
    }

    /// Normalizes a summed stat value against its pool-wide range.
    pub fn normalize(&self, key: StatKey, value: f64) -> f64 {
        match self.ranges.get(&key) {
            Some(range) => range.normalize(value),
            None => 0.5,
        }
    }

    /// Ids of the items with a nonzero value in any tiered stat.
    pub fn tiered_item_ids<'a, I>(&self, items: I) -> HashSet<ItemId>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        items
            .into_iter()
            .filter(|item| item.stats.touches(&self.tiered))
            .map(|item| item.id)
            .collect()
    }

    /// Scores one combination.
    pub fn score(&self, combination: &Combination) -> f64 {
        self.tiers
            .iter()
            .map(|tier| {
                let weighted: f64 = tier
                    .stats
                    .iter()
                    .map(|&(key, weight)| {
                        self.normalize(key, combination.stat_total(key)) * weight
                    })
                    .sum();
                tier.share * weighted / tier.stat_weight_sum
            })
            .sum()
    }
}
