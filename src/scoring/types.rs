//! Scoring inputs and outputs.

use std::collections::BTreeMap;

use crate::combination::Combination;

/// A weighted scoring profile.
///
/// Several tiers are blended by their relative `weight`. Within a tier each
/// stat contributes in proportion to its own weight.
///
/// ```
/// use u_loadout::scoring::Tier;
///
/// let tier = Tier::new(1, "Survivability", 60.0)
///     .with_stat("Life", 40.0)
///     .with_stat("EnergyShield", 20.0);
/// assert_eq!(tier.total_stat_weight(), 60.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tier {
    pub id: u32,
    pub name: String,
    /// Share of this tier in the blend, conventionally 0–100.
    pub weight: f64,
    /// Stat property name → weight.
    pub stat_weights: BTreeMap<String, f64>,
}

impl Tier {
    pub fn new(id: u32, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
            stat_weights: BTreeMap::new(),
        }
    }

    /// Sets the weight of one stat.
    pub fn with_stat(mut self, stat: impl Into<String>, weight: f64) -> Self {
        self.stat_weights.insert(stat.into(), weight);
        self
    }

    /// Sum of all stat weights.
    pub fn total_stat_weight(&self) -> f64 {
        self.stat_weights.values().sum()
    }
}

/// Pool-wide value range of one stat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatRange {
    pub min: f64,
    pub max: f64,
}

impl StatRange {
    /// Maps `value` onto the range; `0.5` when the range is degenerate.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            0.5
        } else {
            (value - self.min) / span
        }
    }

    pub(crate) fn include(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// A combination together with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCombination {
    pub combination: Combination,
    pub score: f64,
}
