//! Compiled validator.
//!
//! [`Validator::new`] resolves every stat name once and drops inactive
//! groups, so evaluation is a plain fold over numeric stats.
//!
//! Groups are combined strictly left to right with no precedence:
//! `A AND B OR C` is `(A AND B) OR C`.

use tracing::debug;

use super::types::{ArithmeticOp, LogicalOp, ValidationGroup};
use crate::combination::{Combination, CombinationValidator};
use crate::error::{LoadoutError, Result};
use crate::item::{StatKey, StatVector};

/// Per-group evaluation detail, for diagnostics and display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupOutcome {
    pub id: u32,
    pub aggregate: f64,
    pub passed: bool,
}

#[derive(Debug, Clone)]
struct CompiledGroup {
    seed: StatKey,
    steps: Vec<(ArithmeticOp, StatKey)>,
    source: ValidationGroup,
}

impl CompiledGroup {
    fn compile(group: &ValidationGroup) -> Result<Self> {
        let resolve = |name: &str| {
            StatKey::from_name(name).ok_or_else(|| LoadoutError::UnknownStat {
                stat: name.to_string(),
                context: format!("validation group {}", group.id),
            })
        };

        let (first, rest) = group.terms.split_first().ok_or_else(|| {
            LoadoutError::InvalidConfig(format!("validation group {} has no stats", group.id))
        })?;

        let seed = resolve(&first.stat)?;
        let steps = rest
            .iter()
            .map(|term| resolve(&term.stat).map(|key| (term.op, key)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            seed,
            steps,
            source: group.clone(),
        })
    }

    fn fold(&self, stats: &StatVector) -> f64 {
        self.steps
            .iter()
            .fold(stats.numeric(self.seed), |acc, &(op, key)| {
                op.apply(acc, stats.numeric(key))
            })
    }

    fn aggregate(&self, combination: &Combination) -> f64 {
        combination.iter().map(|item| self.fold(&item.stats)).sum()
    }

    fn passes(&self, combination: &Combination) -> bool {
        self.source.bounds_hold(self.aggregate(combination))
    }
}

/// The validator built from an ordered list of validation groups.
///
/// # Examples
///
/// ```
/// use u_loadout::validation::{LogicalOp, ValidationGroup, Validator};
///
/// let validator = Validator::new(&[
///     ValidationGroup::new(1).with_stat("Life").with_min(100.0).with_next(LogicalOp::Or),
///     ValidationGroup::new(2).with_stat("EnergyShield").with_min(300.0),
///     ValidationGroup::new(3), // no stats: ignored
/// ]).unwrap();
///
/// assert_eq!(validator.active_group_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    groups: Vec<CompiledGroup>,
}

impl Validator {
    /// Compiles the active groups, in order.
    ///
    /// # Errors
    ///
    /// [`LoadoutError::UnknownStat`] if a term names no numeric stat.
    pub fn new(groups: &[ValidationGroup]) -> Result<Self> {
        let groups = groups
            .iter()
            .filter(|g| g.is_active())
            .map(CompiledGroup::compile)
            .collect::<Result<Vec<_>>>()?;

        debug!(active_groups = groups.len(), "validator compiled");
        Ok(Self { groups })
    }

    /// Number of groups taking part in validation.
    pub fn active_group_count(&self) -> usize {
        self.groups.len()
    }

    /// `true` when no group is active; such a validator accepts everything.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Evaluates the whole rule against a combination.
    pub fn evaluate(&self, combination: &Combination) -> bool {
        let mut groups = self.groups.iter();
        let Some(first) = groups.next() else {
            return true;
        };

        let mut result = first.passes(combination);
        let mut op: LogicalOp = first.source.next;
        for group in groups {
            result = op.apply(result, group.passes(combination));
            op = group.source.next;
        }
        result
    }

    /// Evaluates every active group separately.
    pub fn outcomes(&self, combination: &Combination) -> Vec<GroupOutcome> {
        self.groups
            .iter()
            .map(|g| {
                let aggregate = g.aggregate(combination);
                GroupOutcome {
                    id: g.source.id,
                    aggregate,
                    passed: g.source.bounds_hold(aggregate),
                }
            })
            .collect()
    }

    /// Whether the active group with `id` passes on its own, if any.
    pub fn passes_group(&self, id: u32, combination: &Combination) -> Option<bool> {
        self.groups
            .iter()
            .find(|g| g.source.id == id)
            .map(|g| g.passes(combination))
    }

    /// Aggregate of the active group with `id`, if any.
    pub fn group_aggregate(&self, id: u32, combination: &Combination) -> Option<f64> {
        self.groups
            .iter()
            .find(|g| g.source.id == id)
            .map(|g| g.aggregate(combination))
    }
}

impl CombinationValidator for Validator {
    fn validate(&self, combination: &Combination) -> Result<bool> {
        Ok(self.evaluate(combination))
    }
}

/// Folds one item's stats over the terms of a group.
///
/// Convenience for editors previewing a single item; unknown stat names
/// are reported instead of being treated as zero.
pub fn fold_item(group: &ValidationGroup, stats: &StatVector) -> Result<f64> {
    Ok(CompiledGroup::compile(group)?.fold(stats))
}

// ============================================================================
// Tests
// ============================================================================
