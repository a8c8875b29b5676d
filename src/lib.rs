//! Equipment loadout optimization.
//!
//! Finds the best loadouts in a pool of items, where a loadout is two
//! distinct rings plus exactly one item from every other equipment class:
//!
//! - **Generation**: parallel exhaustive enumeration of the search space,
//!   with a cheap pre-filter, a user validator, a storage cap, progress
//!   reporting and cooperative cancellation.
//! - **Validation**: rules made of stat groups folded with `+ - * /`,
//!   bounded by min/max thresholds and chained with AND/OR/XOR.
//! - **Scoring**: weighted tiers of stats, normalized against the pool.
//! - **Ranking**: parallel bounded top-K selection.
//! - **Progress**: smoothed throughput and remaining-time estimates.
//!
//! # Usage
//!
//! ```
//! use u_loadout::combination::{CombinationGenerator, GeneratorConfig};
//! use u_loadout::item::{Item, ItemPool, StatKey, StatVector};
//! use u_loadout::scoring::{ScoringEngine, Tier, TopKSelector};
//! use u_loadout::validation::{ValidationGroup, Validator};
//!
//! let life = |v: f64| StatVector::new().with(StatKey::Life, v);
//! let pool = ItemPool::classify(vec![
//!     Item::new(1, "Coral Ring", "Ring").with_stats(life(20.0)),
//!     Item::new(2, "Iron Ring", "Ring").with_stats(life(5.0)),
//!     Item::new(3, "Gold Ring", "Ring").with_stats(life(40.0)),
//!     Item::new(4, "Leather Belt", "Belt").with_stats(life(30.0)),
//!     Item::new(5, "Chain Belt", "Belt").with_stats(life(10.0)),
//! ]);
//!
//! let rule = Validator::new(&[ValidationGroup::new(1).with_stat("Life").with_min(50.0)])?;
//! let result = CombinationGenerator::generate(&pool, &rule, &GeneratorConfig::default())?;
//! assert_eq!(result.processed, 6);
//!
//! let tiers = vec![Tier::new(1, "Life", 100.0).with_stat("Life", 1.0)];
//! let engine = ScoringEngine::new(&tiers, pool.items())?;
//! let best = TopKSelector::select(&engine, &result.combinations, 1);
//! assert_eq!(best[0].combination.stat_total(StatKey::Life), 90.0);
//! # Ok::<(), u_loadout::LoadoutError>(())
//! ```

pub mod combination;
pub mod error;
pub mod item;
pub mod progress;
pub mod scoring;
pub mod validation;

pub use error::{LoadoutError, Result};
