//! Weighted scoring and top-K ranking of valid combinations.
//!
//! # Key Types
//!
//! - [`Tier`]: a weighted group of stat weights
//! - [`ScoringEngine`]: pool-normalized score of a combination
//! - [`TopKSelector`]: parallel selection of the K best combinations
//! - [`Ranking`]: selection result, ranked or listed in input order
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use u_loadout::combination::Combination;
//! use u_loadout::item::{Item, StatKey, StatVector};
//! use u_loadout::scoring::{ScoringEngine, Tier, TopKSelector};
//!
//! let items: Vec<Item> = (0..4)
//!     .map(|i| {
//!         Item::new(i, format!("ring{i}"), "Ring")
//!             .with_stats(StatVector::new().with(StatKey::Life, 10.0 * f64::from(i)))
//!     })
//!     .collect();
//! let combos: Vec<Combination> = items
//!     .iter()
//!     .map(|i| Combination::new(vec![Arc::new(i.clone())]))
//!     .collect();
//!
//! let tiers = vec![Tier::new(1, "Life", 100.0).with_stat("Life", 1.0)];
//! let engine = ScoringEngine::new(&tiers, &items).unwrap();
//! let top = TopKSelector::select(&engine, &combos, 2);
//!
//! assert_eq!(top.len(), 2);
//! assert_eq!(top[0].combination.ids().next(), Some(items[3].id));
//! ```

mod engine;
mod topk;
mod types;

pub use engine::ScoringEngine;
pub use topk::{Ranking, TopKSelector};
pub use types::{ScoredCombination, StatRange, Tier};
