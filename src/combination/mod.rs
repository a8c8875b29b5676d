//! Combination generation.
//!
//! Enumerates every loadout made of two distinct rings plus one item from
//! each other equipment class, filters candidates through a cheap
//! pre-filter and a user validator, and collects the survivors.
//!
//! # Key Types
//!
//! - [`CombinationGenerator`]: counts and enumerates the search space in parallel
//! - [`GeneratorConfig`]: storage cap, filter strategy, reporting strides
//! - [`CombinationValidator`]: the predicate a combination must satisfy
//! - [`CombinationResult`]: counters, stored combinations and [`RunStatus`]
//! - [`ProgressSink`]: receiver of throttled [`ProgressReport`]s

mod config;
mod generator;
mod types;

pub use config::GeneratorConfig;
pub use generator::CombinationGenerator;
pub use types::{
    predicate, AcceptAll, Combination, CombinationResult, CombinationValidator, FilterStrategy,
    PredicateFn, ProgressReport, ProgressSink, RunStatus,
};
