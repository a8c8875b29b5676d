//! Parallel enumeration of loadout combinations.
//!
//! The search space is modelled as a list of dimensions: dimension 0 holds
//! every unordered ring pair, dimension `1 + i` holds the items of the
//! `i`-th non-ring class. The largest dimension is the pivot; each pivot
//! index is one shard, and a worker walks the remaining dimensions of its
//! shard with an odometer. Every element of the space is therefore visited
//! exactly once.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use num_bigint::BigUint;
use parking_lot::Mutex;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::config::GeneratorConfig;
use super::types::{
    percent, Combination, CombinationResult, CombinationValidator, FilterStrategy,
    ProgressReport, ProgressSink, RunStatus,
};
use crate::error::{LoadoutError, Result};
use crate::item::{Item, ItemId, ItemPool};

/// Enumerates, filters and collects valid combinations.
///
/// # Usage
///
/// ```
/// use u_loadout::combination::{AcceptAll, CombinationGenerator, GeneratorConfig};
/// use u_loadout::item::{Item, ItemPool};
///
/// let pool = ItemPool::classify(vec![
///     Item::new(1, "Iron Ring", "Ring"),
///     Item::new(2, "Coral Ring", "Ring"),
///     Item::new(3, "Paua Ring", "Ring"),
///     Item::new(4, "Onyx Amulet", "Amulet"),
/// ]);
///
/// let total = CombinationGenerator::total_combinations(&pool);
/// assert_eq!(total, 3u32.into());
///
/// let result = CombinationGenerator::generate(&pool, &AcceptAll, &GeneratorConfig::default()).unwrap();
/// assert_eq!(result.valid, 3);
/// ```
pub struct CombinationGenerator;

impl CombinationGenerator {
    /// Size of the search space: `C(rings, 2) × Π |class|`.
    ///
    /// Rings are counted by distinct id. Computed with arbitrary precision,
    /// independently of enumeration.
    pub fn total_combinations(pool: &ItemPool) -> BigUint {
        let rings = BigUint::from(pool.distinct_rings().len());
        let pairs = if rings < BigUint::from(2u32) {
            BigUint::from(0u32)
        } else {
            &rings * (&rings - 1u32) / 2u32
        };
        pool.classes()
            .values()
            .fold(pairs, |acc, items| acc * BigUint::from(items.len()))
    }

    /// Runs a generation without pre-filter hint, progress or cancellation.
    pub fn generate<V>(
        pool: &ItemPool,
        validator: &V,
        config: &GeneratorConfig,
    ) -> Result<CombinationResult>
    where
        V: CombinationValidator + ?Sized,
    {
        Self::generate_with(pool, validator, config, None, None, None)
    }

    /// Runs a generation.
    ///
    /// `tiered_items` is required by the `Balanced` and `Strict` filter
    /// strategies. If `cancel` is set while running, workers stop at their
    /// next check and the result carries [`RunStatus::Cancelled`].
    ///
    /// # Errors
    ///
    /// Setup errors (invalid config, fewer than two distinct rings, an
    /// empty class, missing tiered items) are returned before enumeration.
    /// An error from `validator` aborts every worker and is returned as is.
    pub fn generate_with<V>(
        pool: &ItemPool,
        validator: &V,
        config: &GeneratorConfig,
        tiered_items: Option<&HashSet<ItemId>>,
        progress: Option<&dyn ProgressSink>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<CombinationResult>
    where
        V: CombinationValidator + ?Sized,
    {
        config.validate().map_err(LoadoutError::InvalidConfig)?;

        let no_tiers = HashSet::new();
        let tiered = match (config.filter.needs_tiered_items(), tiered_items) {
            (false, _) => &no_tiers,
            (true, Some(set)) => set,
            (true, None) => {
                return Err(LoadoutError::MissingTieredItems {
                    strategy: config.filter.name(),
                })
            }
        };

        let space = SearchSpace::new(pool)?;
        let total = space.total();
        let shards = space.dims[space.pivot];

        info!(
            event = "generation_start",
            total = %total,
            shards = shards,
            pivot = space.dimension_name(space.pivot),
            filter = config.filter.name(),
            parallel = config.parallel,
        );

        let ctx = RunContext::new(total, config, progress, cancel);
        let walk = |shard: usize| {
            space.walk(shard, &ctx, validator, config.filter, tiered, config.cancel_check_interval)
        };

        if let Err(err) = run_shards(shards, config.parallel, walk) {
            warn!(event = "generation_failed", error = %err);
            return Err(err);
        }

        let result = ctx.finish();
        let secs = result.elapsed.as_secs_f64();
        let speed = if secs > 0.0 {
            (result.processed as f64 / secs) as u64
        } else {
            0
        };
        let event = match result.status {
            RunStatus::Completed => "generation_end",
            RunStatus::Cancelled => "generation_cancelled",
        };
        info!(
            event = event,
            processed = result.processed,
            valid = result.valid,
            stored = result.combinations.len(),
            duration_ms = result.elapsed.as_millis() as u64,
            speed = speed,
        );

        Ok(result)
    }
}

/// Validated, index-addressable enumeration space.
struct SearchSpace {
    pairs: Vec<(Arc<Item>, Arc<Item>)>,
    class_names: Vec<String>,
    classes: Vec<Vec<Arc<Item>>>,
    dims: Vec<usize>,
    pivot: usize,
}

impl SearchSpace {
    fn new(pool: &ItemPool) -> Result<Self> {
        let rings = pool.distinct_rings();
        if rings.len() < 2 {
            return Err(LoadoutError::InsufficientRings {
                distinct: rings.len(),
            });
        }
        if let Some((class, _)) = pool.classes().iter().find(|(_, items)| items.is_empty()) {
            return Err(LoadoutError::EmptyClass {
                class: class.clone(),
            });
        }

        let mut pairs = Vec::with_capacity(rings.len() * (rings.len() - 1) / 2);
        for (i, a) in rings.iter().enumerate() {
            for b in &rings[i + 1..] {
                pairs.push((Arc::clone(a), Arc::clone(b)));
            }
        }

        let class_names: Vec<String> = pool.classes().keys().cloned().collect();
        let classes: Vec<Vec<Arc<Item>>> = pool.classes().values().cloned().collect();

        let mut dims = Vec::with_capacity(classes.len() + 1);
        dims.push(pairs.len());
        dims.extend(classes.iter().map(Vec::len));

        // First largest dimension.
        let pivot = dims
            .iter()
            .enumerate()
            .fold(0, |best, (d, &len)| if len > dims[best] { d } else { best });

        debug!(
            ring_pairs = pairs.len(),
            classes = classes.len(),
            pivot = pivot,
            "search space prepared"
        );

        Ok(Self {
            pairs,
            class_names,
            classes,
            dims,
            pivot,
        })
    }

    fn total(&self) -> BigUint {
        self.dims
            .iter()
            .fold(BigUint::from(1u32), |acc, &len| acc * BigUint::from(len))
    }

    fn dimension_name(&self, dim: usize) -> &str {
        if dim == 0 {
            "ring pairs"
        } else {
            &self.class_names[dim - 1]
        }
    }

    /// Builds the combination addressed by `idx`.
    fn combination_at(&self, idx: &[usize]) -> Combination {
        let (a, b) = &self.pairs[idx[0]];
        let mut items = Vec::with_capacity(self.classes.len() + 2);
        items.push(Arc::clone(a));
        items.push(Arc::clone(b));
        for (d, list) in self.classes.iter().enumerate() {
            items.push(Arc::clone(&list[idx[d + 1]]));
        }
        Combination::new(items)
    }

    /// Rewrites the slots of dimensions `from..` to match `idx`.
    fn refill(&self, current: &mut Combination, idx: &[usize], from: usize) {
        for (d, &i) in idx.iter().enumerate().skip(from) {
            if d == 0 {
                let (a, b) = &self.pairs[i];
                current.set_slot(0, a);
                current.set_slot(1, b);
            } else {
                current.set_slot(d + 1, &self.classes[d - 1][i]);
            }
        }
    }

    /// Walks every combination of one shard.
    fn walk<V>(
        &self,
        shard: usize,
        ctx: &RunContext<'_>,
        validator: &V,
        filter: FilterStrategy,
        tiered: &HashSet<ItemId>,
        check_every: usize,
    ) -> Result<()>
    where
        V: CombinationValidator + ?Sized,
    {
        if ctx.should_stop() {
            return Ok(());
        }

        let mut idx = vec![0usize; self.dims.len()];
        idx[self.pivot] = shard;
        let mut current = self.combination_at(&idx);
        let mut pending = 0usize;

        loop {
            if filter.accepts(&current, tiered) {
                match validator.validate(&current) {
                    Ok(true) => ctx.record_valid(&current),
                    Ok(false) => {}
                    Err(err) => {
                        ctx.abort();
                        ctx.add_processed(pending as u64 + 1);
                        return Err(err);
                    }
                }
            }

            pending += 1;
            if pending == check_every {
                ctx.add_processed(pending as u64);
                pending = 0;
                if ctx.should_stop() {
                    return Ok(());
                }
            }

            match advance(&mut idx, &self.dims, self.pivot) {
                Some(from) => self.refill(&mut current, &idx, from),
                None => break,
            }
        }

        ctx.add_processed(pending as u64);
        Ok(())
    }
}

/// Runs `walk` once per shard, stopping at the first error.
#[cfg(feature = "parallel")]
fn run_shards<F>(shards: usize, parallel: bool, walk: F) -> Result<()>
where
    F: Fn(usize) -> Result<()> + Send + Sync,
{
    if parallel {
        (0..shards).into_par_iter().try_for_each(walk)
    } else {
        (0..shards).try_for_each(walk)
    }
}

/// Runs `walk` once per shard, in order, stopping at the first error.
#[cfg(not(feature = "parallel"))]
fn run_shards<F>(shards: usize, _parallel: bool, walk: F) -> Result<()>
where
    F: Fn(usize) -> Result<()>,
{
    (0..shards).try_for_each(walk)
}

/// Odometer step over every dimension except `pivot`.
///
/// Returns the outermost dimension that changed, or `None` once the shard
/// is exhausted.
fn advance(idx: &mut [usize], dims: &[usize], pivot: usize) -> Option<usize> {
    for d in (0..dims.len()).rev() {
        if d == pivot {
            continue;
        }
        idx[d] += 1;
        if idx[d] < dims[d] {
            return Some(d);
        }
        idx[d] = 0;
    }
    None
}

/// Mutable state of one run, shared by reference with every worker.
struct RunContext<'a> {
    total: BigUint,
    processed: AtomicU64,
    valid: AtomicU64,
    reserved: AtomicUsize,
    cap: usize,
    store: Mutex<Vec<Combination>>,
    progress_interval: u64,
    progress: Option<&'a dyn ProgressSink>,
    cancel: Option<Arc<AtomicBool>>,
    cancelled: AtomicBool,
    aborted: AtomicBool,
    started: Instant,
}

impl<'a> RunContext<'a> {
    fn new(
        total: BigUint,
        config: &GeneratorConfig,
        progress: Option<&'a dyn ProgressSink>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            total,
            processed: AtomicU64::new(0),
            valid: AtomicU64::new(0),
            reserved: AtomicUsize::new(0),
            cap: config.max_valid_to_store,
            store: Mutex::new(Vec::with_capacity(config.max_valid_to_store.min(4096))),
            progress_interval: config.progress_interval,
            progress,
            cancel,
            cancelled: AtomicBool::new(false),
            aborted: AtomicBool::new(false),
            started: Instant::now(),
        }
    }

    fn should_stop(&self) -> bool {
        if self.aborted.load(Ordering::Relaxed) {
            return true;
        }
        match self.cancel {
            Some(ref flag) if flag.load(Ordering::Relaxed) => {
                self.cancelled.store(true, Ordering::Relaxed);
                true
            }
            _ => false,
        }
    }

    fn abort(&self) {
        self.aborted.store(true, Ordering::Relaxed);
    }

    fn record_valid(&self, combination: &Combination) {
        self.valid.fetch_add(1, Ordering::Relaxed);
        if self.reserved.load(Ordering::Relaxed) < self.cap
            && self.reserved.fetch_add(1, Ordering::Relaxed) < self.cap
        {
            self.store.lock().push(combination.clone());
        }
    }

    /// Adds to the processed counter and reports when a stride is crossed.
    fn add_processed(&self, n: u64) {
        if n == 0 {
            return;
        }
        let before = self.processed.fetch_add(n, Ordering::Relaxed);
        let after = before + n;
        if let Some(sink) = self.progress {
            if before / self.progress_interval != after / self.progress_interval {
                sink.report(&self.snapshot(after));
            }
        }
    }

    fn snapshot(&self, processed: u64) -> ProgressReport {
        ProgressReport {
            processed,
            valid: self.valid.load(Ordering::Relaxed),
            total: self.total.clone(),
            percent_complete: percent(processed, &self.total),
            elapsed: self.started.elapsed(),
        }
    }

    fn finish(self) -> CombinationResult {
        let processed = self.processed.load(Ordering::Relaxed);
        let cancelled =
            self.cancelled.load(Ordering::Relaxed) && BigUint::from(processed) < self.total;
        let status = if cancelled {
            RunStatus::Cancelled
        } else {
            RunStatus::Completed
        };

        if let Some(sink) = self.progress {
            sink.report(&self.snapshot(processed));
        }

        CombinationResult {
            processed,
            valid: self.valid.load(Ordering::Relaxed),
            elapsed: self.started.elapsed(),
            combinations: self.store.into_inner(),
            status,
            total: self.total,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combination::{predicate, AcceptAll};
    use std::collections::BTreeMap;

    fn item(id: u32, class: &str) -> Arc<Item> {
        Arc::new(Item::new(id, format!("{class} {id}"), class))
    }

    /// Rings get ids 100.., class `i` gets ids `(i + 2) * 100..`.
    fn pool(rings: usize, classes: &[(&str, usize)]) -> ItemPool {
        let ring_items = (0..rings).map(|i| item(100 + i as u32, "Ring")).collect();
        let mut map = BTreeMap::new();
        for (c, &(name, len)) in classes.iter().enumerate() {
            let base = (c as u32 + 2) * 100;
            map.insert(
                name.to_string(),
                (0..len).map(|i| item(base + i as u32, name)).collect(),
            );
        }
        ItemPool::from_parts(map, ring_items)
    }

    fn sequential() -> GeneratorConfig {
        GeneratorConfig::default().with_parallel(false)
    }

    // ---- Counting ----

    #[test]
    fn test_total_combinations_example() {
        let p = pool(3, &[("Amulet", 2), ("Belt", 1)]);
        assert_eq!(CombinationGenerator::total_combinations(&p), BigUint::from(6u32));
    }

    #[test]
    fn test_total_combinations_rings_only() {
        let p = pool(5, &[]);
        assert_eq!(CombinationGenerator::total_combinations(&p), BigUint::from(10u32));
    }

    #[test]
    fn test_total_combinations_counts_distinct_rings() {
        let ring = item(1, "Ring");
        let p = ItemPool::from_parts(BTreeMap::new(), vec![ring.clone(), ring.clone(), ring]);
        assert_eq!(CombinationGenerator::total_combinations(&p), BigUint::from(0u32));
    }

    #[test]
    fn test_total_combinations_large_pool() {
        let classes: Vec<(&str, usize)> = vec![
            ("Amulet", 1000),
            ("Belt", 1000),
            ("Boots", 1000),
            ("Gloves", 1000),
            ("Helmet", 1000),
            ("BodyArmour", 1000),
            ("Weapon", 1000),
        ];
        let p = pool(100, &classes);
        let expected = BigUint::from(4950u32) * BigUint::from(1000u32).pow(7);
        assert_eq!(CombinationGenerator::total_combinations(&p), expected);
    }

    // ---- Enumeration ----

    fn assert_complete_enumeration(p: &ItemPool, config: &GeneratorConfig) {
        let result = CombinationGenerator::generate(p, &AcceptAll, config).unwrap();
        let total = CombinationGenerator::total_combinations(p);

        assert_eq!(result.status, RunStatus::Completed);
        assert_eq!(BigUint::from(result.processed), total);
        assert_eq!(BigUint::from(result.valid), total);
        assert_eq!(BigUint::from(result.combinations.len()), total);

        let unique: HashSet<&Combination> = result.combinations.iter().collect();
        assert_eq!(unique.len(), result.combinations.len());

        let class_names: Vec<&String> = p.classes().keys().collect();
        for c in &result.combinations {
            assert_eq!(c.len(), class_names.len() + 2);
            assert!(c.items()[0].is_ring());
            assert!(c.items()[1].is_ring());
            assert_ne!(c.items()[0].id, c.items()[1].id);
            for (i, name) in class_names.iter().enumerate() {
                assert_eq!(&&c.items()[i + 2].class, name);
            }
        }
    }

    #[test]
    fn test_enumeration_parallel_pivot_on_rings() {
        let p = pool(6, &[("Amulet", 3), ("Belt", 2)]);
        assert_complete_enumeration(&p, &GeneratorConfig::default());
    }

    #[test]
    fn test_enumeration_parallel_pivot_on_class() {
        let p = pool(2, &[("Amulet", 2), ("Belt", 9), ("Boots", 3)]);
        assert_complete_enumeration(&p, &GeneratorConfig::default());
    }

    #[test]
    fn test_enumeration_sequential() {
        let p = pool(4, &[("Amulet", 3), ("Belt", 2)]);
        assert_complete_enumeration(&p, &sequential());
    }

    #[test]
    fn test_enumeration_rings_only() {
        let p = pool(4, &[]);
        assert_complete_enumeration(&p, &GeneratorConfig::default());
    }

    #[test]
    fn test_run_shards_visits_each_shard_and_stops_on_error() {
        for parallel in [true, false] {
            let seen = Mutex::new(Vec::new());
            run_shards(8, parallel, |s: usize| -> Result<()> {
                seen.lock().push(s);
                Ok(())
            })
            .unwrap();
            let mut got = seen.into_inner();
            got.sort_unstable();
            assert_eq!(got, (0..8).collect::<Vec<_>>());

            let err = run_shards(8, parallel, |s: usize| -> Result<()> {
                if s == 3 {
                    Err(LoadoutError::evaluation("shard 3", "failed"))
                } else {
                    Ok(())
                }
            })
            .unwrap_err();
            assert_eq!(err, LoadoutError::evaluation("shard 3", "failed"));
        }
    }

    #[test]
    fn test_advance_skips_pivot() {
        let dims = [2, 3];
        let mut idx = [1, 0];
        let mut seen = vec![idx];
        while advance(&mut idx, &dims, 0).is_some() {
            seen.push(idx);
        }
        assert_eq!(seen, vec![[1, 0], [1, 1], [1, 2]]);
    }

    // ---- Setup errors ----

    #[test]
    fn test_insufficient_rings() {
        let p = pool(1, &[("Amulet", 2)]);
        let err = CombinationGenerator::generate(&p, &AcceptAll, &sequential()).unwrap_err();
        assert_eq!(err, LoadoutError::InsufficientRings { distinct: 1 });
    }

    #[test]
    fn test_duplicate_rings_are_insufficient() {
        let ring = item(1, "Ring");
        let p = ItemPool::from_parts(BTreeMap::new(), vec![ring.clone(), ring]);
        let err = CombinationGenerator::generate(&p, &AcceptAll, &sequential()).unwrap_err();
        assert_eq!(err, LoadoutError::InsufficientRings { distinct: 1 });
    }

    #[test]
    fn test_empty_class() {
        let p = pool(3, &[("Amulet", 2), ("Belt", 0)]);
        let err = CombinationGenerator::generate(&p, &AcceptAll, &sequential()).unwrap_err();
        assert_eq!(
            err,
            LoadoutError::EmptyClass {
                class: "Belt".into()
            }
        );
    }

    #[test]
    fn test_missing_tiered_items() {
        let p = pool(3, &[("Amulet", 2)]);
        let err =
            CombinationGenerator::generate(&p, &AcceptAll, &GeneratorConfig::strict()).unwrap_err();
        assert!(matches!(err, LoadoutError::MissingTieredItems { .. }));
    }

    #[test]
    fn test_invalid_config() {
        let p = pool(3, &[("Amulet", 2)]);
        let config = GeneratorConfig::default().with_progress_interval(0);
        let err = CombinationGenerator::generate(&p, &AcceptAll, &config).unwrap_err();
        assert!(matches!(err, LoadoutError::InvalidConfig(_)));
    }

    // ---- Filtering and storage ----

    #[test]
    fn test_validator_rejects() {
        let p = pool(4, &[("Amulet", 3)]);
        // Keep only combinations containing ring 100.
        let v = predicate(|c: &Combination| c.contains(ItemId(100)));
        let result = CombinationGenerator::generate(&p, &v, &GeneratorConfig::default()).unwrap();
        assert_eq!(result.processed, 18);
        assert_eq!(result.valid, 9);
        assert!(result.combinations.iter().all(|c| c.contains(ItemId(100))));
    }

    #[test]
    fn test_store_cap() {
        let p = pool(4, &[("Amulet", 2)]);
        let config = GeneratorConfig::default().with_max_valid_to_store(5);
        let result = CombinationGenerator::generate(&p, &AcceptAll, &config).unwrap();
        assert_eq!(result.valid, 12);
        assert_eq!(result.combinations.len(), 5);
        assert_eq!(result.dropped(), 7);
    }

    #[test]
    fn test_balanced_filter() {
        let p = pool(3, &[("Amulet", 2)]);
        let tiered: HashSet<ItemId> = [ItemId(200)].into_iter().collect();
        let result = CombinationGenerator::generate_with(
            &p,
            &AcceptAll,
            &GeneratorConfig::balanced(),
            Some(&tiered),
            None,
            None,
        )
        .unwrap();
        assert_eq!(result.processed, 6);
        assert_eq!(result.valid, 3);
    }

    #[test]
    fn test_strict_filter() {
        let p = pool(3, &[("Amulet", 2)]);
        let tiered: HashSet<ItemId> = [100, 101, 200].into_iter().map(ItemId).collect();
        let result = CombinationGenerator::generate_with(
            &p,
            &AcceptAll,
            &GeneratorConfig::strict(),
            Some(&tiered),
            None,
            None,
        )
        .unwrap();
        assert_eq!(result.valid, 1);
        let ids: Vec<ItemId> = result.combinations[0].ids().collect();
        assert_eq!(ids, vec![ItemId(100), ItemId(101), ItemId(200)]);
    }

    #[test]
    fn test_prefilter_skips_validator() {
        let p = pool(3, &[("Amulet", 2)]);
        let calls = AtomicU64::new(0);
        let v = predicate(|_: &Combination| {
            calls.fetch_add(1, Ordering::Relaxed);
            true
        });
        let tiered: HashSet<ItemId> = [ItemId(201)].into_iter().collect();
        let result = CombinationGenerator::generate_with(
            &p,
            &v,
            &GeneratorConfig::balanced(),
            Some(&tiered),
            None,
            None,
        )
        .unwrap();
        assert_eq!(result.valid, 3);
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    // ---- Faults ----

    #[test]
    fn test_validator_fault_aborts_run() {
        let p = pool(5, &[("Amulet", 4), ("Belt", 3)]);
        let v = |c: &Combination| -> Result<bool> {
            if c.contains(ItemId(302)) {
                Err(LoadoutError::evaluation("group 7", "stat overflow"))
            } else {
                Ok(true)
            }
        };
        let err = CombinationGenerator::generate(&p, &v, &GeneratorConfig::default()).unwrap_err();
        assert_eq!(err, LoadoutError::evaluation("group 7", "stat overflow"));
    }

    // ---- Cancellation ----

    #[test]
    fn test_cancel_mid_run() {
        let p = pool(10, &[("Amulet", 5), ("Belt", 4)]);
        let cancel = Arc::new(AtomicBool::new(false));
        let calls = AtomicU64::new(0);
        let flag = Arc::clone(&cancel);
        let v = predicate(move |_: &Combination| {
            if calls.fetch_add(1, Ordering::Relaxed) == 50 {
                flag.store(true, Ordering::Relaxed);
            }
            true
        });
        let config = sequential().with_cancel_check_interval(10);
        let result =
            CombinationGenerator::generate_with(&p, &v, &config, None, None, Some(cancel)).unwrap();

        assert_eq!(result.status, RunStatus::Cancelled);
        assert!(result.is_cancelled());
        assert!(BigUint::from(result.processed) < result.total);
        assert!(result.processed <= 60);
    }

    #[test]
    fn test_cancel_before_start() {
        let p = pool(4, &[("Amulet", 3)]);
        let cancel = Arc::new(AtomicBool::new(true));
        let result = CombinationGenerator::generate_with(
            &p,
            &AcceptAll,
            &GeneratorConfig::default(),
            None,
            None,
            Some(cancel),
        )
        .unwrap();
        assert_eq!(result.status, RunStatus::Cancelled);
        assert_eq!(result.processed, 0);
        assert!(result.combinations.is_empty());
    }

    // ---- Progress ----

    #[test]
    fn test_progress_reports_are_throttled_and_final() {
        let p = pool(6, &[("Amulet", 4), ("Belt", 5)]);
        let reports = Mutex::new(Vec::new());
        let sink = |r: &ProgressReport| reports.lock().push(r.clone());
        let config = GeneratorConfig::default()
            .with_progress_interval(50)
            .with_cancel_check_interval(10);
        let result =
            CombinationGenerator::generate_with(&p, &AcceptAll, &config, None, Some(&sink), None)
                .unwrap();

        let reports = reports.into_inner();
        assert_eq!(result.processed, 300);
        // One report per crossed stride at most, plus the final one.
        assert!(reports.len() >= 2);
        assert!(reports.len() <= 300 / 50 + 1);

        let last = reports.last().unwrap();
        assert_eq!(last.processed, 300);
        assert_eq!(last.valid, 300);
        assert!((last.percent_complete - 100.0).abs() < 1e-9);
        assert_eq!(last.total, BigUint::from(300u32));
    }
}
