//! Parallel bounded top-K selection.
//!
//! The input is split into roughly one rayon job per thread. Each job scores
//! its chunks into a local min-heap holding at most K entries, and local
//! heaps are then merged into one shared heap of the same bound under a
//! single lock, so the lock is taken about once per thread.
//!
//! Without the `parallel` feature the chunks are scored in order into a
//! single heap.

use std::cmp::{Ordering as CmpOrdering, Reverse};
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "parallel")]
use parking_lot::Mutex;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use super::engine::ScoringEngine;
use super::types::ScoredCombination;
use crate::combination::Combination;

/// Combinations scored between two cancellation checks.
const CHUNK_SIZE: usize = 64;

/// Heap entry ordered by score only.
#[derive(Debug)]
struct Entry(ScoredCombination);

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == CmpOrdering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.0.score.total_cmp(&other.0.score)
    }
}

/// Min-heap keeping the `capacity` highest scores seen.
#[derive(Debug)]
struct BoundedMinHeap {
    capacity: usize,
    heap: BinaryHeap<Reverse<Entry>>,
}

impl BoundedMinHeap {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity.min(1 << 16)),
        }
    }

    /// Whether an entry with `score` would be kept.
    fn admits(&self, score: f64) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.heap.len() < self.capacity {
            return true;
        }
        match self.heap.peek() {
            Some(Reverse(min)) => score.total_cmp(&min.0.score) == CmpOrdering::Greater,
            None => true,
        }
    }

    fn push(&mut self, entry: ScoredCombination) {
        if !self.admits(entry.score) {
            return;
        }
        if self.heap.len() == self.capacity {
            self.heap.pop();
        }
        self.heap.push(Reverse(Entry(entry)));
    }

    fn merge(&mut self, other: BoundedMinHeap) {
        for Reverse(Entry(entry)) in other.heap {
            self.push(entry);
        }
    }

    /// Drains ascending, then reverses into descending order.
    fn into_descending(mut self) -> Vec<ScoredCombination> {
        let mut out = Vec::with_capacity(self.heap.len());
        while let Some(Reverse(Entry(entry))) = self.heap.pop() {
            out.push(entry);
        }
        out.reverse();
        out
    }
}

/// Result of a selection.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    /// Entries, highest score first when `ranked`.
    pub entries: Vec<ScoredCombination>,
    /// Whether entries were ordered by score.
    pub ranked: bool,
    /// Whether scoring stopped early.
    pub cancelled: bool,
}

impl Ranking {
    /// Lists up to `limit` combinations in input order with a zero score.
    ///
    /// Used when no tier is configured.
    pub fn unranked(combinations: &[Combination], limit: usize) -> Self {
        Self {
            entries: combinations
                .iter()
                .take(limit)
                .map(|c| ScoredCombination {
                    combination: c.clone(),
                    score: 0.0,
                })
                .collect(),
            ranked: false,
            cancelled: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<&ScoredCombination> {
        self.entries.first()
    }
}

/// Selects the K best-scoring combinations without sorting everything.
pub struct TopKSelector;

impl TopKSelector {
    /// Scores `combinations` with `engine` and returns the `k` best,
    /// highest score first.
    ///
    /// Returns exactly `min(k, combinations.len())` entries. Equal scores
    /// come back in no particular order.
    pub fn select(
        engine: &ScoringEngine,
        combinations: &[Combination],
        k: usize,
    ) -> Vec<ScoredCombination> {
        Self::select_by(combinations, k, |c| engine.score(c), None).entries
    }

    /// Like [`select`](Self::select), falling back to
    /// [`Ranking::unranked`] when the engine cannot rank, and honouring
    /// a cancellation flag.
    pub fn select_with_cancel(
        engine: &ScoringEngine,
        combinations: &[Combination],
        k: usize,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Ranking {
        if !engine.is_ranking_enabled() {
            return Ranking::unranked(combinations, k);
        }
        Self::select_by(combinations, k, |c| engine.score(c), cancel)
    }

    /// Selects the `k` best combinations under an arbitrary score function.
    ///
    /// If `cancel` is set while scoring, remaining chunks are skipped and
    /// the ranking covers only what was scored.
    pub fn select_by<F>(
        combinations: &[Combination],
        k: usize,
        score: F,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Ranking
    where
        F: Fn(&Combination) -> f64 + Sync,
    {
        let started = Instant::now();
        let skipped = AtomicBool::new(false);

        let entries = if k > 0 {
            collect_top(combinations, k, &score, cancel.as_deref(), &skipped).into_descending()
        } else {
            Vec::new()
        };
        let cancelled = skipped.load(Ordering::Relaxed);
        info!(
            event = "topk_end",
            candidates = combinations.len(),
            k = k,
            selected = entries.len(),
            cancelled = cancelled,
            duration_ms = started.elapsed().as_millis() as u64,
        );

        Ranking {
            entries,
            ranked: true,
            cancelled,
        }
    }
}

/// Scores one chunk into `heap`, unless `cancel` is set.
fn scan_chunk<F>(
    heap: &mut BoundedMinHeap,
    chunk: &[Combination],
    score: &F,
    cancel: Option<&AtomicBool>,
    skipped: &AtomicBool,
) where
    F: Fn(&Combination) -> f64,
{
    if cancel.is_some_and(|f| f.load(Ordering::Relaxed)) {
        skipped.store(true, Ordering::Relaxed);
        return;
    }
    for c in chunk {
        let s = score(c);
        if heap.admits(s) {
            heap.push(ScoredCombination {
                combination: c.clone(),
                score: s,
            });
        }
    }
}

#[cfg(feature = "parallel")]
fn collect_top<F>(
    combinations: &[Combination],
    k: usize,
    score: &F,
    cancel: Option<&AtomicBool>,
    skipped: &AtomicBool,
) -> BoundedMinHeap
where
    F: Fn(&Combination) -> f64 + Sync,
{
    let chunks = combinations.len().div_ceil(CHUNK_SIZE);
    let per_job = chunks.div_ceil(rayon::current_num_threads().max(1)).max(1);
    let shared = Mutex::new(BoundedMinHeap::new(k));

    combinations
        .par_chunks(CHUNK_SIZE)
        .with_min_len(per_job)
        .fold(
            || BoundedMinHeap::new(k),
            |mut local, chunk| {
                scan_chunk(&mut local, chunk, score, cancel, skipped);
                local
            },
        )
        .for_each(|local| shared.lock().merge(local));

    shared.into_inner()
}

#[cfg(not(feature = "parallel"))]
fn collect_top<F>(
    combinations: &[Combination],
    k: usize,
    score: &F,
    cancel: Option<&AtomicBool>,
    skipped: &AtomicBool,
) -> BoundedMinHeap
where
    F: Fn(&Combination) -> f64 + Sync,
{
    let mut heap = BoundedMinHeap::new(k);
    for chunk in combinations.chunks(CHUNK_SIZE) {
        scan_chunk(&mut heap, chunk, score, cancel, skipped);
    }
    heap
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Item, StatKey, StatVector};
    use crate::scoring::Tier;

    fn combos(lives: &[f64]) -> Vec<Combination> {
        lives
            .iter()
            .enumerate()
            .map(|(i, &life)| {
                Combination::new(vec![Arc::new(
                    Item::new(i as u32, format!("item{i}"), "Ring")
                        .with_stats(StatVector::new().with(StatKey::Life, life)),
                )])
            })
            .collect()
    }

    fn life(c: &Combination) -> f64 {
        c.stat_total(StatKey::Life)
    }

    /// Deterministic scattered values.
    fn scattered(n: usize) -> Vec<f64> {
        (0..n).map(|i| ((i * 7919) % 1009) as f64).collect()
    }

    #[test]
    fn test_returns_min_k_n_descending() {
        let values = scattered(1000);
        let all = combos(&values);

        for k in [1, 5, 64, 999, 1000, 5000] {
            let ranking = TopKSelector::select_by(&all, k, life, None);
            assert_eq!(ranking.len(), k.min(all.len()));
            assert!(ranking
                .entries
                .windows(2)
                .all(|w| w[0].score >= w[1].score));
        }
    }

    #[test]
    fn test_matches_full_sort() {
        let values = scattered(2000);
        let all = combos(&values);
        let ranking = TopKSelector::select_by(&all, 50, life, None);

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        let got: Vec<f64> = ranking.entries.iter().map(|e| e.score).collect();
        assert_eq!(got, sorted[..50].to_vec());
    }

    #[test]
    fn test_large_input_matches_full_sort() {
        let values: Vec<f64> = (0..20_000).map(|i| ((i * 104_729) % 10_007) as f64).collect();
        let all = combos(&values);
        let ranking = TopKSelector::select_by(&all, 100, life, None);

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        let got: Vec<f64> = ranking.entries.iter().map(|e| e.score).collect();
        assert_eq!(got, sorted[..100].to_vec());
        assert!(!ranking.cancelled);
    }

    #[test]
    fn test_includes_global_maximum() {
        let mut values = scattered(500);
        values[321] = 10_000.0;
        let all = combos(&values);
        let ranking = TopKSelector::select_by(&all, 3, life, None);
        let best = ranking.best().unwrap();
        assert_eq!(best.score, 10_000.0);
        assert_eq!(best.combination, all[321]);
    }

    #[test]
    fn test_ties_fill_exactly_k() {
        let all = combos(&[5.0; 100]);
        let ranking = TopKSelector::select_by(&all, 10, life, None);
        assert_eq!(ranking.len(), 10);
        assert!(ranking.entries.iter().all(|e| e.score == 5.0));
    }

    #[test]
    fn test_k_zero_and_empty_input() {
        let all = combos(&[1.0, 2.0]);
        assert!(TopKSelector::select_by(&all, 0, life, None).is_empty());
        assert!(TopKSelector::select_by(&[], 10, life, None).is_empty());
    }

    #[test]
    fn test_bounded_heap_replaces_only_strictly_greater() {
        let all = combos(&[3.0, 2.0, 2.0, 2.5]);
        let scored = |i: usize| ScoredCombination {
            combination: all[i].clone(),
            score: life(&all[i]),
        };

        let mut heap = BoundedMinHeap::new(2);
        heap.push(scored(0));
        heap.push(scored(1));
        // Full, minimum is 2.0: an equal score is not admitted.
        assert!(!heap.admits(2.0));
        heap.push(scored(2));
        let out = heap.into_descending();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].combination, all[0]);
        assert_eq!(out[1].combination, all[1]);

        let mut heap = BoundedMinHeap::new(2);
        heap.push(scored(0));
        heap.push(scored(1));
        assert!(heap.admits(2.5));
        heap.push(scored(3));
        let out = heap.into_descending();
        let scores: Vec<f64> = out.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![3.0, 2.5]);
    }

    #[test]
    fn test_cancelled_before_start() {
        let all = combos(&scattered(300));
        let cancel = Arc::new(AtomicBool::new(true));
        let ranking = TopKSelector::select_by(&all, 10, life, Some(cancel));
        assert!(ranking.cancelled);
        assert!(ranking.is_empty());
    }

    #[test]
    fn test_select_with_engine() {
        let all = combos(&[10.0, 40.0, 20.0, 30.0]);
        let pool: Vec<Item> = all
            .iter()
            .flat_map(|c| c.iter().cloned())
            .collect();
        let tiers = vec![Tier::new(1, "Life", 100.0).with_stat("Life", 1.0)];
        let engine = ScoringEngine::new(&tiers, &pool).unwrap();

        let top = TopKSelector::select(&engine, &all, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].combination, all[1]);
        assert!((top[0].score - 1.0).abs() < 1e-12);
        assert_eq!(top[1].combination, all[3]);
    }

    #[test]
    fn test_select_with_cancel_falls_back_to_unranked() {
        let all = combos(&[10.0, 40.0, 20.0]);
        let engine = ScoringEngine::new(&[], std::iter::empty()).unwrap();
        let ranking = TopKSelector::select_with_cancel(&engine, &all, 2, None);
        assert!(!ranking.ranked);
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking.entries[0].combination, all[0]);
        assert_eq!(ranking.entries[1].score, 0.0);
    }
}
