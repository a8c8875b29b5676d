use std::collections::HashSet;

use num_bigint::BigUint;
use proptest::prelude::*;
use u_loadout::combination::{AcceptAll, Combination, CombinationGenerator, GeneratorConfig};
use u_loadout::item::{Item, ItemPool, StatKey, StatVector};
use u_loadout::scoring::TopKSelector;
use u_loadout::validation::{fold_item, ArithmeticOp, ValidationGroup};

/// `rings` rings followed by `sizes[i]` items of class `Class{i}`.
fn pool(rings: u32, sizes: &[u32]) -> ItemPool {
    let mut items = Vec::new();
    let mut id = 0;
    for _ in 0..rings {
        id += 1;
        items.push(Item::new(id, format!("ring{id}"), "Ring"));
    }
    for (class, &n) in sizes.iter().enumerate() {
        for _ in 0..n {
            id += 1;
            items.push(Item::new(id, format!("item{id}"), format!("Class{class}")));
        }
    }
    ItemPool::classify(items)
}

fn life_combos(values: &[f64]) -> Vec<Combination> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            Combination::new(vec![std::sync::Arc::new(
                Item::new(i as u32, format!("r{i}"), "Ring")
                    .with_stats(StatVector::new().with(StatKey::Life, v)),
            )])
        })
        .collect()
}

proptest! {
    #[test]
    fn enumeration_visits_every_combination_once(
        rings in 2u32..7,
        sizes in proptest::collection::vec(1u32..4, 0..4),
        parallel in any::<bool>(),
    ) {
        let pool = pool(rings, &sizes);
        let expected = u64::from(rings * (rings - 1) / 2)
            * sizes.iter().map(|&n| u64::from(n)).product::<u64>();
        prop_assert_eq!(
            CombinationGenerator::total_combinations(&pool),
            BigUint::from(expected)
        );

        let config = GeneratorConfig::default().with_parallel(parallel);
        let result = CombinationGenerator::generate(&pool, &AcceptAll, &config).unwrap();
        prop_assert_eq!(result.processed, expected);
        prop_assert_eq!(result.valid, expected);
        prop_assert!(!result.is_cancelled());

        let mut seen = HashSet::new();
        for combo in &result.combinations {
            prop_assert_eq!(combo.len(), 2 + sizes.len());
            prop_assert_eq!(combo.iter().filter(|i| i.is_ring()).count(), 2);
            let classes: HashSet<&str> = combo
                .iter()
                .filter(|i| !i.is_ring())
                .map(|i| i.class.as_str())
                .collect();
            prop_assert_eq!(classes.len(), sizes.len());

            let mut ids: Vec<u32> = combo.ids().map(|id| id.0).collect();
            ids.sort_unstable();
            prop_assert!(ids.windows(2).all(|w| w[0] != w[1]));
            prop_assert!(seen.insert(ids));
        }
        prop_assert_eq!(seen.len() as u64, expected);
    }

    #[test]
    fn top_k_is_bounded_sorted_and_keeps_the_best(
        values in proptest::collection::vec(-1_000.0f64..1_000.0, 0..400),
        k in 0usize..64,
    ) {
        let combos = life_combos(&values);
        let ranking = TopKSelector::select_by(
            &combos,
            k,
            |c| c.stat_total(StatKey::Life),
            None,
        );

        prop_assert_eq!(ranking.len(), k.min(values.len()));
        prop_assert!(ranking.entries.windows(2).all(|w| w[0].score >= w[1].score));

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        let got: Vec<f64> = ranking.entries.iter().map(|e| e.score).collect();
        prop_assert_eq!(got, sorted[..ranking.len()].to_vec());
    }

    #[test]
    fn division_by_zero_keeps_the_accumulator(
        life in -500.0f64..500.0,
        mana in -500.0f64..500.0,
    ) {
        let group = ValidationGroup::new(1)
            .with_stat("Life")
            .with_term(ArithmeticOp::Add, "Mana")
            .with_term(ArithmeticOp::Divide, "Armour");
        let stats = StatVector::new()
            .with(StatKey::Life, life)
            .with(StatKey::Mana, mana);
        let folded = fold_item(&group, &stats).unwrap();
        prop_assert!((folded - (life + mana)).abs() < 1e-9);
    }
}
