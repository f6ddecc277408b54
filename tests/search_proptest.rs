//! Property-based tests for the treap and the skip list.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashSet;

use searchbench::{SearchEngine, SkipList, SkipListConfig, Treap};

// =============================================================================
// Test helpers
// =============================================================================

fn build_treap(keys: &[i64], seed: u64) -> Treap {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut treap = Treap::new();
    for &k in keys {
        treap.insert(k, &mut rng).unwrap();
    }
    return treap;
}

fn build_list(values: &[i64], config: SkipListConfig, seed: u64) -> SkipList {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut list = SkipList::new(config);
    for &v in values {
        list.insert(v, &mut rng).unwrap();
    }
    return list;
}

fn arbitrary_config() -> impl Strategy<Value = SkipListConfig> {
    (1usize..=20, prop_oneof![Just(SkipListConfig::HALF), Just(SkipListConfig::QUARTER), 0.05..0.95f64])
        .prop_map(|(level, p)| SkipListConfig::new(level, p).unwrap())
}

/// Keys in a narrow band so duplicates are common.
fn arbitrary_keys() -> impl Strategy<Value = Vec<i64>> {
    prop_oneof![
        prop::collection::vec(-50i64..50, 0..300),
        prop::collection::vec(any::<i64>(), 0..300),
    ]
}

// =============================================================================
// Treap
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Heap order on priorities and BST order on keys after any inserts.
    #[test]
    fn treap_invariants_hold(keys in arbitrary_keys(), seed in any::<u64>()) {
        let treap = build_treap(&keys, seed);
        prop_assert_eq!(treap.check_invariants(), Ok(()));
        prop_assert_eq!(treap.len(), keys.len());
    }

    /// In-order traversal is the sorted multiset of inserted keys.
    #[test]
    fn treap_inorder_is_sorted_multiset(keys in arbitrary_keys(), seed in any::<u64>()) {
        let treap = build_treap(&keys, seed);
        let mut expected = keys.clone();
        expected.sort();
        prop_assert_eq!(treap.iter().collect::<Vec<_>>(), expected);
    }

    /// Inserted keys are found; other keys are not.
    #[test]
    fn treap_search_is_exact(keys in arbitrary_keys(), lookups in prop::collection::vec(-60i64..60, 0..50), seed in any::<u64>()) {
        let treap = build_treap(&keys, seed);
        let present: FxHashSet<i64> = keys.iter().copied().collect();
        for k in keys.iter().chain(lookups.iter()) {
            let result = treap.search(*k);
            prop_assert_eq!(result.found, present.contains(k), "key {}", k);
            if result.found {
                prop_assert!(result.steps >= 1);
                prop_assert!(result.steps as usize <= treap.height());
            }
        }
    }
}

// =============================================================================
// Skip list
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every lane is strictly increasing and contained in the lane below.
    #[test]
    fn skip_list_invariants_hold(values in arbitrary_keys(), config in arbitrary_config(), seed in any::<u64>()) {
        let list = build_list(&values, config, seed);
        prop_assert_eq!(list.check_invariants(), Ok(()));
        prop_assert!(list.level() >= 1 && list.level() <= config.max_level());
    }

    /// Lane 0 holds each distinct value once, in order.
    #[test]
    fn skip_list_bottom_lane_is_sorted_set(values in arbitrary_keys(), seed in any::<u64>()) {
        let list = build_list(&values, SkipListConfig::default(), seed);
        let mut expected = values.clone();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(list.iter().collect::<Vec<_>>(), expected);
        prop_assert_eq!(list.len(), list.lane_counts().first().copied().unwrap_or(0));
    }

    /// Inserted values are found; other values are not.
    #[test]
    fn skip_list_search_is_exact(values in arbitrary_keys(), lookups in prop::collection::vec(-60i64..60, 0..50), config in arbitrary_config(), seed in any::<u64>()) {
        let list = build_list(&values, config, seed);
        let present: FxHashSet<i64> = values.iter().copied().collect();
        for v in values.iter().chain(lookups.iter()) {
            let result = list.search(*v);
            prop_assert_eq!(result.found, present.contains(v), "value {}", v);
            if result.found {
                prop_assert!(result.steps >= 1);
            }
        }
    }

    /// Both engines agree on membership through the shared trait.
    #[test]
    fn engines_agree(keys in arbitrary_keys(), lookups in prop::collection::vec(-60i64..60, 0..50), seed in any::<u64>()) {
        let treap = build_treap(&keys, seed);
        let list = build_list(&keys, SkipListConfig::default(), seed);
        for k in keys.iter().chain(lookups.iter()) {
            prop_assert_eq!(SearchEngine::search(&treap, *k).found, SearchEngine::search(&list, *k).found);
        }
    }
}

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn five_keys_both_engines() {
    let keys = [5, 3, 8, 1, 4];
    for seed in 0..50 {
        let treap = build_treap(&keys, seed);
        let list = build_list(&keys, SkipListConfig::default(), seed);
        for result in [treap.search(4), list.search(4)] {
            assert!(result.found);
            assert!(result.steps >= 1);
        }
        assert!(!treap.search(99).found);
        assert!(!list.search(99).found);
    }
}

#[test]
fn large_random_build_stays_logarithmic() {
    let mut rng = StdRng::seed_from_u64(99);
    let keys: Vec<i64> = (0..100_000).map(|_| rand::Rng::gen_range(&mut rng, 0..1_000_000)).collect();
    let treap = build_treap(&keys, 1);
    let list = build_list(&keys, SkipListConfig::for_size(keys.len(), SkipListConfig::HALF).unwrap(), 2);
    treap.check_invariants().unwrap();
    list.check_invariants().unwrap();
    assert!(treap.height() < 100, "treap height {}", treap.height());

    let total: u64 = keys.iter().take(1_000).map(|k| list.search(*k).steps).sum();
    // Expected cost is about 2 log2(n) ~ 34 moves; a linear scan would be ~50000.
    assert!(total / 1_000 < 200, "avg skip list steps {}", total / 1_000);
}
