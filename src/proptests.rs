use crate::{Edge, PatriciaTrie};

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

fn validate_trie<V>(t: &PatriciaTrie<V>) {
    let issues = t.verify_integrity();
    assert!(issues.is_empty(), "integrity violated: {issues:?}");
}

/// Every key in the domain maps exactly as the model says.
fn assert_matches_model<V: PartialEq + std::fmt::Debug>(t: &PatriciaTrie<V>, m: &BTreeMap<u64, V>) {
    let max = u64::MAX >> (64 - t.key_bits());
    for key in 0..=max {
        assert_eq!(t.get(key).unwrap(), m.get(&key), "key {key}");
    }
    assert_eq!(t.len(), m.len());
}

/// Operation over six-bit keys, so sequences hit the same keys often.
#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(#[proptest(strategy = "0u64..64")] u64, u32),
    #[proptest(weight = 3)]
    Remove(#[proptest(strategy = "0u64..64")] u64),
    #[proptest(weight = 2)]
    Get(#[proptest(strategy = "0u64..64")] u64),
}

impl Op {
    fn with_key(self, f: impl Fn(u64) -> u64) -> Self {
        match self {
            Op::Insert(k, v) => Op::Insert(f(k), v),
            Op::Remove(k) => Op::Remove(f(k)),
            Op::Get(k) => Op::Get(f(k)),
        }
    }
}

fn run_against_model(
    t: &mut PatriciaTrie<u32>,
    ops: Vec<Op>,
) -> Result<BTreeMap<u64, u32>, TestCaseError> {
    let mut m: BTreeMap<u64, u32> = BTreeMap::new();
    for op in ops {
        match op {
            Op::Insert(key, value) => {
                let inserted = t.insert(key, value).unwrap();
                prop_assert_eq!(inserted, !m.contains_key(&key));
                m.entry(key).or_insert(value);
            }
            Op::Remove(key) => {
                prop_assert_eq!(t.remove(key).unwrap(), m.remove(&key));
            }
            Op::Get(key) => {
                prop_assert_eq!(t.get(key).unwrap(), m.get(&key));
            }
        }
        prop_assert_eq!(t.len(), m.len());
        validate_trie(t);
    }
    Ok(m)
}

fn key_set() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::btree_set(0u64..32, 0..=32).prop_map(|s| s.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_narrow(ops in prop::collection::vec(any::<Op>(), 0..=1000)) {
        let mut t = PatriciaTrie::with_key_bits(6).unwrap();
        let m = run_against_model(&mut t, ops)?;
        assert_matches_model(&t, &m);

        let got: Vec<(u64, u32)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(u64, u32)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_equivalence_wide(
        pool in prop::collection::vec(any::<u64>(), 1..48),
        ops in prop::collection::vec(any::<Op>(), 0..=500),
    ) {
        let mut t = PatriciaTrie::with_key_bits(64).unwrap();
        let ops = ops
            .into_iter()
            .map(|op| op.with_key(|k| pool[k as usize % pool.len()]))
            .collect();
        let m = run_against_model(&mut t, ops)?;

        let got: Vec<(u64, u32)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(u64, u32)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_insert_then_remove_restores_lookups(keys in key_set(), extra in 0u64..32) {
        prop_assume!(!keys.contains(&extra));
        let mut t = PatriciaTrie::with_key_bits(5).unwrap();
        let mut m = BTreeMap::new();
        for &k in &keys {
            t.insert(k, k * 10).unwrap();
            m.insert(k, k * 10);
        }

        t.insert(extra, 999).unwrap();
        prop_assert_eq!(t.remove(extra).unwrap(), Some(999));
        validate_trie(&t);
        assert_matches_model(&t, &m);
    }

    #[test]
    fn prop_remove_absent_leaves_edges_unchanged(keys in key_set(), absent in 0u64..32) {
        prop_assume!(!keys.contains(&absent));
        let mut t = PatriciaTrie::with_key_bits(5).unwrap();
        for &k in &keys {
            t.insert(k, ()).unwrap();
        }
        let before: Vec<Edge> = t.edges().collect();
        prop_assert_eq!(t.remove(absent).unwrap(), None);
        let after: Vec<Edge> = t.edges().collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_any_orders_empty_the_trie(
        (inserts, removes) in key_set().prop_flat_map(|keys| {
            (Just(keys.clone()).prop_shuffle(), Just(keys).prop_shuffle())
        })
    ) {
        let mut t = PatriciaTrie::with_key_bits(5).unwrap();
        for &k in &inserts {
            prop_assert!(t.insert(k, k).unwrap());
        }
        for &k in &removes {
            prop_assert_eq!(t.remove(k).unwrap(), Some(k));
            validate_trie(&t);
        }
        prop_assert!(t.is_empty());
        prop_assert_eq!(t.edges().count(), 0);
        for k in 0..32u64 {
            prop_assert_eq!(t.get(k).unwrap(), None);
        }
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

const SMALL_SET: [u64; 6] = [0, 1, 3, 5, 18, 19];

#[test]
fn exhaustive_insert_order_small_set() {
    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = PatriciaTrie::with_key_bits(5).unwrap();
        let mut m = BTreeMap::new();
        for (i, k) in perm.into_iter().enumerate() {
            assert!(t.insert(k, i).unwrap());
            m.insert(k, i);
            validate_trie(&t);
        }
        assert_matches_model(&t, &m);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    // Insert in a fixed order, then remove in all permutations.
    let mut base = PatriciaTrie::with_key_bits(5).unwrap();
    let mut base_map = BTreeMap::new();
    for (i, &k) in SMALL_SET.iter().enumerate() {
        base.insert(k, i).unwrap();
        base_map.insert(k, i);
    }

    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = base.clone();
        let mut m = base_map.clone();
        for k in perm {
            assert_eq!(t.remove(k).unwrap(), m.remove(&k));
            validate_trie(&t);
            assert_matches_model(&t, &m);
        }
        assert!(t.is_empty());
        assert_eq!(t.edges().count(), 0);
    });
}

/// Insert the whole five-bit universe in a random order, then remove it in
/// another, checking every key after each step.
#[test]
fn shuffled_full_universe() {
    for seed in 0..64u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut adds: Vec<u64> = (0..32).collect();
        let mut removes = adds.clone();
        adds.shuffle(&mut rng);
        removes.shuffle(&mut rng);

        let mut t = PatriciaTrie::with_key_bits(5).unwrap();
        let mut m = BTreeMap::new();
        for k in adds {
            t.insert(k, k as u8).unwrap();
            m.insert(k, k as u8);
            validate_trie(&t);
            assert_matches_model(&t, &m);
        }
        for k in removes {
            t.remove(k).unwrap();
            m.remove(&k);
            validate_trie(&t);
            assert_matches_model(&t, &m);
        }
        assert!(t.is_empty(), "seed {seed}");
    }
}
