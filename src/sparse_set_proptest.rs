#![cfg(test)]

// Property tests for SparseSet and SparseMap kept inside the crate so they
// can inspect the raw sparse buffer.

use crate::error::Error;
use crate::sparse_map::SparseMap;
use crate::sparse_set::{SparseSet, VACANT};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Debug)]
enum Op {
    Add(u16),
    Remove(u16),
    Search(u16),
    Resize(usize),
    Clear,
}

// Small value range so adds, removes and searches collide often.
fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let v = 0u16..200;
    let op = prop_oneof![
        6 => v.clone().prop_map(Op::Add),
        4 => v.clone().prop_map(Op::Remove),
        3 => v.prop_map(Op::Search),
        1 => (0usize..300).prop_map(Op::Resize),
        1 => Just(Op::Clear),
    ];
    proptest::collection::vec(op, 1..120)
}

// Indexing over the raw buffers: each live element is indexed from its sparse
// slot, and every sparse entry below `len` that is not VACANT either names
// its own element or fails the back-check.
fn check_layout(s: &SparseSet<u16>) -> Result<(), TestCaseError> {
    let sparse = s.sparse_raw();
    prop_assert_eq!(sparse.len(), s.capacity());
    for (i, x) in s.iter().enumerate() {
        let v = usize::from(*x);
        prop_assert!(v < s.capacity());
        prop_assert_eq!(sparse[v], i);
        prop_assert_eq!(s.search(x), Some(i));
    }
    for (v, &i) in sparse.iter().enumerate() {
        if i == VACANT || i >= s.len() {
            continue;
        }
        let resolves = s.get(i).map(|x| usize::from(*x)) == Some(v);
        let probe = u16::try_from(v).expect("capacity stays within u16 range in these tests");
        prop_assert_eq!(s.search(&probe).is_some(), resolves);
    }
    Ok(())
}

// Property: state-machine equivalence of SparseSet against BTreeSet.
// Invariants exercised:
// - add is idempotent and reports whether it inserted.
// - remove returns the element iff it was present; search agrees with the model.
// - growth on add only; shrinking resize fails iff a live value would not fit.
// - clear keeps capacity; stale sparse entries never resurrect elements.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_sparse_set_state_machine(ops in arb_ops()) {
        let mut sut: SparseSet<u16> = SparseSet::new();
        let mut model: BTreeSet<u16> = BTreeSet::new();

        for op in ops {
            let cap_before = sut.capacity();
            match op {
                Op::Add(v) => {
                    let inserted = sut.add(v);
                    prop_assert_eq!(inserted, model.insert(v));
                    prop_assert!(usize::from(v) < sut.capacity());
                    if usize::from(v) < cap_before {
                        prop_assert_eq!(sut.capacity(), cap_before);
                    } else {
                        prop_assert_eq!(sut.capacity(), (usize::from(v) + 1).next_power_of_two());
                    }
                }
                Op::Remove(v) => {
                    let removed = sut.remove(&v);
                    prop_assert_eq!(removed.is_some(), model.remove(&v));
                    prop_assert!(sut.search(&v).is_none());
                    prop_assert_eq!(sut.capacity(), cap_before);
                }
                Op::Search(v) => {
                    let found = sut.search(&v);
                    prop_assert_eq!(found.is_some(), model.contains(&v));
                    if let Some(i) = found {
                        prop_assert!(i < sut.len());
                        prop_assert_eq!(sut.get(i), Some(&v));
                    }
                }
                Op::Resize(c) => {
                    let fits = model.iter().all(|&v| usize::from(v) < c);
                    match sut.resize(c) {
                        Ok(()) => {
                            prop_assert!(fits || c >= cap_before);
                            prop_assert_eq!(sut.capacity(), c);
                        }
                        Err(Error::WouldTruncate { projection, capacity }) => {
                            prop_assert!(!fits);
                            prop_assert!(c < cap_before);
                            prop_assert_eq!(capacity, c);
                            prop_assert!(projection >= c);
                            prop_assert_eq!(sut.capacity(), cap_before);
                        }
                        Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                    }
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                    prop_assert_eq!(sut.capacity(), cap_before);
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            let live: BTreeSet<u16> = sut.iter().copied().collect();
            prop_assert_eq!(&live, &model);
            check_layout(&sut)?;
        }
    }
}

// Property: SparseMap keeps insert-if-absent semantics against a HashMap
// model, and values mutated in place are observed by later lookups.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_sparse_map_matches_model(
        ops in proptest::collection::vec((0u8..4, 0u32..64, any::<i16>()), 1..150)
    ) {
        let mut sut: SparseMap<u32, i32> = SparseMap::new();
        let mut model: HashMap<u32, i32> = HashMap::new();

        for (op, k, v) in ops {
            let v = i32::from(v);
            match op {
                0 => {
                    let inserted = sut.add(k, v);
                    prop_assert_eq!(inserted, !model.contains_key(&k));
                    model.entry(k).or_insert(v);
                }
                1 => {
                    let got = sut.remove(&k);
                    prop_assert_eq!(got, model.remove(&k).map(|mv| (k, mv)));
                }
                2 => {
                    if let Some(sv) = sut.get_mut(&k) {
                        *sv = sv.wrapping_add(v);
                    }
                    if let Some(mv) = model.get_mut(&k) {
                        *mv = mv.wrapping_add(v);
                    }
                }
                3 => {
                    match sut.at(&k) {
                        Ok(sv) => prop_assert_eq!(Some(sv), model.get(&k)),
                        Err(e) => {
                            prop_assert_eq!(e, Error::KeyNotFound);
                            prop_assert!(!model.contains_key(&k));
                        }
                    }
                }
                _ => unreachable!(),
            }
            prop_assert_eq!(sut.len(), model.len());
        }

        let got: HashMap<u32, i32> = sut.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(got, model);
    }
}
