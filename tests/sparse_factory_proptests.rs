// SparseFactory property tests.
//
// Property: liveness matches a `slotmap::SlotMap` driven by the same ops.
//  - Model: SlotMap<DefaultKey, u32>; each issued Id is paired with the
//    DefaultKey the model issued for the same value.
//  - Invariant: exists(id) == model.contains_key(key) for every pair ever
//    issued, live or retired; len() == model.len().
//  - Invariant: no Id is issued twice over the whole run.
//  - Operations: create, remove live, remove retired (stale), mutate, clear.
use proptest::prelude::*;
use slotmap::{DefaultKey, SlotMap};
use sparse_slots::{Error, Id, SparseFactory};
use std::collections::HashSet;

#[derive(Clone, Debug)]
enum Op {
    Create(u32),
    RemoveLive(usize),
    RemoveRetired(usize),
    Mutate(usize, u32),
    Clear,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        8 => any::<u32>().prop_map(Op::Create),
        5 => any::<usize>().prop_map(Op::RemoveLive),
        2 => any::<usize>().prop_map(Op::RemoveRetired),
        3 => (any::<usize>(), any::<u32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
        1 => Just(Op::Clear),
    ];
    proptest::collection::vec(op, 1..200)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_factory_matches_slotmap(ops in arb_ops()) {
        let mut sut: SparseFactory<u32> = SparseFactory::new();
        let mut model: SlotMap<DefaultKey, u32> = SlotMap::new();
        let mut live: Vec<(Id, DefaultKey)> = Vec::new();
        let mut retired: Vec<(Id, DefaultKey)> = Vec::new();
        let mut issued: HashSet<Id> = HashSet::new();

        for op in ops {
            match op {
                Op::Create(v) => {
                    let id = sut.insert(v);
                    let key = model.insert(v);
                    prop_assert!(issued.insert(id), "id {} issued twice", id);
                    live.push((id, key));
                }
                Op::RemoveLive(i) => {
                    if !live.is_empty() {
                        let (id, key) = live.swap_remove(i % live.len());
                        prop_assert_eq!(sut.remove(id), model.remove(key));
                        retired.push((id, key));
                    }
                }
                Op::RemoveRetired(i) => {
                    if !retired.is_empty() {
                        let (id, key) = retired[i % retired.len()];
                        prop_assert_eq!(sut.remove(id), None);
                        prop_assert_eq!(model.remove(key), None);
                    }
                }
                Op::Mutate(i, d) => {
                    if !live.is_empty() {
                        let (id, key) = live[i % live.len()];
                        let sv = sut.get_mut(id).expect("live id resolves");
                        *sv = sv.wrapping_add(d);
                        let mv = &mut model[key];
                        *mv = mv.wrapping_add(d);
                    }
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                    retired.append(&mut live);
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            for &(id, key) in &live {
                prop_assert!(sut.exists(id));
                prop_assert_eq!(sut.get(id), model.get(key));
            }
            for &(id, key) in &retired {
                prop_assert!(!sut.exists(id));
                prop_assert!(!model.contains_key(key));
                let err = sut.at(id).expect_err("retired id must not resolve");
                let expected = matches!(err, Error::KeyNotFound | Error::StaleId { .. });
                prop_assert!(expected, "unexpected error {:?}", err);
            }
        }

        let mut seen: Vec<Id> = sut.ids().collect();
        seen.sort();
        let mut expected: Vec<Id> = live.iter().map(|&(id, _)| id).collect();
        expected.sort();
        prop_assert_eq!(seen, expected);
    }
}
