use avl_keyset::AvlTree;
use proptest::prelude::*;

#[allow(dead_code)]
#[derive(Clone, Copy, Debug)]
pub(super) enum Op {
    Insert(i64),
    Delete(i64),
}

#[allow(dead_code)]
pub(super) fn assert_eq_iters<I: Iterator, J: Iterator<Item = I::Item>>(
    mut i: I,
    mut j: J,
) where
    I::Item: std::fmt::Debug + Eq, // same inferred for J::Item
{
    loop {
        match (i.next(), j.next()) {
            (None, None) => return,
            (a, b) => assert_eq!(a, b),
        }
    }
}

// Checks the tree through its public surfaces only: the invariant checker and
// the snapshot a presentation layer would read.
#[allow(dead_code)]
pub(super) fn assert_well_formed(t: &AvlTree) {
    t.check().unwrap();

    let snap = t.snapshot();
    assert_eq!(snap.len(), t.len());
    for v in snap.nodes() {
        assert!((-1..=1).contains(&v.balance_factor), "{v:?}");
        let ht = |k: Option<i64>| k.and_then(|k| snap.get(k)).map_or(0, |c| c.height);
        assert_eq!(v.height, 1 + ht(v.left).max(ht(v.right)));
        assert_eq!(v.balance_factor, ht(v.left) as i8 - ht(v.right) as i8);
    }

    let keys: Vec<i64> = t.iter().collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(keys, snap.keys_in_order());
}

// Narrow key range so that sequences hit duplicates and present keys often.
#[allow(dead_code)]
pub(super) fn ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            (-64i64..64).prop_map(Op::Insert),
            (-64i64..64).prop_map(Op::Delete),
        ],
        0..512,
    )
}

#[allow(dead_code)]
pub(super) fn small_keys() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-1024i64..1024, 0..256)
}
