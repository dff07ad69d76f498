#![warn(missing_docs)]
use std::cmp::Ordering::*;
use std::fmt::{Debug, Formatter};
use std::iter::FusedIterator;

use crate::error::InvariantError;

mod snapshot;
pub use snapshot::{Highlighted, NodeView, Side, Snapshot};

type OptNode = Option<Box<Node>>;

#[cfg(test)]
macro_rules! chk_tree {
    ( $x:expr ) => {{
        let t = $x;
        if let Err(e) = t.check() {
            panic!("{}: {:?}", e, t);
        }
    }};
}

#[cfg(not(test))]
macro_rules! chk_tree {
    ( $x:expr ) => {{
        let _ = $x;
    }};
}

#[derive(Clone)]
struct Node {
    key: i64,
    ht: i8,
    bf: i8,
    left: OptNode,
    right: OptNode,
}

impl Node {
    fn leaf(key: i64) -> Box<Self> {
        Box::new(Node {
            key,
            ht: 1,
            bf: 0,
            left: None,
            right: None,
        })
    }

    // Returns the "balance factor" of the node, derived from the stored
    // heights of its children.
    fn bal(&self) -> i8 {
        height(&self.left) - height(&self.right)
    }

    // Is the given node balanced, that is -1 <= self.bal() <= 1 ?
    fn is_bal(&self) -> bool {
        // single-branch range inclusion check; requires unsigned wrap around
        ((self.bal() + 1) as u8) <= 2
    }

    fn fix_ht(&mut self) {
        self.ht = height(&self.left).max(height(&self.right)) + 1;
    }

    // Verifies the subtree rooted here.  `greatest` is the largest key seen so
    // far in an in-order walk; returns the subtree's size and the new greatest.
    fn chk(
        &self,
        greatest: Option<i64>,
    ) -> Result<(usize, Option<i64>), InvariantError> {
        let (lf_len, greatest) = chk(&self.left, greatest)?;

        // is our node in order with everything visited before it?
        if let Some(prev) = greatest.filter(|&g| g >= self.key) {
            return Err(InvariantError::OutOfOrder {
                key: self.key,
                prev,
            });
        }

        let actual = height(&self.left).max(height(&self.right)) + 1;
        if self.ht != actual {
            return Err(InvariantError::BadHeight {
                key: self.key,
                stored: self.ht,
                actual,
            });
        }

        if !self.is_bal() {
            return Err(InvariantError::Unbalanced {
                key: self.key,
                balance: self.bal(),
            });
        }

        if self.bf != self.bal() {
            return Err(InvariantError::StaleBalanceFactor {
                key: self.key,
                stored: self.bf,
                actual: self.bal(),
            });
        }

        let (rt_len, greatest) = chk(&self.right, Some(self.key))?;

        Ok((lf_len + 1 + rt_len, greatest))
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("(ht: {} {} ", self.ht, self.key))?;

        match &self.left {
            None => f.write_str(".")?,
            Some(lf) => lf.fmt(f)?,
        }

        f.write_str(" ")?;

        match &self.right {
            None => f.write_str(".")?,
            Some(rt) => rt.fmt(f)?,
        }

        f.write_str(")")
    }
}

fn height(opt_node: &OptNode) -> i8 {
    opt_node.as_ref().map_or(0, |n| n.ht)
}

fn bal(opt_node: &OptNode) -> i8 {
    opt_node.as_ref().map_or(0, |n| n.bal())
}

fn chk(
    opt_node: &OptNode,
    greatest: Option<i64>,
) -> Result<(usize, Option<i64>), InvariantError> {
    match opt_node.as_ref() {
        None => Ok((0, greatest)),
        Some(n) => n.chk(greatest),
    }
}

// Only the two nodes that trade places get new heights, child first.  A
// rotation whose pivot child is missing leaves the tree untouched.
fn rot_lf(root: &mut OptNode) {
    // We want the following transformation:
    //    a(x, b(y, z))   =>   b(a(x, y), z)
    // x and z retain the same parents.

    let Some(mut a) = root.take() else {
        return;
    };

    let Some(mut b) = a.right.take() else {
        *root = Some(a);
        return;
    };

    log::trace!("rotate left at {}", a.key);

    // move y from b to a
    a.right = b.left.take();
    a.fix_ht();

    // make a be b's left child
    b.left = Some(a);
    b.fix_ht();

    // install b as the new root
    *root = Some(b);
}

fn rot_rt(root: &mut OptNode) {
    // We want the following transformation:
    //    a(b(x, y), z)   =>   b(x, a(y, z))
    // x and z retain the same parents.

    let Some(mut a) = root.take() else {
        return;
    };

    let Some(mut b) = a.left.take() else {
        *root = Some(a);
        return;
    };

    log::trace!("rotate right at {}", a.key);

    // move y from b to a
    a.left = b.right.take();
    a.fix_ht();

    // move a into b
    b.right = Some(a);
    b.fix_ht();

    // install b as the new root
    *root = Some(b);
}

// rebalance a left-heavy node by "shifting height" from left to right; `dbl`
// selects the left-right double rotation over a single right rotation
fn rebal_lf_to_rt(root: &mut OptNode, dbl: bool) {
    if dbl {
        if let Some(n) = root.as_mut() {
            rot_lf(&mut n.left);
        }
    }

    rot_rt(root);
}

// rebalance a right-heavy node by "shifting height" from right to left
fn rebal_rt_to_lf(root: &mut OptNode, dbl: bool) {
    if dbl {
        if let Some(n) = root.as_mut() {
            rot_rt(&mut n.right);
        }
    }

    rot_lf(root);
}

// Inserts k into the tree rooted at root and returns whether a node was
// added.  Each ancestor on the way back up rotates at most once.
fn ins(root: &mut OptNode, k: i64) -> bool {
    let n = match root.as_mut() {
        None => {
            *root = Some(Node::leaf(k));
            return true; // *** EARLY RETURN ***
        }

        Some(n) => n,
    };

    let added = match k.cmp(&n.key) {
        Equal => false,
        Less => ins(&mut n.left, k),
        Greater => ins(&mut n.right, k),
    };

    if !added {
        return false;
    }

    n.fix_ht();

    // The inserted key's side of the heavy child picks single vs double.
    let b = n.bal();
    if b > 1 {
        let dbl = n.left.as_ref().is_some_and(|l| k > l.key);
        rebal_lf_to_rt(root, dbl);
    } else if b < -1 {
        let dbl = n.right.as_ref().is_some_and(|r| k < r.key);
        rebal_rt_to_lf(root, dbl);
    }

    true
}

// Returns the leftmost descendant of n.
fn find_min(n: &Node) -> &Node {
    let mut curr = n;
    while let Some(lf) = curr.left.as_deref() {
        curr = lf;
    }
    curr
}

// Removes k from the tree rooted at root and returns whether a node was
// removed.
fn rm(root: &mut OptNode, k: i64) -> bool {
    let n = match root.as_mut() {
        None => return false, // *** EARLY RETURN ***
        Some(n) => n,
    };

    let removed = match k.cmp(&n.key) {
        Less => rm(&mut n.left, k),
        Greater => rm(&mut n.right, k),

        Equal => match n.right.as_deref() {
            Some(rt) if n.left.is_some() => {
                // both children are populated: take over the in-order
                // successor's key, then remove the successor, which has no
                // left child
                let succ = find_min(rt).key;
                n.key = succ;
                rm(&mut n.right, succ)
            }

            _ => {
                // splice out the node, promoting its only child (if any)
                if let Some(old_n) = root.take() {
                    let Node { left, right, .. } = *old_n;
                    *root = left.or(right);
                }
                return true; // *** EARLY RETURN ***
            }
        },
    };

    if !removed {
        return false;
    }

    n.fix_ht();

    // The deleted key is gone, so the heavy child's own lean picks single vs
    // double.  A child with balance 0 always gets the single rotation.
    let b = n.bal();
    if b > 1 {
        let dbl = bal(&n.left) < 0;
        rebal_lf_to_rt(root, dbl);
    } else if b < -1 {
        let dbl = bal(&n.right) > 0;
        rebal_rt_to_lf(root, dbl);
    }

    true
}

// Recomputes the stored balance factor of every node under root.
fn refresh_bf(root: &mut OptNode) {
    if let Some(n) = root.as_mut() {
        n.bf = n.bal();
        refresh_bf(&mut n.left);
        refresh_bf(&mut n.right);
    }
}

/// An ordered set of distinct `i64` keys kept height-balanced.
///
/// Internally this is an [AVL tree](https://en.wikipedia.org/wiki/AVL_tree):
/// for every node, the heights of its two subtrees differ by at most one, so
/// [`insert`](#method.insert), [`delete`](#method.delete) and
/// [`contains`](#method.contains) all run in logarithmic time.  Every node is
/// exclusively owned by its parent; removing a key drops its node.
///
/// Besides its height, each node stores a balance factor (left height minus
/// right height).  The balance factors of the whole tree are refreshed after
/// every mutation so that a [`snapshot`](#method.snapshot) always reports
/// current values.
#[derive(Clone, Default)]
pub struct AvlTree {
    len: usize,
    root: OptNode,
}

impl Debug for AvlTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.root {
            None => f.write_str("AvlTree(EMPTY)"),
            Some(n) => {
                // use Node's Debug formatter
                f.write_fmt(format_args!("AvlTree(#{}, {:?})", self.len, n))
            }
        }
    }
}

impl PartialEq for AvlTree {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for AvlTree {}

impl AvlTree {
    /// Creates a new, empty tree.
    /// # Examples
    /// ```
    /// use avl_keyset::AvlTree;
    /// let t = AvlTree::new();
    /// assert!(t.is_empty());
    /// ```
    pub fn new() -> Self {
        AvlTree { len: 0, root: None }
    }

    /// Drops all keys from the tree.
    pub fn clear(&mut self) {
        self.len = 0;
        self.root = None;
    }

    /// Inserts a key and rebalances the tree.
    ///
    /// Returns true if the key was added and false if it was already present,
    /// in which case the tree is left exactly as it was.
    ///
    /// # Examples
    /// ```
    /// use avl_keyset::AvlTree;
    ///
    /// let mut t = AvlTree::new();
    /// assert!(t.insert(30));
    /// assert!(t.insert(20));
    /// assert!(t.insert(10));
    /// assert!(!t.insert(10));
    /// assert_eq!(t.root_key(), Some(20));
    /// assert_eq!(t.height(), 2);
    /// ```
    pub fn insert(&mut self, key: i64) -> bool {
        let added = ins(&mut self.root, key);
        if added {
            self.len += 1;
            refresh_bf(&mut self.root);
        }

        log::debug!(
            "insert {key}: {} (len {})",
            if added { "added" } else { "duplicate ignored" },
            self.len
        );

        chk_tree!(&*self);
        added
    }

    /// Deletes a key and rebalances the tree.
    ///
    /// Returns true if the key was present.  Deleting an absent key leaves
    /// the tree exactly as it was.
    ///
    /// # Examples
    /// ```
    /// use avl_keyset::AvlTree;
    ///
    /// let mut t: AvlTree = [20, 10, 30].into_iter().collect();
    /// assert!(t.delete(20));
    /// assert!(!t.delete(20));
    /// assert_eq!(t.iter().collect::<Vec<_>>(), vec![10, 30]);
    /// ```
    pub fn delete(&mut self, key: i64) -> bool {
        let removed = rm(&mut self.root, key);
        if removed {
            self.len -= 1;
            refresh_bf(&mut self.root);
        }

        log::debug!(
            "delete {key}: {} (len {})",
            if removed { "removed" } else { "absent" },
            self.len
        );

        chk_tree!(&*self);
        removed
    }

    /// Tests if the tree holds the given key.
    pub fn contains(&self, key: i64) -> bool {
        let mut curr = &self.root;
        while let Some(n) = curr {
            match key.cmp(&n.key) {
                Less => curr = &n.left,
                Equal => return true,
                Greater => curr = &n.right,
            }
        }

        false
    }

    /// Returns the least key in the tree.
    pub fn first(&self) -> Option<i64> {
        self.root.as_deref().map(|n| find_min(n).key)
    }

    /// Returns the greatest key in the tree.
    pub fn last(&self) -> Option<i64> {
        let mut curr = self.root.as_deref()?;
        while let Some(rt) = curr.right.as_deref() {
            curr = rt;
        }
        Some(curr.key)
    }

    /// Returns the key held by the root node.
    pub fn root_key(&self) -> Option<i64> {
        self.root.as_ref().map(|n| n.key)
    }

    /// Returns the height of the tree, counted in nodes (0 when empty).
    pub fn height(&self) -> usize {
        height(&self.root) as usize
    }

    /// Returns true if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Creates an iterator over the keys in increasing order.
    ///
    /// # Examples
    /// ```
    /// use avl_keyset::AvlTree;
    ///
    /// let t: AvlTree = [3, 1, 2].into_iter().collect();
    /// assert_eq!(t.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        let mut work = Vec::new();
        let mut curr = self.root.as_deref();
        while let Some(n) = curr {
            work.push(n);
            curr = n.left.as_deref();
        }

        Iter {
            work,
            len: self.len,
        }
    }

    /// Captures the tree's current structure for presentation.
    ///
    /// # Examples
    /// ```
    /// use avl_keyset::AvlTree;
    ///
    /// let t: AvlTree = [10, 30, 20].into_iter().collect();
    /// let snap = t.snapshot();
    /// assert_eq!(snap.root().map(|v| v.key), Some(20));
    /// assert_eq!(snap.len(), 3);
    /// ```
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.root.as_deref())
    }

    /// Verifies the search-tree order, the stored heights and balance
    /// factors, the balance of every node, and the recorded length.
    pub fn check(&self) -> Result<(), InvariantError> {
        let (counted, _) = chk(&self.root, None)?;
        if counted != self.len {
            return Err(InvariantError::LenMismatch {
                recorded: self.len,
                counted,
            });
        }

        Ok(())
    }
}

impl Extend<i64> for AvlTree {
    fn extend<T: IntoIterator<Item = i64>>(&mut self, iter: T) {
        for k in iter {
            self.insert(k);
        }
    }
}

impl FromIterator<i64> for AvlTree {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        let mut t = AvlTree::new();
        t.extend(iter);
        t
    }
}

impl<'a> IntoIterator for &'a AvlTree {
    type Item = i64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An in-order iterator over the keys of an [`AvlTree`].
pub struct Iter<'a> {
    work: Vec<&'a Node>,
    len: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        self.work.pop().map(|n| {
            self.len -= 1;
            let mut curr = n.right.as_deref();
            while let Some(m) = curr {
                self.work.push(m);
                curr = m.left.as_deref();
            }
            n.key
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a> FusedIterator for Iter<'a> {}

#[cfg(test)]
mod test {
    extern crate quickcheck;
    use super::*;
    use quickcheck::quickcheck;
    use std::collections::BTreeSet;

    fn bal_test(vs: Vec<i16>) {
        let mut t = AvlTree::new();
        for &k in vs.iter() {
            t.insert(k as i64);
            println!("{:?}", t);
            t.check().unwrap();
        }
    }

    fn rm_test(vs: Vec<i8>) {
        let mut t = AvlTree::new();
        let mut btree = BTreeSet::new();

        for &k in vs.iter() {
            match k {
                1..=i8::MAX => {
                    let k = (k % 32) as i64;
                    assert_eq!(t.insert(k), btree.insert(k));
                }

                0 | i8::MIN => (),

                _ => {
                    let k = (-k % 32) as i64;
                    assert_eq!(t.delete(k), btree.remove(&k));
                }
            }

            assert!(t.iter().eq(btree.iter().copied()));
            t.check().unwrap();
        }
    }

    // systematically try deleting each key of t
    fn chk_all_removes(t: AvlTree) {
        for k in t.iter() {
            let mut t2 = t.clone();
            assert!(t2.delete(k));
            assert!(!t2.contains(k));
            assert_eq!(t2.len(), t.len() - 1);
            t2.check().unwrap();
        }
    }

    fn tree(keys: &[i64]) -> AvlTree {
        keys.iter().copied().collect()
    }

    fn key_of(opt_node: &OptNode) -> Option<i64> {
        opt_node.as_ref().map(|n| n.key)
    }

    #[test]
    fn rm_each_test() {
        // build in order to encourage skewing
        chk_all_removes((0..32).collect());

        // build in reverse order to encourage opposite skewing
        chk_all_removes((0..32).rev().collect());
    }

    #[test]
    fn rot_lf_moves_inner_grandchild() {
        let mut root: OptNode = tree(&[1, 0, 3, 2, 4]).root;
        rot_lf(&mut root);

        let b = root.as_ref().unwrap();
        assert_eq!(b.key, 3);
        assert_eq!(b.ht, 3);
        let a = b.left.as_ref().unwrap();
        assert_eq!(a.key, 1);
        assert_eq!(a.ht, 2);
        assert_eq!(key_of(&a.left), Some(0));
        assert_eq!(key_of(&a.right), Some(2));
        assert_eq!(key_of(&b.right), Some(4));
    }

    #[test]
    fn rot_rt_moves_inner_grandchild() {
        let mut root: OptNode = tree(&[3, 1, 4, 0, 2]).root;
        rot_rt(&mut root);

        let b = root.as_ref().unwrap();
        assert_eq!(b.key, 1);
        assert_eq!(b.ht, 3);
        let a = b.right.as_ref().unwrap();
        assert_eq!(a.key, 3);
        assert_eq!(a.ht, 2);
        assert_eq!(key_of(&a.left), Some(2));
        assert_eq!(key_of(&a.right), Some(4));
        assert_eq!(key_of(&b.left), Some(0));
    }

    #[test]
    fn rot_without_pivot_child_is_noop() {
        let mut root: OptNode = Some(Node::leaf(7));
        rot_lf(&mut root);
        rot_rt(&mut root);
        assert_eq!(key_of(&root), Some(7));
        assert_eq!(height(&root), 1);

        let mut empty: OptNode = None;
        rot_lf(&mut empty);
        assert!(empty.is_none());
    }

    #[test]
    fn find_min_descends_left() {
        let t = tree(&[50, 30, 70, 20, 40, 60, 80, 10]);
        assert_eq!(find_min(t.root.as_ref().unwrap()).key, 10);

        let right = t.root.as_ref().unwrap().right.as_ref().unwrap();
        assert_eq!(find_min(right).key, 60);

        let leaf = Node::leaf(5);
        assert_eq!(find_min(&leaf).key, 5);
    }

    #[test]
    fn stale_balance_factor_is_reported() {
        let mut t = tree(&[2, 1]);
        t.root.as_mut().unwrap().bf = 0;
        assert_eq!(
            t.check(),
            Err(InvariantError::StaleBalanceFactor {
                key: 2,
                stored: 0,
                actual: 1
            })
        );
    }

    #[test]
    fn bad_height_is_reported() {
        let mut t = tree(&[2, 1, 3]);
        t.root.as_mut().unwrap().ht = 5;
        assert_eq!(
            t.check(),
            Err(InvariantError::BadHeight {
                key: 2,
                stored: 5,
                actual: 2
            })
        );
    }

    #[test]
    fn out_of_order_is_reported() {
        let mut t = tree(&[2, 1, 3]);
        t.root.as_mut().unwrap().left.as_mut().unwrap().key = 4;
        assert_eq!(
            t.check(),
            Err(InvariantError::OutOfOrder { key: 2, prev: 4 })
        );
    }

    #[test]
    fn unbalanced_is_reported() {
        let mut chain = Node::leaf(1);
        let mut mid = Node::leaf(2);
        mid.right = Some(Node::leaf(3));
        mid.fix_ht();
        mid.bf = mid.bal();
        chain.right = Some(mid);
        chain.fix_ht();
        chain.bf = chain.bal();

        let t = AvlTree {
            len: 3,
            root: Some(chain),
        };
        assert_eq!(
            t.check(),
            Err(InvariantError::Unbalanced { key: 1, balance: -2 })
        );
    }

    #[test]
    fn len_mismatch_is_reported() {
        let mut t = tree(&[1, 2, 3]);
        t.len = 4;
        assert_eq!(
            t.check(),
            Err(InvariantError::LenMismatch {
                recorded: 4,
                counted: 3
            })
        );
    }

    #[test]
    fn first_and_last() {
        let t = tree(&[5, -3, 9, 0, 12]);
        assert_eq!(t.first(), Some(-3));
        assert_eq!(t.last(), Some(12));

        let e = AvlTree::new();
        assert_eq!(e.first(), None);
        assert_eq!(e.last(), None);
        assert_eq!(e.height(), 0);
    }

    #[test]
    fn extreme_keys() {
        let mut t = tree(&[i64::MIN, i64::MAX, 0]);
        assert_eq!(t.iter().collect::<Vec<_>>(), vec![i64::MIN, 0, i64::MAX]);
        assert!(t.delete(i64::MIN));
        assert!(t.delete(i64::MAX));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", AvlTree::new()), "AvlTree(EMPTY)");
        assert_eq!(
            format!("{:?}", tree(&[2, 1, 3])),
            "AvlTree(#3, (ht: 2 2 (ht: 1 1 . .) (ht: 1 3 . .)))"
        );
    }

    #[test]
    fn iter_len_test() {
        let t: AvlTree = (0..10).collect();

        let mut iter = t.iter();
        let mut cnt = 10;
        while iter.next().is_some() {
            assert_eq!(iter.len(), cnt - 1);
            cnt -= 1;
        }
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn bal_test_regr1() {
        bal_test(vec![4, 0, 5, 1, 2, 3]);
    }

    #[test]
    fn bal_test_regr2() {
        bal_test(vec![3, 0, 1, 2, 4]);
    }

    #[test]
    fn bal_test_regr3() {
        bal_test(vec![127, 3, 1, 4, 6, 2, 5, 127]);
    }

    #[test]
    fn rm_test_regr1() {
        rm_test(vec![101, 100, 1, -100]);
    }

    #[test]
    fn rm_test_regr2() {
        rm_test(vec![
            99, 1, 103, 3, 98, 2, 8, 4, 5, 6, 7, 102, 9, 97, -102, 10, -97,
        ]);
    }

    #[test]
    fn rm_test_regr3() {
        rm_test(vec![31, 14, 1, 15, 32, 16, 17, -14, -31]);
    }

    quickcheck! {
        fn qc_bal_test(vs: Vec<i16>) -> () {
            bal_test(vs);
        }

        fn qc_rm_test(vs: Vec<i8>) -> () {
            rm_test(vs);
        }

        fn qc_rm_test2(vs: Vec<u8>) -> () {
            chk_all_removes(vs.into_iter().map(i64::from).collect());
        }
    }
}
