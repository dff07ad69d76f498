use super::Node;
use serde::Serialize;
use std::fmt;

/// Which link of its parent a node hangs from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The node has no parent.
    Root,
    /// The node is its parent's left child.
    Left,
    /// The node is its parent's right child.
    Right,
}

/// One node of a [`Snapshot`].
///
/// Related nodes are named by key; keys are unique within a tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NodeView {
    /// The node's key.
    pub key: i64,
    /// Height of the subtree rooted at the node (a leaf has height 1).
    pub height: u8,
    /// Height of the left subtree minus height of the right subtree.
    pub balance_factor: i8,
    /// Distance from the root (the root has depth 0).
    pub depth: usize,
    /// Key of the parent node, absent for the root.
    pub parent: Option<i64>,
    /// Which child of the parent this node is.
    pub side: Side,
    /// Key of the left child.
    pub left: Option<i64>,
    /// Key of the right child.
    pub right: Option<i64>,
}

/// A read-only copy of a tree's structure, for drawing it.
///
/// The nodes are listed in pre-order: each node precedes its left subtree,
/// which precedes its right subtree.  A snapshot does not borrow the tree, so
/// it stays valid (and stale) after later mutations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    nodes: Vec<NodeView>,
}

impl Snapshot {
    pub(super) fn capture(root: Option<&Node>) -> Self {
        let mut nodes = Vec::new();
        let mut work: Vec<(&Node, Option<i64>, Side, usize)> = Vec::new();
        if let Some(n) = root {
            work.push((n, None, Side::Root, 0));
        }

        while let Some((n, parent, side, depth)) = work.pop() {
            nodes.push(NodeView {
                key: n.key,
                height: n.ht as u8,
                balance_factor: n.bf,
                depth,
                parent,
                side,
                left: n.left.as_ref().map(|l| l.key),
                right: n.right.as_ref().map(|r| r.key),
            });

            // right first so that the left subtree pops first
            if let Some(rt) = n.right.as_deref() {
                work.push((rt, Some(n.key), Side::Right, depth + 1));
            }
            if let Some(lf) = n.left.as_deref() {
                work.push((lf, Some(n.key), Side::Left, depth + 1));
            }
        }

        Snapshot { nodes }
    }

    /// The nodes in pre-order.
    pub fn nodes(&self) -> &[NodeView] {
        &self.nodes
    }

    /// Number of nodes captured.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the tree was empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root node, if any.
    pub fn root(&self) -> Option<&NodeView> {
        self.nodes.first()
    }

    /// Looks up the node holding `key`.
    pub fn get(&self, key: i64) -> Option<&NodeView> {
        self.nodes.iter().find(|v| v.key == key)
    }

    /// Parent-to-child key pairs, one for every node but the root.
    pub fn edges(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.nodes
            .iter()
            .filter_map(|v| v.parent.map(|p| (p, v.key)))
    }

    /// The captured keys in increasing order.
    pub fn keys_in_order(&self) -> Vec<i64> {
        let mut keys: Vec<i64> = self.nodes.iter().map(|v| v.key).collect();
        keys.sort_unstable();
        keys
    }

    /// Renders like the `Display` impl, additionally marking the node that
    /// holds `key` (typically the key just inserted).
    pub fn highlighted(&self, key: i64) -> Highlighted<'_> {
        Highlighted {
            snap: self,
            key: Some(key),
        }
    }
}

/// Text rendering of a [`Snapshot`] with one key marked, see
/// [`Snapshot::highlighted`].
#[derive(Clone, Copy, Debug)]
pub struct Highlighted<'a> {
    snap: &'a Snapshot,
    key: Option<i64>,
}

/// Indented tree, one node per line, each tagged with its balance factor.
impl fmt::Display for Highlighted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.snap.nodes.is_empty() {
            return f.write_str("(empty)\n");
        }

        for v in &self.snap.nodes {
            let side = match v.side {
                Side::Root => "",
                Side::Left => "L: ",
                Side::Right => "R: ",
            };
            let mark = if self.key == Some(v.key) { " <=" } else { "" };

            writeln!(
                f,
                "{:indent$}{side}{} [bf {}]{mark}",
                "",
                v.key,
                v.balance_factor,
                indent = v.depth * 4
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plain = Highlighted {
            snap: self,
            key: None,
        };
        fmt::Display::fmt(&plain, f)
    }
}
