//! # A height-balanced ordered set of integer keys
//!
//! `avl-keyset` keeps a dynamic set of distinct `i64` keys in an AVL tree, so
//! lookup, insertion and deletion run in logarithmic time.  After every
//! mutation the tree refreshes the balance factor stored in each node, and a
//! [`Snapshot`] of its structure can be taken for drawing or inspection.
//!
//! The [`command`] module turns lines of text such as `insert 42` into
//! [`Command`]s, rejecting anything that is not a whole integer before it
//! reaches the tree, and [`shell::run`] is the line-oriented loop behind the
//! `avl_shell` binary.
//!
//! ```
//! use avl_keyset::AvlTree;
//!
//! let mut t = AvlTree::new();
//! for k in [20, 10, 30, 5, 15, 25, 35] {
//!     t.insert(k);
//! }
//! t.delete(20);
//! assert_eq!(t.root_key(), Some(25));
//! assert_eq!(t.iter().collect::<Vec<_>>(), vec![5, 10, 15, 25, 30, 35]);
//! ```

mod avl;
pub use avl::{AvlTree, Highlighted, Iter, NodeView, Side, Snapshot};

pub mod command;
pub use command::{Command, Outcome};

pub mod error;
pub use error::{InvariantError, ParseCommandError};

pub mod shell;
