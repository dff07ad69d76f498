//! Errors reported at the edges of the tree.
//!
//! The tree's own operations never fail.  These types cover text commands
//! that cannot be turned into a key, and structural checks that find a
//! broken invariant.

/// Why a line of text is not a valid command.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    /// The line is not valid UTF-8 text.
    #[error("input is not valid UTF-8")]
    NotUtf8,
    /// The line was blank.
    #[error("empty command")]
    Empty,
    /// The first word is not a known command.
    #[error("unknown command `{0}` (type `help` for a list)")]
    Unknown(String),
    /// The command needs an integer but none was given.
    #[error("`{0}` expects an integer argument")]
    MissingArgument(&'static str),
    /// The argument is not a whole 64-bit integer.
    #[error("`{0}` is not an integer")]
    NotAnInteger(String),
    /// Extra words followed a complete command.
    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),
}

/// A broken structural invariant found by [`AvlTree::check`](crate::AvlTree::check).
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantError {
    /// In-order traversal is not strictly increasing at `key`.
    #[error("key {key} follows {prev} in order")]
    OutOfOrder {
        /// The offending key.
        key: i64,
        /// The key visited just before it.
        prev: i64,
    },
    /// A stored height disagrees with the children's heights.
    #[error("node {key} stores height {stored}, children imply {actual}")]
    BadHeight {
        /// The node's key.
        key: i64,
        /// Height stored in the node.
        stored: i8,
        /// Height derived from the children.
        actual: i8,
    },
    /// The subtree heights differ by more than one.
    #[error("node {key} is unbalanced (balance factor {balance})")]
    Unbalanced {
        /// The node's key.
        key: i64,
        /// Left height minus right height.
        balance: i8,
    },
    /// A stored balance factor was not refreshed.
    #[error("node {key} stores balance factor {stored}, children imply {actual}")]
    StaleBalanceFactor {
        /// The node's key.
        key: i64,
        /// Balance factor stored in the node.
        stored: i8,
        /// Balance factor derived from the children.
        actual: i8,
    },
    /// The recorded key count does not match the nodes present.
    #[error("tree records {recorded} keys but holds {counted}")]
    LenMismatch {
        /// Count kept by the tree.
        recorded: usize,
        /// Nodes actually reachable.
        counted: usize,
    },
}
