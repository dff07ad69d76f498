//! Text commands that drive an [`AvlTree`].
//!
//! A front end reads free-form lines, parses them into [`Command`]s, and
//! applies them.  Lines that do not carry a valid integer are rejected here,
//! so the tree only ever sees well-formed keys.

use crate::avl::{AvlTree, Snapshot};
use crate::error::ParseCommandError;
use std::fmt;
use std::str::FromStr;

/// Summary of the commands understood by [`Command::from_str`].
pub const HELP: &str = "\
Available commands:
    insert {integer}    (or `i`) add a key
    delete {integer}    (or `d`) remove a key
    contains {integer}  (or `c`) test for a key
    show                print the tree with balance factors
    json                print the tree as JSON
    clear               remove every key
    help                print this message
    quit                leave";

/// One request against the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Add a key (ignored if present).
    Insert(i64),
    /// Remove a key (ignored if absent).
    Delete(i64),
    /// Test whether a key is present.
    Contains(i64),
    /// Print the tree as text.
    Show,
    /// Print the tree as JSON.
    Json,
    /// Remove every key.
    Clear,
    /// Print the command list.
    Help,
    /// Stop reading commands.
    Quit,
}

/// What applying a [`Command`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The key was added.
    Inserted(i64),
    /// The key was already present; nothing changed.
    Duplicate(i64),
    /// The key was removed.
    Deleted(i64),
    /// The key was not present; nothing changed.
    Absent(i64),
    /// Result of a membership test.
    Found {
        /// The key tested.
        key: i64,
        /// Whether it is in the tree.
        present: bool,
    },
    /// Every key was removed.
    Cleared,
    /// The tree's structure after the latest mutation.
    Snapshot(Snapshot),
    /// The command list was requested.
    Help,
    /// The caller should stop.
    Quit,
}

fn int_arg(verb: &'static str, word: Option<&str>) -> Result<i64, ParseCommandError> {
    let word = word.ok_or(ParseCommandError::MissingArgument(verb))?;
    word.parse::<i64>()
        .map_err(|_| ParseCommandError::NotAnInteger(word.to_string()))
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let verb = words.next().ok_or(ParseCommandError::Empty)?;

        let cmd = match verb.to_ascii_lowercase().as_str() {
            "insert" | "i" => Command::Insert(int_arg("insert", words.next())?),
            "delete" | "d" => Command::Delete(int_arg("delete", words.next())?),
            "contains" | "c" => {
                Command::Contains(int_arg("contains", words.next())?)
            }
            "show" => Command::Show,
            "json" => Command::Json,
            "clear" => Command::Clear,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(ParseCommandError::Unknown(verb.to_string())),
        };

        match words.next() {
            Some(extra) => {
                Err(ParseCommandError::UnexpectedArgument(extra.to_string()))
            }
            None => Ok(cmd),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Insert(k) => write!(f, "insert {k}"),
            Command::Delete(k) => write!(f, "delete {k}"),
            Command::Contains(k) => write!(f, "contains {k}"),
            Command::Show => f.write_str("show"),
            Command::Json => f.write_str("json"),
            Command::Clear => f.write_str("clear"),
            Command::Help => f.write_str("help"),
            Command::Quit => f.write_str("quit"),
        }
    }
}

impl Command {
    /// Applies the command to `tree`.
    ///
    /// # Examples
    /// ```
    /// use avl_keyset::{AvlTree, Command, Outcome};
    ///
    /// let mut t = AvlTree::new();
    /// let cmd: Command = "insert 7".parse().unwrap();
    /// assert_eq!(cmd.apply(&mut t), Outcome::Inserted(7));
    /// assert_eq!(cmd.apply(&mut t), Outcome::Duplicate(7));
    /// ```
    pub fn apply(&self, tree: &mut AvlTree) -> Outcome {
        match *self {
            Command::Insert(k) => {
                if tree.insert(k) {
                    Outcome::Inserted(k)
                } else {
                    Outcome::Duplicate(k)
                }
            }
            Command::Delete(k) => {
                if tree.delete(k) {
                    Outcome::Deleted(k)
                } else {
                    Outcome::Absent(k)
                }
            }
            Command::Contains(k) => Outcome::Found {
                key: k,
                present: tree.contains(k),
            },
            Command::Show | Command::Json => Outcome::Snapshot(tree.snapshot()),
            Command::Clear => {
                tree.clear();
                Outcome::Cleared
            }
            Command::Help => Outcome::Help,
            Command::Quit => Outcome::Quit,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Inserted(k) => write!(f, "inserted {k}"),
            Outcome::Duplicate(k) => write!(f, "{k} is already present"),
            Outcome::Deleted(k) => write!(f, "deleted {k}"),
            Outcome::Absent(k) => write!(f, "{k} is not present"),
            Outcome::Found { key, present: true } => write!(f, "{key} is present"),
            Outcome::Found { key, present: false } => {
                write!(f, "{key} is not present")
            }
            Outcome::Cleared => f.write_str("cleared"),
            Outcome::Snapshot(snap) => fmt::Display::fmt(snap, f),
            Outcome::Help => f.write_str(HELP),
            Outcome::Quit => f.write_str("bye"),
        }
    }
}
