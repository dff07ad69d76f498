//! The read-apply-print loop behind the `avl_shell` binary.

use crate::avl::AvlTree;
use crate::command::{Command, Outcome};
use crate::error::ParseCommandError;
use std::io::{self, BufRead, Write};

const BANNER: &[u8] = b" >>> AVL tree shell\nType help to get a list of commands\n\n";
const PROMPT: &[u8] = b" > ";

/// Reads commands from `input` one line at a time, applies them to a fresh
/// tree and writes the results to `out`.
///
/// Lines that are not valid commands, including lines that are not UTF-8,
/// are reported and skipped.  Stops at end of input or on `quit`, and
/// returns the tree as it was left.  Only I/O failures are errors.
///
/// # Examples
/// ```
/// let mut out = Vec::new();
/// let tree = avl_keyset::shell::run(&b"insert 30\ni 20\ni 10\n"[..], &mut out).unwrap();
/// assert_eq!(tree.root_key(), Some(20));
/// ```
pub fn run<R: BufRead, W: Write>(mut input: R, mut out: W) -> io::Result<AvlTree> {
    let mut tree = AvlTree::new();
    let mut buf = Vec::new();

    out.write_all(BANNER)?;
    out.write_all(PROMPT)?;
    out.flush()?;

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let parsed = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => {
                out.write_all(PROMPT)?;
                out.flush()?;
                continue;
            }
            Ok(line) => line.parse::<Command>(),
            Err(_) => Err(ParseCommandError::NotUtf8),
        };

        let cmd = match parsed {
            Ok(cmd) => cmd,
            Err(e) => {
                log::debug!("rejected input {:?}: {e}", String::from_utf8_lossy(&buf));
                writeln!(out, " >>> {e}\n")?;
                out.write_all(PROMPT)?;
                out.flush()?;
                continue;
            }
        };

        match cmd.apply(&mut tree) {
            Outcome::Quit => {
                writeln!(out, " >>> bye")?;
                break;
            }

            Outcome::Snapshot(snap) if cmd == Command::Json => {
                match serde_json::to_string_pretty(&snap) {
                    Ok(json) => writeln!(out, "{json}\n")?,
                    Err(e) => writeln!(out, " >>> cannot encode tree: {e}\n")?,
                }
            }

            Outcome::Snapshot(snap) => {
                writeln!(out, "{snap}")?;
            }

            outcome => {
                writeln!(out, " >>> {outcome}")?;
                match cmd {
                    // mark the touched key, as a visualizer would
                    Command::Insert(k) | Command::Delete(k) => {
                        writeln!(out, "{}", tree.snapshot().highlighted(k))?;
                    }
                    _ => writeln!(out)?,
                }
            }
        }

        out.write_all(PROMPT)?;
        out.flush()?;
    }

    Ok(tree)
}
