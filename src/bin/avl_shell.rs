//! Line-oriented driver for an [`AvlTree`](avl_keyset::AvlTree).
//!
//! Reads one command per line from stdin and prints the result.  Set
//! `RUST_LOG=debug` (or `trace` to see every rotation) for diagnostics.

use std::io::{stdin, stdout};

fn main() -> std::io::Result<()> {
    pretty_env_logger::init();

    let tree = avl_keyset::shell::run(stdin().lock(), stdout().lock())?;
    log::debug!("exiting with {} keys", tree.len());

    Ok(())
}
