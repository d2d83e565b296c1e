//! `secrets --list` — print keys only, one per line, store order.

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `--list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_paths, store) = super::open_store(cli)?;

    for key in store.keys() {
        println!("{key}");
    }

    Ok(())
}
