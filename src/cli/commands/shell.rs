//! `secrets -s` — print shell-evaluable export statements.
//!
//! Enables the `eval "$(secrets -s)"` pattern. Values are defensively
//! quoted so nothing in a secret is ever interpreted by the shell.

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `-s` / `--shell` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_paths, store) = super::open_store(cli)?;

    print!("{}", store.shell_source());

    Ok(())
}
