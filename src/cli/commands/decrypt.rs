//! `secrets --decrypt` — print the full decrypted store content.
//!
//! Unlike `--export`, this reproduces the file byte-for-byte, comments
//! and blank lines included, for human inspection.

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `--decrypt` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_paths, store) = super::open_store(cli)?;

    print!("{}", store.raw());

    Ok(())
}
