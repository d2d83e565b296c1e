//! `secrets --template` — print a key listing with empty values.
//!
//! The template is safe to share and to commit unencrypted: it shows
//! which keys a store is expected to contain without any values. A new
//! device can redirect it to a file, fill it in, and seal it with
//! `secrets --encrypt`.

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `--template` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_paths, store) = super::open_store(cli)?;

    print!("{}", store.template());

    Ok(())
}
