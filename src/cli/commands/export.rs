//! `secrets --export` — print the full `KEY=value` sequence.
//!
//! Output is the effective entry set in store order, suitable for
//! redirection into an env-file.

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `--export` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (paths, store) = super::open_store(cli)?;

    print!("{}", store.export());

    crate::audit::record(
        &paths.dir,
        "export",
        None,
        Some(&format!("{} entries", store.entry_count())),
    );

    Ok(())
}
