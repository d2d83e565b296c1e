//! `secrets KEYNAME` — retrieve and print a single value.

use crate::cli::{validate_key_name, Cli};
use crate::errors::Result;

/// Execute a key lookup.
pub fn execute(cli: &Cli, key: &str) -> Result<()> {
    validate_key_name(key)?;

    let (_paths, store) = super::open_store(cli)?;

    // A miss surfaces as KeyNotFound, clearly distinct from any
    // decryption failure raised while opening the store.
    let value = store.lookup(key)?;
    println!("{value}");

    Ok(())
}
