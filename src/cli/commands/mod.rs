//! Command implementations — one module per CLI action.

pub mod completions;
pub mod decrypt;
pub mod edit;
pub mod encrypt;
pub mod export;
pub mod keygen;
pub mod list;
pub mod lookup;
pub mod rekey;
pub mod shell;
pub mod template;

#[cfg(feature = "audit-log")]
pub mod audit_cmd;

use crate::cli::{Cli, Paths};
use crate::crypto::{identity, AgeCipher};
use crate::errors::Result;
use crate::store::CredentialStore;

/// Resolve paths, load the identity, and decrypt the store — the
/// shared preamble of every read-side command.
pub(crate) fn open_store(cli: &Cli) -> Result<(Paths, CredentialStore)> {
    let paths = crate::cli::resolve_paths(cli)?;
    let identity = identity::load(&paths.identity)?;
    let cipher = AgeCipher::new(paths.settings.armor);
    let store = CredentialStore::open(&paths.store, &cipher, &identity)?;
    Ok((paths, store))
}
