//! `secrets --rekey` — re-encrypt the store for the current recipient set.
//!
//! This is how access changes: decrypt once with any valid identity,
//! seal again for N recipients. Removing someone from the set does not
//! revoke copies already distributed — the old artifact stays readable
//! to them wherever it still exists, and the command says so.

use crate::cli::{output, resolve_paths, resolve_recipients, Cli};
use crate::crypto::{identity, recipients as manifest, AgeCipher, Cipher};
use crate::errors::{Result, SecretsError};
use crate::store::{self, CredentialStore};

/// Execute the `--rekey` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let paths = resolve_paths(cli)?;

    let identity = identity::load(&paths.identity)?;
    let cipher = AgeCipher::new(paths.settings.armor);
    let store = CredentialStore::open(&paths.store, &cipher, &identity)?;

    let recipient_set = resolve_recipients(cli, &paths)?;

    if !cli.force {
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Re-encrypt {} for {} recipient(s)?",
                paths.store.display(),
                recipient_set.len()
            ))
            .default(true)
            .interact()
            .map_err(|e| SecretsError::CommandFailed(format!("confirmation prompt: {e}")))?;
        if !proceed {
            return Err(SecretsError::UserCancelled);
        }
    }

    let ciphertext = cipher.encrypt(store.raw().as_bytes(), &recipient_set)?;
    store::write_artifact(&paths.store, &ciphertext)?;

    // Keys passed via -r become the new manifest, so the recipient set
    // stays tracked in a file instead of in someone's memory.
    if !cli.recipients.is_empty() {
        manifest::save(&paths.recipients, &recipient_set)?;
        output::info(&format!(
            "Recipient manifest updated at {}",
            paths.recipients.display()
        ));
    }

    output::success(&format!(
        "Store re-encrypted for {} recipient(s)",
        recipient_set.len()
    ));
    output::warning(
        "Copies sealed for the old recipient set remain readable by removed recipients until deleted everywhere.",
    );

    crate::audit::record(
        &paths.dir,
        "rekey",
        None,
        Some(&format!("{} recipients", recipient_set.len())),
    );

    crate::git::maybe_record(
        &paths.store,
        &paths.recipients,
        cli.commit || paths.settings.auto_commit,
        "Re-encrypt secrets store",
    );

    Ok(())
}
