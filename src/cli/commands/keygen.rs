//! `secrets --keygen` — create this device's identity.
//!
//! Writes the private key with owner-only permissions, registers the
//! public key in the recipient manifest, and prints the public key on
//! stdout (the only part that is safe to share).

use crate::cli::{gitignore, output, resolve_paths, Cli};
use crate::crypto::{identity, recipients as manifest};
use crate::errors::Result;

/// Execute the `--keygen` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let paths = resolve_paths(cli)?;

    let public = identity::generate(&paths.identity)?;
    output::success(&format!("Identity created at {}", paths.identity.display()));

    if manifest::append(&paths.recipients, &public)? {
        output::info(&format!(
            "Public key added to {}",
            paths.recipients.display()
        ));
    }

    println!("{public}");

    // A repo-local identity must never reach the sync layer.
    if let Some(parent) = paths.identity.parent() {
        if crate::git::is_work_tree(parent) {
            if let Some(name) = paths.identity.file_name() {
                gitignore::patch_gitignore(parent, &name.to_string_lossy());
            }
        }
    }

    crate::audit::record(&paths.dir, "keygen", None, None);

    output::tip("Share the printed public key; never share the identity file.");
    output::tip("Run `secrets --encrypt <file>` to seal your first store.");

    Ok(())
}
