//! `secrets --encrypt FILE` — seal a plaintext file for the recipient set.
//!
//! The file is strict-validated first: duplicate keys and malformed
//! lines are rejected before anything is sealed, so a bad store never
//! reaches the sync layer. Output goes to `FILE.age`.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::cli::{output, resolve_paths, resolve_recipients, Cli};
use crate::crypto::{AgeCipher, Cipher};
use crate::errors::{Result, SecretsError};
use crate::store::{self, entries};

/// Execute the `--encrypt` command.
pub fn execute(cli: &Cli, file: &Path) -> Result<()> {
    if !file.exists() {
        return Err(SecretsError::CommandFailed(format!(
            "{} not found",
            file.display()
        )));
    }

    let plaintext = Zeroizing::new(fs::read(file)?);
    let text = std::str::from_utf8(&plaintext).map_err(|_| SecretsError::NotUtf8)?;
    let entry_count = entries::parse_strict(text)?.len();

    let paths = resolve_paths(cli)?;
    let recipient_set = resolve_recipients(cli, &paths)?;

    let cipher = AgeCipher::new(paths.settings.armor);
    let ciphertext = cipher.encrypt(&plaintext, &recipient_set)?;

    let out_path = ciphertext_path(file);
    if out_path.exists() && !cli.force {
        let overwrite = dialoguer::Confirm::new()
            .with_prompt(format!("{} already exists. Overwrite?", out_path.display()))
            .default(false)
            .interact()
            .map_err(|e| SecretsError::CommandFailed(format!("confirmation prompt: {e}")))?;
        if !overwrite {
            return Err(SecretsError::UserCancelled);
        }
    }

    store::write_artifact(&out_path, &ciphertext)?;

    output::success(&format!(
        "Encrypted {} entries to {} for {} recipient(s)",
        entry_count,
        out_path.display(),
        recipient_set.len()
    ));
    output::tip("The plaintext file is still on disk — delete it once you've verified the artifact.");

    crate::audit::record(
        &paths.dir,
        "encrypt",
        None,
        Some(&format!(
            "{} entries, {} recipients",
            entry_count,
            recipient_set.len()
        )),
    );

    Ok(())
}

/// `FILE` → `FILE.age` (extension appended, not replaced).
fn ciphertext_path(file: &Path) -> PathBuf {
    let mut name = OsString::from(file.as_os_str());
    name.push(".age");
    PathBuf::from(name)
}
