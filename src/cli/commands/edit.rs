//! `secrets --edit` — open the store in an editor.
//!
//! Decrypts to a randomly named, owner-only temp file, launches
//! `$VISUAL` / `$EDITOR` / `vi`, strict-validates the result, re-encrypts
//! for the original recipient set, and replaces the artifact atomically.
//!
//! The plaintext temp file is wiped and removed on every exit path:
//! normal completion, validation failure, editor failure, and
//! interruption (a signal handler unlinks the registered path before
//! the process dies).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use rand::Rng;
use zeroize::Zeroize;

use crate::cli::{output, resolve_paths, resolve_recipients, Cli};
use crate::crypto::{identity, AgeCipher, Cipher};
use crate::errors::{Result, SecretsError};
use crate::store::{self, entries, CredentialStore};

/// The temp file registered for signal cleanup. One edit session per
/// process, so a single slot is enough.
static ACTIVE_TEMP: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Execute the `--edit` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let paths = resolve_paths(cli)?;

    let identity = identity::load(&paths.identity)?;
    let cipher = AgeCipher::new(paths.settings.armor);
    let store = CredentialStore::open(&paths.store, &cipher, &identity)?;

    // Resolve recipients up front — failing after the editor closed
    // would throw the user's edits away.
    let recipient_set = resolve_recipients(cli, &paths)?;

    let temp = TempPlaintext::create(store.raw().as_bytes())?;
    install_signal_cleanup();

    let editor = find_editor();
    let status = Command::new(&editor)
        .arg(temp.path())
        .status()
        .map_err(|e| SecretsError::Editor(format!("failed to launch '{editor}': {e}")))?;

    if !status.success() {
        return Err(SecretsError::Editor(format!(
            "editor exited with code {} — store left untouched",
            status.code().unwrap_or(-1)
        )));
    }

    let mut edited = fs::read_to_string(temp.path())
        .map_err(|e| SecretsError::Editor(format!("failed to read edited file: {e}")))?;

    // The plaintext is in memory now; wipe the temp file immediately
    // instead of waiting for the end of the function.
    drop(temp);

    // Validate before sealing: a duplicate key or malformed line aborts
    // the whole edit and leaves the original artifact in place.
    let entry_count = match entries::parse_strict(&edited) {
        Ok(entries) => entries.len(),
        Err(e) => {
            edited.zeroize();
            return Err(e);
        }
    };

    if edited == store.raw() {
        edited.zeroize();
        output::info("No changes detected.");
        return Ok(());
    }

    let sealed = cipher.encrypt(edited.as_bytes(), &recipient_set);
    edited.zeroize();
    let ciphertext = sealed?;

    // New ciphertext lands on a sibling path first; the rename is the
    // only moment the store changes.
    store::write_artifact(&paths.store, &ciphertext)?;

    output::success(&format!(
        "Store updated — {} entries, {} recipient(s)",
        entry_count,
        recipient_set.len()
    ));

    crate::audit::record(
        &paths.dir,
        "edit",
        None,
        Some(&format!("{entry_count} entries")),
    );

    crate::git::maybe_record(
        &paths.store,
        &paths.recipients,
        cli.commit || paths.settings.auto_commit,
        "Update secrets store",
    );

    Ok(())
}

// ---------------------------------------------------------------------------
// Scoped plaintext exposure
// ---------------------------------------------------------------------------

/// A plaintext temp file that cannot outlive its scope.
///
/// Created with a random name and owner-only permissions; the `Drop`
/// impl overwrites the contents with zeros and unlinks it, so every
/// return path out of `execute` cleans up.
struct TempPlaintext {
    path: PathBuf,
}

impl TempPlaintext {
    fn create(content: &[u8]) -> Result<Self> {
        let token: u128 = rand::rng().random();
        let path = std::env::temp_dir().join(format!("secrets-edit-{token:032x}.env"));

        // Create with 0600 atomically (no TOCTOU race).
        #[cfg(unix)]
        let mut file = {
            use std::os::unix::fs::OpenOptionsExt;
            fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .mode(0o600)
                .open(&path)
                .map_err(|e| SecretsError::Editor(format!("failed to create temp file: {e}")))?
        };

        #[cfg(not(unix))]
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| SecretsError::Editor(format!("failed to create temp file: {e}")))?;

        file.write_all(content)?;
        file.flush()?;

        if let Ok(mut slot) = ACTIVE_TEMP.lock() {
            *slot = Some(path.clone());
        }

        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempPlaintext {
    fn drop(&mut self) {
        secure_delete(&self.path);
        if let Ok(mut slot) = ACTIVE_TEMP.lock() {
            *slot = None;
        }
    }
}

/// Overwrite a file's contents with zeros before deleting it.
/// Best-effort: failures are silently ignored.
fn secure_delete(path: &Path) {
    if let Ok(metadata) = fs::metadata(path) {
        let len = metadata.len() as usize;
        if len > 0 {
            if let Ok(mut file) = fs::OpenOptions::new().write(true).open(path) {
                let zeros = vec![0u8; len];
                let _ = file.write_all(&zeros);
                let _ = file.flush();
            }
        }
    }
    let _ = fs::remove_file(path);
}

// ---------------------------------------------------------------------------
// Signal cleanup
// ---------------------------------------------------------------------------

/// Install handlers so an interrupt during the editor session still
/// removes the plaintext temp file. Drop handles every normal path;
/// this covers the one Drop cannot.
#[cfg(unix)]
fn install_signal_cleanup() {
    let handler = cleanup_and_exit as extern "C" fn(libc::c_int) as libc::sighandler_t;
    unsafe {
        libc::signal(libc::SIGINT, handler);
        libc::signal(libc::SIGTERM, handler);
        libc::signal(libc::SIGHUP, handler);
    }
}

#[cfg(not(unix))]
fn install_signal_cleanup() {}

#[cfg(unix)]
extern "C" fn cleanup_and_exit(signum: libc::c_int) {
    if let Ok(slot) = ACTIVE_TEMP.try_lock() {
        if let Some(path) = slot.as_ref() {
            let _ = fs::remove_file(path);
        }
    }
    // SAFETY: _exit is async-signal-safe, unlike process::exit.
    unsafe { libc::_exit(128 + signum) };
}

// ---------------------------------------------------------------------------
// Editor discovery
// ---------------------------------------------------------------------------

/// Find the user's preferred editor.
fn find_editor() -> String {
    if let Ok(editor) = std::env::var("VISUAL") {
        if !editor.is_empty() {
            return editor;
        }
    }

    if let Ok(editor) = std::env::var("EDITOR") {
        if !editor.is_empty() {
            return editor;
        }
    }

    "vi".to_string()
}
