//! Identity file management — the private X25519 key for this device.
//!
//! The identity file uses the age convention: `#` comment lines plus a
//! single `AGE-SECRET-KEY-1…` line. It is written once with owner-only
//! permissions and refused at load time if anyone else can read it.

use std::fs;
use std::path::Path;

use age::secrecy::ExposeSecret;
use chrono::Utc;
use zeroize::Zeroizing;

use crate::errors::{Result, SecretsError};

/// Generate a new identity and write it to `path`.
///
/// Refuses to overwrite an existing file — losing an identity means
/// losing access to every artifact encrypted only for it. Returns the
/// public key so the caller can register it as a recipient.
pub fn generate(path: &Path) -> Result<age::x25519::Recipient> {
    if path.exists() {
        return Err(SecretsError::CommandFailed(format!(
            "identity already exists at {} — refusing to overwrite",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(parent, fs::Permissions::from_mode(0o700))?;
            }
        }
    }

    let identity = age::x25519::Identity::generate();
    let public = identity.to_public();

    let contents = format!(
        "# created: {}\n# public key: {}\n{}\n",
        Utc::now().to_rfc3339(),
        public,
        identity.to_string().expose_secret()
    );

    // Create with 0600 atomically — no window where the file is world-readable.
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(contents.as_bytes())?;
    }

    #[cfg(not(unix))]
    fs::write(path, &contents)?;

    Ok(public)
}

/// Load the identity from `path`.
///
/// Fails with `IdentityNotFound` if the file is missing and
/// `Permission` if it is group- or world-readable.
pub fn load(path: &Path) -> Result<age::x25519::Identity> {
    if !path.exists() {
        return Err(SecretsError::IdentityNotFound(path.to_path_buf()));
    }

    check_permissions(path)?;

    let contents = Zeroizing::new(fs::read_to_string(path)?);

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        return line.parse::<age::x25519::Identity>().map_err(|e| {
            SecretsError::InvalidIdentity(path.to_path_buf(), e.to_string())
        });
    }

    Err(SecretsError::InvalidIdentity(
        path.to_path_buf(),
        "no AGE-SECRET-KEY line found".to_string(),
    ))
}

/// Reject identity files that other users can read.
#[cfg(unix)]
fn check_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(path)?.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(SecretsError::Permission(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn check_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
