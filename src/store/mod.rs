//! High-level credential store operations used by CLI commands.
//!
//! `CredentialStore` is a one-shot read handle: opening it decrypts the
//! artifact into a zeroized in-memory buffer, parses the effective
//! entry set, and serves lookups and renderings from memory. Nothing is
//! cached across invocations and no plaintext touches disk.

pub mod entries;
pub mod shell;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::crypto::Cipher;
use crate::errors::{Result, SecretsError};

use entries::Entry;

/// A decrypted, parsed view of the credential store.
#[derive(Debug)]
pub struct CredentialStore {
    /// Path to the encrypted artifact on disk.
    path: PathBuf,

    /// Full decrypted text, comments included (wiped on drop).
    plaintext: Zeroizing<String>,

    /// Effective entries: first occurrence of each key, in file order.
    entries: Vec<Entry>,
}

impl CredentialStore {
    /// Decrypt the artifact at `path` and parse it.
    ///
    /// Fails with `StoreNotFound` before touching the cipher so a
    /// missing file is never reported as a decryption problem.
    pub fn open(path: &Path, cipher: &dyn Cipher, identity: &age::x25519::Identity) -> Result<Self> {
        if !path.exists() {
            return Err(SecretsError::StoreNotFound(path.to_path_buf()));
        }

        let ciphertext = std::fs::read(path)?;
        let plaintext_bytes = cipher.decrypt(&ciphertext, identity)?;

        let plaintext = Zeroizing::new(
            std::str::from_utf8(&plaintext_bytes)
                .map_err(|_| SecretsError::NotUtf8)?
                .to_string(),
        );

        let entries = entries::parse_lenient(&plaintext);

        Ok(Self {
            path: path.to_path_buf(),
            plaintext,
            entries,
        })
    }

    /// Return the value for `key` (case-sensitive exact match).
    pub fn lookup(&self, key: &str) -> Result<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
            .ok_or_else(|| SecretsError::KeyNotFound(key.to_string()))
    }

    /// All keys, in store order, values withheld.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }

    /// Render the full `KEY=value` sequence, one per line, store order.
    pub fn export(&self) -> String {
        let mut out = String::new();
        for e in &self.entries {
            let _ = writeln!(out, "{}={}", e.key, e.value);
        }
        out
    }

    /// Render shell-evaluable export statements, one per line.
    pub fn shell_source(&self) -> String {
        let mut out = String::new();
        for e in &self.entries {
            out.push_str(&shell::export_line(&e.key, &e.value));
            out.push('\n');
        }
        out
    }

    /// Render a template: every key with an empty value, for
    /// discoverability without exposing secret material.
    pub fn template(&self) -> String {
        let mut out = String::new();
        for e in &self.entries {
            let _ = writeln!(out, "{}=", e.key);
        }
        out
    }

    /// The full decrypted file content, comments included.
    pub fn raw(&self) -> &str {
        &self.plaintext
    }

    /// Path to the encrypted artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of effective entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

/// Write an encrypted artifact **atomically**.
///
/// Writes to a temp file in the same directory, then renames it over
/// the target. Readers never see a half-written store, and any failure
/// before the rename leaves the original artifact untouched.
pub fn write_artifact(path: &Path, ciphertext: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !parent.exists() {
        std::fs::create_dir_all(&parent)?;
    }

    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    std::fs::write(&tmp_path, ciphertext)?;
    std::fs::rename(&tmp_path, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::AgeCipher;

    fn store_from(text: &str) -> (tempfile::TempDir, CredentialStore, age::x25519::Identity) {
        let dir = tempfile::TempDir::new().unwrap();
        let identity = age::x25519::Identity::generate();
        let cipher = AgeCipher::new(false);
        let ciphertext = cipher
            .encrypt(text.as_bytes(), &[identity.to_public()])
            .unwrap();
        let path = dir.path().join("store.age");
        std::fs::write(&path, ciphertext).unwrap();
        let store = CredentialStore::open(&path, &cipher, &identity).unwrap();
        (dir, store, identity)
    }

    #[test]
    fn open_missing_store_is_store_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let identity = age::x25519::Identity::generate();
        let err = CredentialStore::open(
            &dir.path().join("absent.age"),
            &AgeCipher::new(false),
            &identity,
        )
        .unwrap_err();
        assert!(matches!(err, SecretsError::StoreNotFound(_)));
    }

    #[test]
    fn documented_scenario() {
        let (_dir, store, _id) = store_from("A=1\nB=two words\n#comment\n");

        assert_eq!(store.keys(), vec!["A", "B"]);
        assert_eq!(store.export(), "A=1\nB=two words\n");
        assert_eq!(store.lookup("A").unwrap(), "1");
        assert!(matches!(
            store.lookup("C").unwrap_err(),
            SecretsError::KeyNotFound(k) if k == "C"
        ));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let (_dir, store, _id) = store_from("Key=x\n");
        assert!(store.lookup("KEY").is_err());
        assert_eq!(store.lookup("Key").unwrap(), "x");
    }

    #[test]
    fn raw_preserves_comments() {
        let text = "# header\nA=1\n";
        let (_dir, store, _id) = store_from(text);
        assert_eq!(store.raw(), text);
    }

    #[test]
    fn shell_source_matches_export_pairs() {
        let (_dir, store, _id) = store_from("A=1\nB=two words\nC=it's $x\n");
        assert_eq!(
            store.shell_source(),
            "export A='1'\nexport B='two words'\nexport C='it'\\''s $x'\n"
        );
    }

    #[test]
    fn template_lists_keys_without_values() {
        let (_dir, store, _id) = store_from("A=1\nB=two words\n");
        assert_eq!(store.template(), "A=\nB=\n");
    }

    #[test]
    fn write_artifact_replaces_atomically() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("store.age");

        write_artifact(&path, b"first").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        write_artifact(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");

        // No temp file left behind.
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn write_artifact_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.age");
        write_artifact(&path, b"data").unwrap();
        assert!(path.exists());
    }
}
