//! Integration tests for the credential store module.

use std::fs;

use secrets::crypto::{AgeCipher, Cipher};
use secrets::errors::SecretsError;
use secrets::store::{self, CredentialStore};
use tempfile::TempDir;

/// Helper: seal `text` for `recipients` and write it to a store file.
fn sealed_store(
    dir: &TempDir,
    text: &str,
    recipients: &[age::x25519::Recipient],
) -> std::path::PathBuf {
    let cipher = AgeCipher::new(false);
    let ciphertext = cipher.encrypt(text.as_bytes(), recipients).unwrap();
    let path = dir.path().join("store.age");
    fs::write(&path, ciphertext).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Round-trip and access laws
// ---------------------------------------------------------------------------

#[test]
fn seal_and_reopen_round_trip() {
    let dir = TempDir::new().unwrap();
    let identity = age::x25519::Identity::generate();
    let text = "# infra\nDB_URL=postgres://localhost/db\nAPI_KEY=sk-12345abcde\n";

    let path = sealed_store(&dir, text, &[identity.to_public()]);

    let store = CredentialStore::open(&path, &AgeCipher::new(false), &identity).unwrap();
    assert_eq!(store.raw(), text);
    assert_eq!(store.lookup("DB_URL").unwrap(), "postgres://localhost/db");
    assert_eq!(store.lookup("API_KEY").unwrap(), "sk-12345abcde");
}

#[test]
fn lookup_agrees_with_export_for_every_key() {
    let dir = TempDir::new().unwrap();
    let identity = age::x25519::Identity::generate();
    let text = "A=1\nB=two words\nC=a=b=c\nD=\n";

    let path = sealed_store(&dir, text, &[identity.to_public()]);
    let store = CredentialStore::open(&path, &AgeCipher::new(false), &identity).unwrap();

    for line in store.export().lines() {
        let (key, value) = line.split_once('=').expect("export line shape");
        assert_eq!(store.lookup(key).unwrap(), value);
    }
}

#[test]
fn list_is_ordered_and_leaks_no_values() {
    let dir = TempDir::new().unwrap();
    let identity = age::x25519::Identity::generate();
    let text = "ZEBRA=1\nALPHA=hunter2\nMIKE=3\n";

    let path = sealed_store(&dir, text, &[identity.to_public()]);
    let store = CredentialStore::open(&path, &AgeCipher::new(false), &identity).unwrap();

    // Store order, not sorted.
    assert_eq!(store.keys(), vec!["ZEBRA", "ALPHA", "MIKE"]);

    let listing = store.keys().join("\n");
    assert!(!listing.contains("hunter2"));
}

// ---------------------------------------------------------------------------
// Multi-recipient access
// ---------------------------------------------------------------------------

#[test]
fn both_recipients_decrypt_the_same_artifact() {
    let dir = TempDir::new().unwrap();
    let first = age::x25519::Identity::generate();
    let second = age::x25519::Identity::generate();

    let path = sealed_store(&dir, "X=y\n", &[first.to_public(), second.to_public()]);

    let cipher = AgeCipher::new(false);
    let via_first = CredentialStore::open(&path, &cipher, &first).unwrap();
    let via_second = CredentialStore::open(&path, &cipher, &second).unwrap();

    assert_eq!(via_first.lookup("X").unwrap(), "y");
    assert_eq!(via_second.lookup("X").unwrap(), "y");
}

#[test]
fn foreign_identity_fails_distinctly_from_lookup_miss() {
    let dir = TempDir::new().unwrap();
    let insider = age::x25519::Identity::generate();
    let outsider = age::x25519::Identity::generate();

    let path = sealed_store(&dir, "X=y\n", &[insider.to_public()]);

    let err = CredentialStore::open(&path, &AgeCipher::new(false), &outsider).unwrap_err();
    assert!(matches!(err, SecretsError::NoMatchingIdentity));

    // Same store, right identity, missing key: a different error.
    let store = CredentialStore::open(&path, &AgeCipher::new(false), &insider).unwrap();
    assert!(matches!(
        store.lookup("MISSING").unwrap_err(),
        SecretsError::KeyNotFound(_)
    ));
}

// ---------------------------------------------------------------------------
// Atomic replacement
// ---------------------------------------------------------------------------

#[test]
fn rewriting_the_artifact_preserves_readability() {
    let dir = TempDir::new().unwrap();
    let identity = age::x25519::Identity::generate();
    let cipher = AgeCipher::new(false);

    let path = sealed_store(&dir, "A=1\n", &[identity.to_public()]);

    let updated = cipher
        .encrypt(b"A=2\nB=new\n", &[identity.to_public()])
        .unwrap();
    store::write_artifact(&path, &updated).unwrap();

    let store = CredentialStore::open(&path, &cipher, &identity).unwrap();
    assert_eq!(store.lookup("A").unwrap(), "2");
    assert_eq!(store.lookup("B").unwrap(), "new");
}

// ---------------------------------------------------------------------------
// Armored artifacts
// ---------------------------------------------------------------------------

#[test]
fn armored_store_opens_like_binary() {
    let dir = TempDir::new().unwrap();
    let identity = age::x25519::Identity::generate();

    let armored = AgeCipher::new(true)
        .encrypt(b"A=1\n", &[identity.to_public()])
        .unwrap();
    let path = dir.path().join("store.age");
    fs::write(&path, armored).unwrap();

    // Opening with a binary-writing cipher still works — reads
    // auto-detect armor.
    let store = CredentialStore::open(&path, &AgeCipher::new(false), &identity).unwrap();
    assert_eq!(store.lookup("A").unwrap(), "1");
}
