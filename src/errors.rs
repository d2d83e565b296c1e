use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in the secrets CLI.
///
/// Every variant carries a message the user can act on. A lookup miss
/// (`KeyNotFound`) is deliberately distinct from a decryption failure
/// (`NoMatchingIdentity`, `DecryptionFailed`) so callers can tell a
/// missing entry from a broken or foreign store. Decrypted plaintext
/// never appears in any message.
#[derive(Debug, Error)]
pub enum SecretsError {
    // --- Identity / recipient errors ---
    #[error("no identity found at {0} — run `secrets --keygen` to create one")]
    IdentityNotFound(PathBuf),

    #[error("invalid identity file {0}: {1}")]
    InvalidIdentity(PathBuf, String),

    #[error("{0} is readable by other users — run `chmod 600 {0}`")]
    Permission(PathBuf),

    #[error("invalid recipient '{0}' — expected an age public key (age1…)")]
    InvalidRecipient(String),

    // --- Store errors ---
    #[error("encrypted store not found at {0} — fetch it from another device or create one with `secrets --encrypt <file>`")]
    StoreNotFound(PathBuf),

    #[error("store was not encrypted for this identity — ask a current recipient to add your public key and run `secrets --rekey`")]
    NoMatchingIdentity,

    #[error("decryption failed — the store file may be corrupted: {0}")]
    DecryptionFailed(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("store is not valid UTF-8 text")]
    NotUtf8,

    // --- Entry errors ---
    #[error("no entry named '{0}' in the store")]
    KeyNotFound(String),

    #[error("line {line}: {reason}")]
    InvalidEntry { line: usize, reason: String },

    #[error("duplicate key '{key}' on line {line} — keys must be unique within a store")]
    DuplicateKey { key: String, line: usize },

    // --- Config errors ---
    #[error("config file error: {0}")]
    Config(String),

    // --- Workflow errors ---
    #[error("editor error: {0}")]
    Editor(String),

    #[error("git error: {0}")]
    Git(String),

    #[error("user cancelled operation")]
    UserCancelled,

    // --- CLI errors ---
    #[error("command failed: {0}")]
    CommandFailed(String),

    // --- Audit errors ---
    #[error("audit error: {0}")]
    Audit(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for secrets results.
pub type Result<T> = std::result::Result<T, SecretsError>;
