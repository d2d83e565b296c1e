//! Recipient manifest — the versioned list of public keys the store is
//! sealed for.
//!
//! One `age1…` key per line, `#` comments allowed. The manifest lives
//! next to the encrypted artifact and is meant to be committed with it,
//! so the recipient set at any point in history is recoverable instead
//! of living only in an operator's memory.

use std::fs;
use std::path::Path;

use chrono::Utc;

use crate::errors::{Result, SecretsError};

/// Parse manifest text into recipients, preserving file order.
pub fn parse(contents: &str) -> Result<Vec<age::x25519::Recipient>> {
    let mut recipients = Vec::new();

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let recipient = line
            .parse::<age::x25519::Recipient>()
            .map_err(|_| SecretsError::InvalidRecipient(line.to_string()))?;
        recipients.push(recipient);
    }

    Ok(recipients)
}

/// Load the manifest at `path`. A missing file is an empty set, not an
/// error — callers fall back to the local identity's own key.
pub fn load(path: &Path) -> Result<Vec<age::x25519::Recipient>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    parse(&fs::read_to_string(path)?)
}

/// Write the manifest, stamping an `# updated:` header so the sync
/// layer records when the recipient set changed.
pub fn save(path: &Path, recipients: &[age::x25519::Recipient]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut contents = format!("# updated: {}\n", Utc::now().to_rfc3339());
    for r in recipients {
        contents.push_str(&r.to_string());
        contents.push('\n');
    }

    fs::write(path, contents)?;
    Ok(())
}

/// Append `recipient` to the manifest if not already present.
///
/// Returns `true` if the manifest changed.
pub fn append(path: &Path, recipient: &age::x25519::Recipient) -> Result<bool> {
    let mut recipients = load(path)?;
    let key = recipient.to_string();

    if recipients.iter().any(|r| r.to_string() == key) {
        return Ok(false);
    }

    recipients.push(recipient.clone());
    save(path, &recipients)?;
    Ok(true)
}
