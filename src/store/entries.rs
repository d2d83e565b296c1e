//! Plaintext store parsing — `KEY=value` lines, comments, blanks.
//!
//! Two parsing modes share one line classifier:
//! - **lenient** (read side): duplicate keys resolve first-match-wins,
//!   lines that are neither blank, comment, nor `KEY=value` are skipped.
//! - **strict** (write side): duplicates and malformed lines are
//!   rejected with a line-numbered error, so a bad file never gets
//!   sealed into the encrypted artifact.

use crate::errors::{Result, SecretsError};

/// A single `(key, value)` pair from the store, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

/// Classification of one raw line from the plaintext store.
#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Comment,
    Entry { key: &'a str, value: &'a str },
    Malformed { reason: String },
}

/// Classify a single line.
///
/// The key must match the identifier pattern (letter or underscore,
/// then letters, digits, underscores). The value is everything after
/// the first `=`, verbatim — it may itself contain `=`. A trailing
/// carriage return is tolerated for files edited on Windows.
pub fn classify(raw: &str) -> Line<'_> {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    let trimmed = line.trim_start();

    if trimmed.is_empty() {
        return Line::Blank;
    }
    if trimmed.starts_with('#') {
        return Line::Comment;
    }

    match trimmed.split_once('=') {
        Some((key, value)) if is_valid_key(key) => Line::Entry { key, value },
        Some((key, _)) => Line::Malformed {
            reason: format!(
                "'{key}' is not a valid key — keys are letters, digits, and underscores, starting with a letter or underscore"
            ),
        },
        None => Line::Malformed {
            reason: "missing '=' — expected KEY=value".to_string(),
        },
    }
}

/// Returns `true` if `key` matches the identifier pattern.
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse store text leniently for read-side operations.
///
/// Returns the effective entry set: first occurrence of each key, in
/// file order. Later duplicates and malformed lines are ignored.
pub fn parse_lenient(text: &str) -> Vec<Entry> {
    let mut entries: Vec<Entry> = Vec::new();

    for raw in text.lines() {
        if let Line::Entry { key, value } = classify(raw) {
            if entries.iter().any(|e| e.key == key) {
                continue;
            }
            entries.push(Entry {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
    }

    entries
}

/// Parse store text strictly for write-side operations.
///
/// Rejects malformed lines and duplicate keys, reporting the 1-based
/// line number of the offending line.
pub fn parse_strict(text: &str) -> Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        match classify(raw) {
            Line::Blank | Line::Comment => {}
            Line::Entry { key, value } => {
                if entries.iter().any(|e| e.key == key) {
                    return Err(SecretsError::DuplicateKey {
                        key: key.to_string(),
                        line: line_no,
                    });
                }
                entries.push(Entry {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
            Line::Malformed { reason } => {
                return Err(SecretsError::InvalidEntry {
                    line: line_no,
                    reason,
                });
            }
        }
    }

    Ok(entries)
}
