use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SecretsError};

/// Directory-level configuration, loaded from `config.toml` inside the
/// secrets directory.
///
/// Every field has a sensible default so the tool works out-of-the-box
/// without any config file at all. File name fields may be absolute
/// paths; relative values resolve against the secrets directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Encrypted store file name (default: "store.age").
    #[serde(default = "default_store")]
    pub store: String,

    /// Identity file name (default: "identity.txt").
    #[serde(default = "default_identity")]
    pub identity: String,

    /// Recipient manifest file name (default: "recipients.txt").
    #[serde(default = "default_recipients")]
    pub recipients: String,

    /// Write ASCII-armored artifacts instead of binary (default: false).
    #[serde(default)]
    pub armor: bool,

    /// Commit the artifact and manifest to git after every successful
    /// write, without needing `--commit` (default: false).
    #[serde(default)]
    pub auto_commit: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_store() -> String {
    "store.age".to_string()
}

fn default_identity() -> String {
    "identity.txt".to_string()
}

fn default_recipients() -> String {
    "recipients.txt".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            store: default_store(),
            identity: default_identity(),
            recipients: default_recipients(),
            armor: false,
            auto_commit: false,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the secrets directory.
    const FILE_NAME: &'static str = "config.toml";

    /// Load settings from `<dir>/config.toml`.
    ///
    /// If the file does not exist, defaults are returned. If the file
    /// exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            SecretsError::Config(format!("failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Full path to the encrypted store.
    pub fn store_path(&self, dir: &Path) -> PathBuf {
        resolve(dir, &self.store)
    }

    /// Full path to the identity file.
    pub fn identity_path(&self, dir: &Path) -> PathBuf {
        resolve(dir, &self.identity)
    }

    /// Full path to the recipient manifest.
    pub fn recipients_path(&self, dir: &Path) -> PathBuf {
        resolve(dir, &self.recipients)
    }
}

fn resolve(dir: &Path, name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
