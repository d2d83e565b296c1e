//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod gitignore;
pub mod output;

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::config::Settings;
use crate::errors::{Result, SecretsError};

/// secrets CLI: minimal encrypted KEY=value store.
///
/// Exactly one action per invocation; each invocation is a one-shot
/// transaction (decrypt, serve, discard) with no cached plaintext.
#[derive(Parser)]
#[command(
    name = "secrets",
    about = "Minimal encrypted KEY=value secrets store",
    version
)]
#[command(group(ArgGroup::new("action").required(true).multiple(false)))]
pub struct Cli {
    /// Key to look up — prints its value on stdout
    #[arg(value_name = "KEYNAME", group = "action")]
    pub key: Option<String>,

    /// Print keys only, in store order
    #[arg(long, group = "action")]
    pub list: bool,

    /// Print every KEY=value pair, one per line
    #[arg(long, group = "action")]
    pub export: bool,

    /// Print shell-evaluable export statements (for `eval "$(secrets -s)"`)
    #[arg(short = 's', long = "shell", group = "action")]
    pub shell: bool,

    /// Print the full decrypted store content, comments included
    #[arg(long, group = "action")]
    pub decrypt: bool,

    /// Encrypt FILE to FILE.age for the configured recipient set
    #[arg(long, value_name = "FILE", group = "action")]
    pub encrypt: Option<PathBuf>,

    /// Open the store in $EDITOR (decrypts to a temp file, re-encrypts on save)
    #[arg(long, group = "action")]
    pub edit: bool,

    /// Generate a new identity and register its public key as a recipient
    #[arg(long, group = "action")]
    pub keygen: bool,

    /// Re-encrypt the store for the current recipient set
    #[arg(long, group = "action")]
    pub rekey: bool,

    /// Print a template of the store: every key with an empty value
    #[arg(long, group = "action")]
    pub template: bool,

    /// Generate shell completion scripts (bash, zsh, fish, powershell)
    #[arg(long, value_name = "SHELL", group = "action")]
    pub completions: Option<String>,

    /// View the audit log of store operations
    #[cfg(feature = "audit-log")]
    #[arg(long, group = "action")]
    pub audit: bool,

    /// Number of audit entries to show (default: 50)
    #[cfg(feature = "audit-log")]
    #[arg(long, default_value = "50", requires = "audit")]
    pub last: usize,

    /// Show audit entries since a duration ago (e.g. 7d, 24h, 30m)
    #[cfg(feature = "audit-log")]
    #[arg(long, requires = "audit")]
    pub since: Option<String>,

    // --- shared options ---
    /// Secrets directory (default: ~/.secrets)
    #[arg(long, env = "SECRETS_DIR", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Path to the encrypted store (overrides config)
    #[arg(long, env = "SECRETS_STORE", value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Path to the identity file (overrides config)
    #[arg(long, env = "SECRETS_IDENTITY", value_name = "PATH")]
    pub identity: Option<PathBuf>,

    /// Path to the recipient manifest (overrides config)
    #[arg(long, env = "SECRETS_RECIPIENTS", value_name = "PATH")]
    pub recipients_file: Option<PathBuf>,

    /// Encrypt for this recipient public key (repeatable)
    #[arg(short = 'r', long = "recipient", value_name = "PUBKEY")]
    pub recipients: Vec<String>,

    /// Record the new artifact in git after a successful write
    #[arg(long)]
    pub commit: bool,

    /// Skip confirmation prompts and overwrite existing output files
    #[arg(short = 'f', long)]
    pub force: bool,
}

/// The single operation selected by this invocation.
pub enum Action<'a> {
    Lookup(&'a str),
    List,
    Export,
    ShellSource,
    Decrypt,
    Encrypt(&'a std::path::Path),
    Edit,
    Keygen,
    Rekey,
    Template,
    Completions(&'a str),
    #[cfg(feature = "audit-log")]
    Audit,
}

impl Cli {
    /// Resolve which action this invocation selected.
    pub fn action(&self) -> Action<'_> {
        if let Some(key) = &self.key {
            return Action::Lookup(key);
        }
        if self.list {
            return Action::List;
        }
        if self.export {
            return Action::Export;
        }
        if self.shell {
            return Action::ShellSource;
        }
        if self.decrypt {
            return Action::Decrypt;
        }
        if let Some(file) = &self.encrypt {
            return Action::Encrypt(file);
        }
        if self.edit {
            return Action::Edit;
        }
        if self.keygen {
            return Action::Keygen;
        }
        if self.rekey {
            return Action::Rekey;
        }
        if self.template {
            return Action::Template;
        }
        if let Some(shell) = &self.completions {
            return Action::Completions(shell);
        }
        #[cfg(feature = "audit-log")]
        if self.audit {
            return Action::Audit;
        }
        // Clap's required `action` group guarantees one arm above matched.
        unreachable!("argument group 'action' is required")
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Fully resolved file locations for this invocation.
pub struct Paths {
    /// The secrets directory (config file, audit log, default file homes).
    pub dir: PathBuf,
    pub store: PathBuf,
    pub identity: PathBuf,
    pub recipients: PathBuf,
    pub settings: Settings,
}

/// The conventional secrets directory: `~/.secrets`.
pub fn default_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".secrets"))
        .ok_or_else(|| SecretsError::Config("cannot determine home directory".to_string()))
}

/// Resolve every path for this invocation.
///
/// Precedence per file: flag/env override, then `config.toml` in the
/// secrets directory, then the conventional default inside it.
pub fn resolve_paths(cli: &Cli) -> Result<Paths> {
    let dir = match &cli.dir {
        Some(d) => d.clone(),
        None => default_dir()?,
    };

    let settings = Settings::load(&dir)?;

    let store = cli
        .store
        .clone()
        .unwrap_or_else(|| settings.store_path(&dir));
    let identity = cli
        .identity
        .clone()
        .unwrap_or_else(|| settings.identity_path(&dir));
    let recipients = cli
        .recipients_file
        .clone()
        .unwrap_or_else(|| settings.recipients_path(&dir));

    Ok(Paths {
        dir,
        store,
        identity,
        recipients,
        settings,
    })
}

/// Resolve the recipient set for an encrypting operation.
///
/// Precedence: explicit `-r` flags, then the manifest file, then the
/// local identity's own public key. With no flags, no manifest, and no
/// identity this surfaces `IdentityNotFound`.
pub fn resolve_recipients(cli: &Cli, paths: &Paths) -> Result<Vec<age::x25519::Recipient>> {
    if !cli.recipients.is_empty() {
        return cli
            .recipients
            .iter()
            .map(|s| {
                s.trim()
                    .parse::<age::x25519::Recipient>()
                    .map_err(|_| SecretsError::InvalidRecipient(s.clone()))
            })
            .collect();
    }

    let manifest = crate::crypto::recipients::load(&paths.recipients)?;
    if !manifest.is_empty() {
        return Ok(manifest);
    }

    let identity = crate::crypto::identity::load(&paths.identity)?;
    Ok(vec![identity.to_public()])
}

/// Validate a requested key name before decrypting anything.
///
/// Store keys are identifiers, so anything else can be rejected with a
/// clearer message than a plain lookup miss.
pub fn validate_key_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SecretsError::CommandFailed(
            "key name cannot be empty".to_string(),
        ));
    }

    if !crate::store::entries::is_valid_key(name) {
        return Err(SecretsError::CommandFailed(format!(
            "'{name}' is not a valid key name — keys are letters, digits, and underscores, starting with a letter or underscore"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_key_names() {
        assert!(validate_key_name("API_KEY").is_ok());
        assert!(validate_key_name("_internal").is_ok());
        assert!(validate_key_name("v2").is_ok());
    }

    #[test]
    fn rejects_empty_key_name() {
        assert!(validate_key_name("").is_err());
    }

    #[test]
    fn rejects_non_identifier_key_names() {
        assert!(validate_key_name("with-dash").is_err());
        assert!(validate_key_name("with space").is_err());
        assert!(validate_key_name("2FA").is_err());
        assert!(validate_key_name("a.b").is_err());
    }

    #[test]
    fn flag_overrides_win_over_defaults() {
        let cli = Cli::parse_from([
            "secrets",
            "--list",
            "--dir",
            "/tmp/sdir",
            "--store",
            "/elsewhere/s.age",
        ]);
        let paths = resolve_paths(&cli).unwrap();
        assert_eq!(paths.dir, PathBuf::from("/tmp/sdir"));
        assert_eq!(paths.store, PathBuf::from("/elsewhere/s.age"));
        assert_eq!(paths.identity, PathBuf::from("/tmp/sdir/identity.txt"));
        assert_eq!(paths.recipients, PathBuf::from("/tmp/sdir/recipients.txt"));
    }

    #[test]
    fn documented_surface_parses() {
        assert!(matches!(
            Cli::parse_from(["secrets", "API_KEY"]).action(),
            Action::Lookup("API_KEY")
        ));
        assert!(matches!(
            Cli::parse_from(["secrets", "--list"]).action(),
            Action::List
        ));
        assert!(matches!(
            Cli::parse_from(["secrets", "--export"]).action(),
            Action::Export
        ));
        assert!(matches!(
            Cli::parse_from(["secrets", "-s"]).action(),
            Action::ShellSource
        ));
        assert!(matches!(
            Cli::parse_from(["secrets", "--decrypt"]).action(),
            Action::Decrypt
        ));
        assert!(matches!(
            Cli::parse_from(["secrets", "--encrypt", "plain.env"]).action(),
            Action::Encrypt(_)
        ));
    }

    #[test]
    fn actions_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["secrets", "--list", "--export"]).is_err());
        assert!(Cli::try_parse_from(["secrets", "KEY", "--list"]).is_err());
    }

    #[test]
    fn an_action_is_required() {
        assert!(Cli::try_parse_from(["secrets"]).is_err());
    }
}
