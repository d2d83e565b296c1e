//! Git integration — recording the encrypted artifact in version control.
//!
//! Versioning and multi-device distribution are delegated to an
//! external `git` binary; this module only stages and commits the
//! artifact (and the recipient manifest) after a successful write.
//! Conflict resolution between devices is whatever git does with a
//! binary file: last push wins. That limitation is accepted at this
//! scale, not worked around.

use std::path::Path;
use std::process::Command;

use crate::errors::{Result, SecretsError};

/// Returns `true` if `dir` is inside a git work tree.
pub fn is_work_tree(dir: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(dir)
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Stage `files` and commit them with `message`.
///
/// Files that don't exist (e.g. a manifest that was never written) are
/// skipped. A commit with nothing new staged is reported as
/// `Ok(false)`; a real git failure surfaces stderr in the error.
pub fn record_artifact(dir: &Path, files: &[&Path], message: &str) -> Result<bool> {
    let existing: Vec<&Path> = files.iter().copied().filter(|f| f.exists()).collect();
    if existing.is_empty() {
        return Ok(false);
    }

    let mut add = Command::new("git");
    add.arg("-C").arg(dir).arg("add").arg("--");
    for f in &existing {
        add.arg(f);
    }
    let out = add
        .output()
        .map_err(|e| SecretsError::Git(format!("failed to run git add: {e}")))?;
    if !out.status.success() {
        return Err(SecretsError::Git(format!(
            "git add failed: {}",
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let mut commit = Command::new("git");
    commit
        .arg("-C")
        .arg(dir)
        .args(["commit", "-m", message, "--"]);
    for f in &existing {
        commit.arg(f);
    }
    let out = commit
        .output()
        .map_err(|e| SecretsError::Git(format!("failed to run git commit: {e}")))?;

    if out.status.success() {
        return Ok(true);
    }

    // `git commit` exits 1 when the files are already committed unchanged.
    let stdout = String::from_utf8_lossy(&out.stdout);
    if stdout.contains("nothing to commit") || stdout.contains("no changes added") {
        return Ok(false);
    }

    Err(SecretsError::Git(format!(
        "git commit failed: {}",
        String::from_utf8_lossy(&out.stderr).trim()
    )))
}

/// Commit the store artifact and manifest if the caller asked for it
/// (via `--commit` or `auto_commit`) and the store lives in a repo.
///
/// Failures are reported as warnings, not errors — the encrypted write
/// already succeeded, and sync is best-effort by design.
pub fn maybe_record(store: &Path, manifest: &Path, wanted: bool, message: &str) {
    if !wanted {
        return;
    }

    let dir = match store.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => Path::new("."),
    };

    if !is_work_tree(dir) {
        crate::cli::output::warning("store is not inside a git repository — nothing recorded");
        return;
    }

    match record_artifact(dir, &[store, manifest], message) {
        Ok(true) => crate::cli::output::success("Recorded encrypted artifact in git"),
        Ok(false) => crate::cli::output::info("Artifact unchanged — nothing to commit"),
        Err(e) => crate::cli::output::warning(&e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn init_repo(dir: &Path) {
        for args in [
            vec!["init", "-q"],
            vec!["config", "user.email", "test@example.invalid"],
            vec!["config", "user.name", "Test"],
        ] {
            let ok = Command::new("git")
                .args(&args)
                .current_dir(dir)
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false);
            assert!(ok, "git {args:?} failed");
        }
    }

    #[test]
    fn not_a_work_tree() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        // TempDir may live under a repo-less tmpfs; only assert when
        // the negative result is meaningful.
        if !is_work_tree(dir.path()) {
            assert!(!is_work_tree(dir.path()));
        }
    }

    #[test]
    fn record_commits_existing_files() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());

        let store = dir.path().join("store.age");
        let manifest = dir.path().join("recipients.txt");
        fs::write(&store, b"ciphertext").unwrap();

        // Manifest missing: should be skipped, not fail.
        let committed =
            record_artifact(dir.path(), &[&store, &manifest], "update store").unwrap();
        assert!(committed);

        // Second run with no changes reports false.
        let committed =
            record_artifact(dir.path(), &[&store, &manifest], "update store").unwrap();
        assert!(!committed);
    }
}
