//! Audit log — SQLite-based operation history.
//!
//! Records which operations touched the store (encrypt, edit, rekey,
//! export, keygen) in a local database at `<dir>/audit.db`. Only
//! operation names, key names, and counts are stored — never values.
//!
//! Designed for graceful degradation: if the database can't be opened
//! or written to, operations silently continue without logging. The
//! whole backend compiles away without the `audit-log` feature.

use std::path::Path;

/// Record an operation. Fire-and-forget; a no-op without the
/// `audit-log` feature.
pub fn record(dir: &Path, operation: &str, key_name: Option<&str>, details: Option<&str>) {
    #[cfg(feature = "audit-log")]
    if let Some(audit) = AuditLog::open(dir) {
        audit.log(operation, key_name, details);
    }

    #[cfg(not(feature = "audit-log"))]
    let _ = (dir, operation, key_name, details);
}

#[cfg(feature = "audit-log")]
pub use backend::{AuditEntry, AuditLog};

#[cfg(feature = "audit-log")]
mod backend {
    use std::path::{Path, PathBuf};

    use chrono::{DateTime, Utc};
    use rusqlite::Connection;

    use crate::errors::{Result, SecretsError};

    /// A single audit log entry.
    #[derive(Debug, Clone)]
    pub struct AuditEntry {
        pub id: i64,
        pub timestamp: DateTime<Utc>,
        pub operation: String,
        pub key_name: Option<String>,
        pub details: Option<String>,
    }

    /// SQLite-backed audit log.
    pub struct AuditLog {
        conn: Connection,
    }

    impl AuditLog {
        /// Open (or create) the audit database at `<dir>/audit.db`.
        ///
        /// Returns `None` if the database can't be opened — callers
        /// should treat this as "audit logging unavailable" and
        /// continue normally.
        pub fn open(dir: &Path) -> Option<Self> {
            let db_path = dir.join("audit.db");
            let conn = Connection::open(&db_path).ok()?;

            // Owner-only, same as every other file in the directory.
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let perms = std::fs::Permissions::from_mode(0o600);
                let _ = std::fs::set_permissions(&db_path, perms);
            }

            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS audit_log (
                    id        INTEGER PRIMARY KEY AUTOINCREMENT,
                    timestamp TEXT NOT NULL,
                    operation TEXT NOT NULL,
                    key_name  TEXT,
                    details   TEXT
                );",
            )
            .ok()?;

            Some(Self { conn })
        }

        /// Record an operation. Fire-and-forget — errors are silently ignored.
        pub fn log(&self, operation: &str, key_name: Option<&str>, details: Option<&str>) {
            let now = Utc::now().to_rfc3339();
            let _ = self.conn.execute(
                "INSERT INTO audit_log (timestamp, operation, key_name, details)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![now, operation, key_name, details],
            );
        }

        /// Query recent audit entries.
        ///
        /// - `limit`: maximum number of entries to return (most recent first).
        /// - `since`: if provided, only return entries newer than this timestamp.
        pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
            let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
            let (sql, params): (&str, Vec<Box<dyn rusqlite::types::ToSql>>) = match since {
                Some(ref ts) => (
                    "SELECT id, timestamp, operation, key_name, details
                     FROM audit_log
                     WHERE timestamp >= ?1
                     ORDER BY id DESC
                     LIMIT ?2",
                    vec![
                        Box::new(ts.to_rfc3339()) as Box<dyn rusqlite::types::ToSql>,
                        Box::new(limit_i64),
                    ],
                ),
                None => (
                    "SELECT id, timestamp, operation, key_name, details
                     FROM audit_log
                     ORDER BY id DESC
                     LIMIT ?1",
                    vec![Box::new(limit_i64) as Box<dyn rusqlite::types::ToSql>],
                ),
            };

            let mut stmt = self
                .conn
                .prepare(sql)
                .map_err(|e| SecretsError::Audit(format!("query prepare: {e}")))?;

            let params_refs: Vec<&dyn rusqlite::types::ToSql> =
                params.iter().map(|p| &**p).collect();

            let rows = stmt
                .query_map(params_refs.as_slice(), |row| {
                    let ts_str: String = row.get(1)?;
                    let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                    Ok(AuditEntry {
                        id: row.get(0)?,
                        timestamp,
                        operation: row.get(2)?,
                        key_name: row.get(3)?,
                        details: row.get(4)?,
                    })
                })
                .map_err(|e| SecretsError::Audit(format!("query exec: {e}")))?;

            let mut entries = Vec::new();
            for row in rows {
                entries.push(row.map_err(|e| SecretsError::Audit(format!("row parse: {e}")))?);
            }

            Ok(entries)
        }

        /// Return the path to the audit database (for testing/display).
        pub fn db_path(dir: &Path) -> PathBuf {
            dir.join("audit.db")
        }
    }
}
