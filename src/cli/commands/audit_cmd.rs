//! `secrets --audit` — display the audit log.
//!
//! Usage:
//!   secrets --audit               # show last 50 entries
//!   secrets --audit --last 20     # show last 20
//!   secrets --audit --since 7d    # entries from last 7 days

use chrono::Utc;
use console::style;

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::{output, resolve_paths, Cli};
use crate::errors::{Result, SecretsError};

/// Execute the `--audit` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let paths = resolve_paths(cli)?;

    let audit = AuditLog::open(&paths.dir)
        .ok_or_else(|| SecretsError::Audit("failed to open audit database".to_string()))?;

    let since_dt = match cli.since.as_deref() {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let entries = audit.query(cli.last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_entries(&entries);

    Ok(())
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let (num_str, unit) = if let Some(s) = input.strip_suffix('d') {
        (s, 'd')
    } else if let Some(s) = input.strip_suffix('h') {
        (s, 'h')
    } else if let Some(s) = input.strip_suffix('m') {
        (s, 'm')
    } else {
        return Err(SecretsError::CommandFailed(format!(
            "invalid duration '{input}' — use format like 7d, 24h, or 30m"
        )));
    };

    let num: i64 = num_str.parse().map_err(|_| {
        SecretsError::CommandFailed(format!(
            "invalid duration '{input}' — number part is not valid"
        ))
    })?;

    let duration = match unit {
        'd' => chrono::Duration::days(num),
        'h' => chrono::Duration::hours(num),
        'm' => chrono::Duration::minutes(num),
        _ => unreachable!(),
    };

    Ok(Utc::now() - duration)
}

/// Print audit entries, most recent first.
fn print_audit_entries(entries: &[AuditEntry]) {
    eprintln!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );

    for entry in entries {
        let time = entry.timestamp.format("%Y-%m-%d %H:%M:%S");
        let op = colorize_operation(&entry.operation);
        let key = entry.key_name.as_deref().unwrap_or("-");
        let details = entry.details.as_deref().unwrap_or("-");
        println!("{time}  {op:<16}  {key:<20}  {details}");
    }
}

/// Colorize operation names for display.
fn colorize_operation(op: &str) -> String {
    match op {
        "keygen" => style(op).green().to_string(),
        "edit" => style(op).blue().to_string(),
        "rekey" => style(op).yellow().to_string(),
        "encrypt" | "export" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_days() {
        let dt = parse_duration("7d").unwrap();
        let diff = Utc::now() - dt;
        // Should be roughly 7 days (within a few seconds).
        assert!((diff.num_days() - 7).abs() <= 1);
    }

    #[test]
    fn parse_duration_hours() {
        let dt = parse_duration("24h").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_hours() - 24).abs() <= 1);
    }

    #[test]
    fn parse_duration_minutes() {
        let dt = parse_duration("30m").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_minutes() - 30).abs() <= 1);
    }

    #[test]
    fn parse_duration_invalid() {
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("7x").is_err());
        assert!(parse_duration("d").is_err());
    }

    #[test]
    fn colorize_operation_returns_string() {
        assert!(!colorize_operation("keygen").is_empty());
        assert!(!colorize_operation("edit").is_empty());
        assert!(!colorize_operation("unknown").is_empty());
    }

    #[test]
    fn audit_query_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("encrypt", None, Some("3 entries"));
        audit.log("rekey", None, None);

        let entries = audit.query(10, None).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn audit_with_since_filter() {
        let dir = tempfile::TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("edit", None, None);

        let since = parse_duration("1h").unwrap();
        let entries = audit.query(10, Some(since)).unwrap();
        assert_eq!(entries.len(), 1);
    }
}
