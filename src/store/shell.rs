//! Shell-safe formatting for `secrets -s` output.
//!
//! Values are wrapped in single quotes, which neutralize every shell
//! metacharacter except the single quote itself; embedded quotes are
//! rendered as `'\''`. The resulting `export KEY='…'` lines can be
//! passed to `eval` without a value ever being interpreted.

/// Quote a value for POSIX shell evaluation.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// Render one shell-evaluable export statement.
pub fn export_line(key: &str, value: &str) -> String {
    format!("export {key}={}", quote(value))
}
