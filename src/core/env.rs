//! Environment file format.
//!
//! One `NAME="value"` line per secret. Values are always double-quoted and
//! escaped so that sourcing the file with a POSIX shell assigns exactly the
//! escaped text and never expands or executes anything:
//!
//! | char | written as |
//! |------|------------|
//! | `"`  | `\"` |
//! | `\`  | `\\` |
//! | `$`  | `\$` |
//! | `` ` `` | `` \` `` |
//! | newline | `\n` |
//! | carriage return | `\r` |
//! | tab  | `\t` |
//! | other control chars | `\u00XX` |

use std::fmt::{self, Write as _};
use zeroize::Zeroizing;

use crate::core::types::{SecretValue, SecretValues};
use crate::core::validation::short_name;

/// Secrets laid out as environment file entries.
pub struct EnvFile {
    entries: Vec<(String, SecretValue)>,
}

impl EnvFile {
    /// Build entries from retrieved secrets, naming each by its short name.
    pub fn from_secrets(values: &SecretValues) -> Self {
        let entries = values
            .iter()
            .map(|(id, value)| {
                (
                    short_name(id).to_string(),
                    Zeroizing::new(value.to_string()),
                )
            })
            .collect();
        Self { entries }
    }

    /// Variable names, in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to environment file contents.
    pub fn render(&self) -> Zeroizing<String> {
        let mut output = Zeroizing::new(String::new());
        for (name, value) in &self.entries {
            output.push_str(name);
            output.push('=');
            output.push_str(&escape_value(value));
            output.push('\n');
        }
        output
    }
}

impl fmt::Debug for EnvFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvFile")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// Quote and escape a value for a `NAME="value"` line.
pub fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('"');

    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '$' => escaped.push_str("\\$"),
            '`' => escaped.push_str("\\`"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(escaped, "\\u{:04x}", c as u32);
            }
            _ => escaped.push(ch),
        }
    }

    escaped.push('"');
    escaped
}

/// Reverse [`escape_value`] for a quoted value.
///
/// Returns `None` if `raw` is not a double-quoted value.
#[cfg(test)]
pub(crate) fn unescape_value(raw: &str) -> Option<String> {
    let inner = raw.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)?;
                out.push(decoded);
            }
            Some(other @ ('"' | '\\' | '$' | '`')) => out.push(other),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    Some(out)
}

/// Parse environment file contents back into `(name, value)` pairs.
///
/// Skips blank lines and lines that are not `NAME="value"`.
#[cfg(test)]
pub(crate) fn parse(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .filter_map(|line| {
            let (name, raw) = line.split_once('=')?;
            Some((name.to_string(), unescape_value(raw)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain() {
        assert_eq!(escape_value("v1"), "\"v1\"");
        assert_eq!(escape_value(""), "\"\"");
    }

    #[test]
    fn test_escape_quote() {
        assert_eq!(escape_value("value\"3"), r#""value\"3""#);
    }

    #[test]
    fn test_escape_newline_is_two_chars() {
        let escaped = escape_value("line1\nline2");
        assert_eq!(escaped, r#""line1\nline2""#);
        assert!(!escaped.contains('\n'));
    }

    #[test]
    fn test_escape_shell_expansion() {
        assert_eq!(escape_value("$HOME"), r#""\$HOME""#);
        assert_eq!(escape_value("`id`"), r#""\`id\`""#);
        assert_eq!(escape_value(r"C:\path"), r#""C:\\path""#);
    }

    #[test]
    fn test_escape_control_and_unicode() {
        assert_eq!(escape_value("a\u{1}b"), r#""a\u0001b""#);
        assert_eq!(escape_value("tab\there"), r#""tab\there""#);
        assert_eq!(escape_value("héllo ✓"), "\"héllo ✓\"");
    }

    #[test]
    fn test_unescape_reverses_escape() {
        for value in [
            "plain",
            "value\"3",
            "multi\nline\r\n",
            "$VAR and `cmd` and \\",
            "ctl\u{7f}\u{1b}[0m",
            "",
        ] {
            assert_eq!(unescape_value(&escape_value(value)).as_deref(), Some(value));
        }
    }

    #[test]
    fn test_unescape_rejects_unquoted() {
        assert_eq!(unescape_value("bare"), None);
        assert_eq!(unescape_value("\"open"), None);
    }

    #[test]
    fn test_render_uses_short_names() {
        let values: SecretValues = [("path/secret1", "v1"), ("other/path/secret2", "v2")]
            .into_iter()
            .collect();
        let file = EnvFile::from_secrets(&values);

        let rendered = file.render();
        let mut lines: Vec<&str> = rendered.lines().collect();
        lines.sort();
        assert_eq!(lines, vec![r#"secret1="v1""#, r#"secret2="v2""#]);
    }

    #[test]
    fn test_parse_rendered() {
        let values: SecretValues = [("secret3", "value\"3"), ("multi", "a\nb")]
            .into_iter()
            .collect();
        let rendered = EnvFile::from_secrets(&values).render();

        let mut parsed = parse(&rendered);
        parsed.sort();
        assert_eq!(
            parsed,
            vec![
                ("multi".to_string(), "a\nb".to_string()),
                ("secret3".to_string(), "value\"3".to_string()),
            ]
        );
    }

    #[test]
    fn test_debug_hides_values() {
        let values: SecretValues = [("secret1", "hunter2")].into_iter().collect();
        let debug = format!("{:?}", EnvFile::from_secrets(&values));
        assert!(debug.contains("secret1"));
        assert!(!debug.contains("hunter2"));
    }
}
