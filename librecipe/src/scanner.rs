//! Phase 1: Scanner
//!
//! The scanner splits bracket-path source into assignments. Each line is
//! matched against one anchored pattern:
//!
//! ```text
//! key[sub][]  =  "double quoted" | 'single quoted' | bare rest of line
//! ```
//!
//! A key is a lazy run of characters other than `= ; [ ]`, or balanced,
//! non-nested `[...]` groups. Blank lines, `;` and `#` comment lines, and any
//! line that does not have this shape (e.g. `[section]` headers) are skipped.

use once_cell::sync::Lazy;
use regex::Regex;

static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*((?:[^=;\[\]]|\[[^\[\]]*\])+?)\s*=\s*(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)'|(.*?))\s*$"#,
    )
    .expect("assignment pattern is valid")
});

/// The raw, still-escaped value of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue<'a> {
    /// Contents between double quotes.
    DoubleQuoted(&'a str),
    /// Contents between single quotes.
    SingleQuoted(&'a str),
    /// Unquoted remainder of the line, trimmed.
    Bare(&'a str),
}

/// A single `key = value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<'a> {
    /// Key expression, e.g. `projects[views][version]`.
    pub key: &'a str,
    pub value: RawValue<'a>,
    /// Zero-based line number for diagnostics.
    pub line: usize,
}

/// Scan source text into assignments, in file order.
pub fn scan(source: &str) -> Vec<Assignment<'_>> {
    let mut assignments = Vec::new();

    for (line_num, line) in source.lines().enumerate() {
        let rest = line.trim_start();
        if rest.is_empty() || is_comment(rest) {
            continue;
        }

        match scan_line(line) {
            Some((key, value)) => assignments.push(Assignment {
                key,
                value,
                line: line_num,
            }),
            None => {
                tracing::trace!(line = line_num + 1, text = line, "skipping non-assignment line");
            }
        }
    }

    assignments
}

/// Whether a line (already stripped of leading space) is a comment.
fn is_comment(rest: &str) -> bool {
    rest.starts_with(';') || rest.starts_with('#')
}

/// Match one line against the assignment pattern.
fn scan_line(line: &str) -> Option<(&str, RawValue<'_>)> {
    let caps = ASSIGNMENT.captures(line)?;
    let key = caps.get(1)?.as_str();

    let value = if let Some(m) = caps.get(2) {
        RawValue::DoubleQuoted(m.as_str())
    } else if let Some(m) = caps.get(3) {
        RawValue::SingleQuoted(m.as_str())
    } else {
        RawValue::Bare(caps.get(4).map_or("", |m| m.as_str()))
    };

    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(source: &str) -> Assignment<'_> {
        let mut result = scan(source);
        assert_eq!(result.len(), 1, "expected exactly one assignment");
        result.remove(0)
    }

    #[test]
    fn test_scan_bare() {
        let a = first("core = 7.x  ");
        assert_eq!(a.key, "core");
        assert_eq!(a.value, RawValue::Bare("7.x"));
    }

    #[test]
    fn test_scan_quoted_keeps_delimiters() {
        let a = first(r#"k = "a; b=c""#);
        assert_eq!(a.value, RawValue::DoubleQuoted("a; b=c"));
    }

    #[test]
    fn test_scan_escaped_quote_stays_raw() {
        let a = first(r#"k = "a\"b""#);
        assert_eq!(a.value, RawValue::DoubleQuoted(r#"a\"b"#));
    }

    #[test]
    fn test_scan_single_quoted() {
        let a = first(r"k = 'it\'s'");
        assert_eq!(a.value, RawValue::SingleQuoted(r"it\'s"));
    }

    #[test]
    fn test_scan_bracket_key() {
        let a = first("projects[views][download][url] = http://example.com/x?a=b");
        assert_eq!(a.key, "projects[views][download][url]");
        assert_eq!(a.value, RawValue::Bare("http://example.com/x?a=b"));
    }

    #[test]
    fn test_scan_key_trims_space_before_equals() {
        let a = first("  api   =   2");
        assert_eq!(a.key, "api");
        assert_eq!(a.value, RawValue::Bare("2"));
    }

    #[test]
    fn test_scan_empty_value() {
        let a = first("libraries[foo] =");
        assert_eq!(a.value, RawValue::Bare(""));
    }

    #[test]
    fn test_scan_text_after_quotes_falls_back_to_bare() {
        let a = first(r#"k = "a" b"#);
        assert_eq!(a.value, RawValue::Bare(r#""a" b"#));
    }

    #[test]
    fn test_scan_skips_comments_and_sections() {
        let source = "; comment\n# also = comment\n[section]\n\nprojects[] = drupal\n";
        let result = scan(source);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].key, "projects[]");
        assert_eq!(result[0].line, 4);
    }

    #[test]
    fn test_scan_rejects_nested_brackets() {
        assert!(scan("a[b[c]] = x").is_empty());
    }

    #[test]
    fn test_scan_crlf() {
        let result = scan("a = 1\r\nb = \"2\"\r\n");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].value, RawValue::Bare("1"));
        assert_eq!(result[1].value, RawValue::DoubleQuoted("2"));
    }
}
