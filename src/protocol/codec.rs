//! Protocol codec
//!
//! Escaping of field values.
//!
//! ServerQuery field values cannot contain the characters that structure a
//! line (space separates tokens, `|` separates records, newline ends the
//! line). They are written as backslash escapes instead:
//!
//! | Char          | Escape |
//! |---------------|--------|
//! | `\`           | `\\`   |
//! | `/`           | `\/`   |
//! | `\|`          | `\p`   |
//! | newline       | `\n`   |
//! | carriage ret. | `\r`   |
//! | tab           | `\t`   |
//! | vertical tab  | `\v`   |
//! | space         | `\s`   |

/// Escape a value for the wire.
///
/// Backslash is handled in the same pass as every other character, so the
/// backslashes this function inserts are never escaped a second time.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + value.len() / 4);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '/' => out.push_str("\\/"),
            '|' => out.push_str("\\p"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            ' ' => out.push_str("\\s"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse [`escape`].
///
/// Scans left to right and resolves each escape exactly once, so the
/// character produced by `\\` can never start another escape sequence.
/// Unknown sequences and a trailing lone backslash are kept as-is.
pub fn unescape(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('p') => out.push('|'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\u{0B}'),
            Some('/') => out.push('/'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
