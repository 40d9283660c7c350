//! Codec Tests
//!
//! Tests for escaping and unescaping field values.

use sqclient::protocol::{escape, unescape};

// =============================================================================
// Escape Tests
// =============================================================================

#[test]
fn test_escape_each_reserved_character() {
    assert_eq!(escape("\\"), "\\\\");
    assert_eq!(escape("/"), "\\/");
    assert_eq!(escape("|"), "\\p");
    assert_eq!(escape("\n"), "\\n");
    assert_eq!(escape("\r"), "\\r");
    assert_eq!(escape("\t"), "\\t");
    assert_eq!(escape("\u{0B}"), "\\v");
    assert_eq!(escape(" "), "\\s");
}

#[test]
fn test_escape_backslash_not_doubled_twice() {
    assert_eq!(escape("a\\b"), "a\\\\b");
    assert_eq!(escape("a b"), "a\\sb");
    // The backslash inserted for the space must not be escaped again
    assert_eq!(escape("\\ "), "\\\\\\s");
}

#[test]
fn test_escape_mixed_sentence() {
    assert_eq!(
        escape("Hello World | a/b"),
        "Hello\\sWorld\\s\\p\\sa\\/b"
    );
}

#[test]
fn test_escape_empty_and_unicode() {
    assert_eq!(escape(""), "");
    assert_eq!(escape("Grüße 🎧"), "Grüße\\s🎧");
}

// =============================================================================
// Unescape Tests
// =============================================================================

#[test]
fn test_unescape_each_sequence() {
    assert_eq!(unescape("\\\\"), "\\");
    assert_eq!(unescape("\\/"), "/");
    assert_eq!(unescape("\\p"), "|");
    assert_eq!(unescape("\\n"), "\n");
    assert_eq!(unescape("\\r"), "\r");
    assert_eq!(unescape("\\t"), "\t");
    assert_eq!(unescape("\\v"), "\u{0B}");
    assert_eq!(unescape("\\s"), " ");
}

#[test]
fn test_unescape_escaped_backslash_before_letter() {
    // `\\s` is an escaped backslash followed by a plain `s`, not a space
    assert_eq!(unescape("\\\\s"), "\\s");
    assert_eq!(unescape("\\\\p"), "\\p");
}

#[test]
fn test_unescape_server_message() {
    assert_eq!(
        unescape("invalid\\sserverID"),
        "invalid serverID"
    );
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_round_trip_tricky_inputs() {
    let inputs = [
        "",
        "plain",
        "\\",
        "\\\\",
        "\\s",
        "\\p|",
        "a\\b/c|d\ne\rf\tg\u{0B}h i",
        "   ",
        "trailing\\",
        "ends with space ",
        "mixed \\n literal and \n real",
    ];
    for input in inputs {
        assert_eq!(unescape(&escape(input)), input, "round trip of {:?}", input);
    }
}

#[test]
fn test_round_trip_every_ascii_pair() {
    for a in 0u8..128 {
        for b in [b'\\', b's', b'p', b' ', b'/', b'n'] {
            let input: String = [a as char, b as char].iter().collect();
            assert_eq!(unescape(&escape(&input)), input);
        }
    }
}

#[test]
fn test_escaped_value_has_no_structural_characters() {
    let escaped = escape("a b|c\nd");
    assert!(!escaped.contains(' '));
    assert!(!escaped.contains('|'));
    assert!(!escaped.contains('\n'));
}
