//! Record Parser Tests
//!
//! These tests verify:
//! - Collapsing of zero/one/many records
//! - Integer coercion rules
//! - Unescaping of keys and values
//! - Deterministic handling of malformed tokens

use sqclient::protocol::{parse_response, Record, Response, Value};

// =============================================================================
// Shape Tests
// =============================================================================

#[test]
fn test_empty_line_is_empty_response() {
    assert_eq!(parse_response(""), Response::Empty);
    assert!(parse_response("").is_empty());
    assert_eq!(parse_response("").len(), 0);
}

#[test]
fn test_single_record_not_wrapped() {
    let response = parse_response("a=1");
    let expected: Record = [("a", Value::Int(1))].into_iter().collect();
    assert_eq!(response, Response::Single(expected));
}

#[test]
fn test_two_records_are_a_list() {
    match parse_response("a=1|b=2") {
        Response::Many(records) => {
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].get_int("a"), Some(1));
            assert_eq!(records[1].get_int("b"), Some(2));
        }
        other => panic!("Expected two records, got {:?}", other),
    }
}

#[test]
fn test_records_accessor_covers_all_shapes() {
    assert!(parse_response("").records().is_empty());
    assert_eq!(parse_response("a=1").records().len(), 1);
    assert_eq!(parse_response("a=1|a=2|a=3").records().len(), 3);
    assert_eq!(parse_response("a=1|a=2").into_records().len(), 2);
    assert_eq!(parse_response("a=7|a=8").first().and_then(|r| r.get_int("a")), Some(7));
}

#[test]
fn test_client_list_line() {
    let line = "clid=1 cid=1 client_database_id=1 client_nickname=serveradmin\\sfrom\\s127.0.0.1 client_type=1|clid=5 cid=2 client_database_id=9 client_nickname=Bob client_type=0";
    let response = parse_response(line);
    let records = response.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get_str("client_nickname"), Some("serveradmin from 127.0.0.1"));
    assert_eq!(records[0].get_int("client_type"), Some(1));
    assert_eq!(records[1].get_int("clid"), Some(5));
    assert_eq!(records[1].get_str("client_nickname"), Some("Bob"));
}

// =============================================================================
// Coercion Tests
// =============================================================================

#[test]
fn test_integer_coercion() {
    let record = parse_response("a=42 b=042 c=foo d= e=-7 f=+5 g=99999999999999999999")
        .into_records()
        .remove(0);

    assert_eq!(record.get("a"), Some(&Value::Int(42)));
    assert_eq!(record.get("b"), Some(&Value::Str("042".to_string())));
    assert_eq!(record.get("c"), Some(&Value::Str("foo".to_string())));
    assert_eq!(record.get("d"), Some(&Value::Str(String::new())));
    assert_eq!(record.get("e"), Some(&Value::Int(-7)));
    assert_eq!(record.get("f"), Some(&Value::Str("+5".to_string())));
    // Out of range stays a string
    assert_eq!(record.get_str("g"), Some("99999999999999999999"));
}

#[test]
fn test_coercion_happens_after_unescape() {
    let record = parse_response("name=4\\s2").into_records().remove(0);
    assert_eq!(record.get_str("name"), Some("4 2"));
}

// =============================================================================
// Key/Value Tests
// =============================================================================

#[test]
fn test_value_split_on_first_equals_only() {
    let record = parse_response("expr=a=b=c").into_records().remove(0);
    assert_eq!(record.get_str("expr"), Some("a=b=c"));
}

#[test]
fn test_escaped_pipe_stays_in_value() {
    let response = parse_response("msg=a\\pb");
    assert_eq!(response.len(), 1);
    assert_eq!(response.first().and_then(|r| r.get_str("msg")), Some("a|b"));
}

#[test]
fn test_keys_are_unescaped() {
    let record = parse_response("odd\\skey=1").into_records().remove(0);
    assert_eq!(record.get_int("odd key"), Some(1));
}

#[test]
fn test_duplicate_key_overwrites_in_place() {
    let record = parse_response("a=1 b=2 a=3").into_records().remove(0);
    assert_eq!(record.len(), 2);
    assert_eq!(record.get_int("a"), Some(3));
    assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn test_bare_token_is_key_with_empty_value() {
    let record = parse_response("cid=1 -away").into_records().remove(0);
    assert_eq!(record.get_int("cid"), Some(1));
    assert_eq!(record.get_str("-away"), Some(""));
}

#[test]
fn test_blank_segments_and_tokens_skipped() {
    assert_eq!(parse_response("a=1|").len(), 1);
    assert_eq!(parse_response("|a=1||b=2|").len(), 2);
    assert_eq!(parse_response("   ").len(), 0);
}

// =============================================================================
// Serialization Tests
// =============================================================================

#[test]
fn test_json_mirrors_collapsed_shape() {
    assert_eq!(serde_json::to_string(&parse_response("")).unwrap(), "null");
    assert_eq!(
        serde_json::to_string(&parse_response("b=x a=1")).unwrap(),
        r#"{"b":"x","a":1}"#
    );
    assert_eq!(
        serde_json::to_string(&parse_response("a=1|a=2")).unwrap(),
        r#"[{"a":1},{"a":2}]"#
    );
}
