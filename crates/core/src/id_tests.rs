// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;
use std::collections::HashMap;

crate::define_id! {
    /// Test ID type for macro verification.
    pub struct TestId("tst-");
}

#[test]
fn define_id_new_has_prefix_and_length() {
    let id = TestId::new();
    assert!(id.as_str().starts_with("tst-"));
    assert_eq!(id.as_str().len(), ID_MAX_LEN);
}

#[test]
fn define_id_new_is_unique() {
    assert_ne!(TestId::new(), TestId::new());
}

#[test]
fn define_id_from_string_round_trips() {
    let id = TestId::from_string("tst-abc123");
    assert_eq!(id.as_str(), "tst-abc123");
    assert_eq!(id.to_string(), "tst-abc123");
}

#[test]
fn define_id_suffix_strips_prefix() {
    let id = TestId::from_string("tst-abc123");
    assert_eq!(id.suffix(), "abc123");
}

#[test]
fn define_id_suffix_without_prefix_returns_whole_string() {
    let id = TestId::from_string("abc123");
    assert_eq!(id.suffix(), "abc123");
}

#[test]
fn define_id_short_truncates_suffix() {
    let id = TestId::from_string("tst-abcdefghijklmnop");
    assert_eq!(id.short(4), "abcd");
}

#[test]
fn define_id_equality_with_str() {
    let id = TestId::from_string("tst-abc");
    assert_eq!(id, *"tst-abc");
    assert_eq!(id, "tst-abc");
}

#[test]
fn define_id_hash_map_lookup_via_borrow() {
    let mut map: HashMap<TestId, i32> = HashMap::new();
    let id = TestId::from_string("tst-k");
    map.insert(id, 42);
    assert_eq!(map.get("tst-k"), Some(&42));
}

#[test]
fn define_id_default_generates_random() {
    assert_ne!(TestId::default(), TestId::default());
}

#[test]
fn define_id_is_empty() {
    assert!(!TestId::new().is_empty());
}

#[test]
fn define_id_deref_to_str() {
    let id = TestId::from_string("tst-xyz");
    let s: &str = &id;
    assert_eq!(s, "tst-xyz");
}

// --- short() free function tests ---

#[test]
fn short_fn_truncates() {
    let s = "abcdefghijklmnop";
    assert_eq!(short(s, 8), "abcdefgh");
    assert_eq!(short(s, 100), s);
    assert_eq!(short("abc", 8), "abc");
}

// --- IdBuf tests ---

#[test]
fn id_buf_round_trips_via_serde_json() {
    let buf = IdBuf::new("tst-abc");
    let json = serde_json::to_string(&buf).unwrap();
    let back: IdBuf = serde_json::from_str(&json).unwrap();
    assert_eq!(buf, back);
}

#[test]
fn id_buf_rejects_oversized_on_deserialize() {
    let json = format!("\"{}\"", "x".repeat(ID_MAX_LEN + 1));
    let result: Result<IdBuf, _> = serde_json::from_str(&json);
    assert!(result.is_err());
}

#[test]
fn id_buf_empty() {
    let buf = IdBuf::empty();
    assert!(buf.is_empty());
    assert_eq!(buf.as_str(), "");
}
