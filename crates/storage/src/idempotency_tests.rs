// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;
use serde_json::json;

#[test]
fn insert_then_get_round_trips() {
    let store = Store::open_in_memory().unwrap();
    let key = IdempotencyKey::derive("run_tests", &json!({"path": "."}));
    let record = IdempotencyRecord {
        task_id: "tsk-abc".into(),
        idempotency_key: key.clone(),
        response_json: json!({"status": "ok"}),
        created_at: chrono::Utc::now(),
    };
    store.insert_idempotency_record(&record).unwrap();

    let fetched = store.get_idempotency_record("tsk-abc", &key).unwrap().unwrap();
    assert_eq!(fetched.response_json, json!({"status": "ok"}));
}

#[test]
fn replaying_the_same_key_keeps_the_original_response() {
    let store = Store::open_in_memory().unwrap();
    let key = IdempotencyKey::derive("run_tests", &json!({}));
    let first = IdempotencyRecord {
        task_id: "tsk-abc".into(),
        idempotency_key: key.clone(),
        response_json: json!({"status": "ok", "attempt": 1}),
        created_at: chrono::Utc::now(),
    };
    let retry = IdempotencyRecord {
        response_json: json!({"status": "ok", "attempt": 2}),
        ..first.clone()
    };
    store.insert_idempotency_record(&first).unwrap();
    store.insert_idempotency_record(&retry).unwrap();

    let fetched = store.get_idempotency_record("tsk-abc", &key).unwrap().unwrap();
    assert_eq!(fetched.response_json, json!({"status": "ok", "attempt": 1}));
}

#[test]
fn get_idempotency_record_is_none_for_unseen_key() {
    let store = Store::open_in_memory().unwrap();
    let key = IdempotencyKey::derive("run_tests", &json!({}));
    assert!(store.get_idempotency_record("tsk-missing", &key).unwrap().is_none());
}
