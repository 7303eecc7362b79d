// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;

#[test]
fn new_idea_has_no_storage_id_until_persisted() {
    let idea = Idea::new(ProjectId::new(), "build me a todo app", Utc::now());
    assert!(idea.id.is_none());
    assert_eq!(idea.message_text, "build me a todo app");
}

#[test]
fn builder_omits_id_from_json_when_unset() {
    let idea = Idea::builder().build();
    let json = serde_json::to_value(&idea).unwrap();
    assert!(json.get("id").is_none());
}

#[test]
fn builder_includes_id_once_set() {
    let idea = Idea::builder().id(7_i64).build();
    let json = serde_json::to_value(&idea).unwrap();
    assert_eq!(json["id"], 7);
}
