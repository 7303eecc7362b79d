// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;
use crate::store::Store;
use crew_core::ConversationTurnBuilder;

fn store() -> Store {
    let store = Store::open_in_memory().expect("open store");
    let project = crew_core::Project::builder().build();
    store.insert_project(&project).expect("insert project");
    store
}

#[test]
fn insert_and_list_roundtrips_in_order() {
    let store = store();
    let project = store.list_projects().expect("list")[0].clone();
    let first = ConversationTurnBuilder::default().project_id(project.id).content("first").build();
    let second = ConversationTurnBuilder::default().project_id(project.id).content("second").build();
    store.insert_conversation_turn(&first).expect("insert 1");
    store.insert_conversation_turn(&second).expect("insert 2");

    let turns = store.list_conversation_turns(&project.id, crew_core::ConversationPhase::Coding).expect("list");
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].content, "first");
    assert_eq!(turns[1].content, "second");
}

#[test]
fn replace_collapses_history_into_fresh_set() {
    let store = store();
    let project = store.list_projects().expect("list")[0].clone();
    for i in 0..5 {
        let turn = ConversationTurnBuilder::default().project_id(project.id).content(format!("turn {i}")).build();
        store.insert_conversation_turn(&turn).expect("insert");
    }
    let summary = ConversationTurnBuilder::default()
        .project_id(project.id)
        .role(crew_core::ConversationRole::Assistant)
        .content("summary of prior turns")
        .build();
    store.replace_conversation_turns(&project.id, crew_core::ConversationPhase::Coding, &[summary]).expect("replace");

    let turns = store.list_conversation_turns(&project.id, crew_core::ConversationPhase::Coding).expect("list");
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].content, "summary of prior turns");
}

#[test]
fn phases_are_kept_independent() {
    let store = store();
    let project = store.list_projects().expect("list")[0].clone();
    let coding = ConversationTurnBuilder::default().project_id(project.id).phase(crew_core::ConversationPhase::Coding).build();
    let planning = ConversationTurnBuilder::default().project_id(project.id).phase(crew_core::ConversationPhase::Planning).build();
    store.insert_conversation_turn(&coding).expect("insert coding");
    store.insert_conversation_turn(&planning).expect("insert planning");

    assert_eq!(store.list_conversation_turns(&project.id, crew_core::ConversationPhase::Coding).expect("list").len(), 1);
    assert_eq!(store.list_conversation_turns(&project.id, crew_core::ConversationPhase::Planning).expect("list").len(), 1);
}
