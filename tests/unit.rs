//! Unit tests for core drillpath functionality.
mod common;
use drillpath::prelude::*;

#[test]
fn test_node_kind_display() {
    assert_eq!(format!("{}", NodeKind::Narrative), "narrative");
    assert_eq!(format!("{}", NodeKind::Decision), "decision");
    assert_eq!(format!("{}", NodeKind::Outcome), "outcome");
}

#[test]
fn test_edge_targets_follow_authoring_order() {
    let decision = Node::decision(
        "d1",
        "?",
        vec![Choice::new("a", 0.0, "x"), Choice::new("b", 0.0, "y")],
    );
    assert_eq!(decision.edge_targets(), vec!["x", "y"]);
    assert!(Node::narrative("n", "", None).edge_targets().is_empty());
    assert!(Node::outcome("o", "", "").edge_targets().is_empty());
}

#[test]
fn test_start_key_conventions() {
    let by_entry_key = GraphStore::load(vec![
        Node::narrative("intro", "", Some("START")),
        Node::narrative("START", "", Some("end")),
        Node::outcome("end", "", ""),
    ])
    .unwrap();
    assert_eq!(by_entry_key.start_key(), "START");

    let by_first_narrative = GraphStore::load(vec![
        Node::outcome("end", "", ""),
        Node::narrative("intro", "", Some("end")),
    ])
    .unwrap();
    assert_eq!(by_first_narrative.start_key(), "intro");

    let by_first_node = GraphStore::load(vec![
        Node::decision("d1", "?", vec![Choice::new("a", 1.0, "end")]),
        Node::outcome("end", "", ""),
    ])
    .unwrap();
    assert_eq!(by_first_node.start_key(), "d1");

    let explicit = GraphStore::load_with_start(
        vec![Node::narrative("a", "", Some("b")), Node::outcome("b", "", "")],
        Some("b".to_string()),
    )
    .unwrap();
    assert_eq!(explicit.start_key(), "b");
}

#[test]
fn test_empty_scenario_is_rejected() {
    assert_eq!(GraphStore::load(vec![]).unwrap_err(), GraphError::EmptyScenario);
}

#[test]
fn test_store_lookup_of_unknown_key_is_absent() {
    let graph = GraphStore::load(vec![Node::outcome("end", "", "")]).unwrap();
    assert!(graph.get("missing").is_none());
    assert!(!graph.contains("missing"));
    assert_eq!(graph.nodes().count(), 1);
}

#[test]
fn test_error_display() {
    let err = TraversalError::MissingNode {
        key: "node_B".to_string(),
        referenced_from: "node_A".to_string(),
    };
    assert!(err.to_string().contains("node_B"));
    assert!(err.to_string().contains("node_A"));
    assert!(err.is_fatal());

    let rejected = TraversalError::NotAtNarrative {
        key: "d1".to_string(),
        kind: NodeKind::Decision,
    };
    assert!(!rejected.is_fatal());
    assert!(rejected.user_message().contains("decision node"));

    let dup = GraphError::DuplicateKey {
        key: "intro".to_string(),
    };
    assert!(dup.to_string().contains("'intro'"));

    let persist = PersistenceError::CompleteAttempt {
        attempt_id: "a-1".to_string(),
        message: "timeout".to_string(),
    };
    assert!(persist.to_string().contains("a-1"));
    assert!(persist.to_string().contains("timeout"));
}

#[test]
fn test_display_data_prints_strings_bare() {
    let text = DisplayData::from(serde_json::json!("dusty"));
    assert_eq!(text.to_string(), "dusty");
    let list = DisplayData::from(serde_json::json!(["a", "b"]));
    assert_eq!(list.to_string(), r#"["a","b"]"#);
}

#[test]
fn test_memory_store_serializes_calls() {
    let mut store = MemoryStore::new();
    let id = AttemptId::new("a-1");
    let entry = DecisionLogEntry {
        node_key: "d1".to_string(),
        choice_id: "a".to_string(),
        score: 90.0,
        kpi_scores: KpiScores::default(),
    };
    store.save_decision(&id, &entry).unwrap();

    let json = store.to_json().unwrap();
    assert!(json.contains("\"choice_id\": \"a\""));
    assert!(json.contains("\"a-1\""));
}
