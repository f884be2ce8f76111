//! Common test utilities for building scenario graphs and fake stores.
use drillpath::prelude::*;
use std::sync::Arc;

/// The reference walk-through graph.
///
/// `n1 (narrative) -> d1 (decision) -> o1 (outcome)`, where choice "a" scores 100 with
/// safety 100 and choice "b" scores 20 with safety 10.
#[allow(dead_code)]
pub fn create_walkthrough_graph() -> Arc<GraphStore> {
    let nodes = vec![
        Node::narrative("n1", "The alarm sounds.", Some("d1")),
        Node::decision(
            "d1",
            "What do you do?",
            vec![
                Choice::new("a", 100.0, "o1").with_kpi("safety", 100.0),
                Choice::new("b", 20.0, "o1").with_kpi("safety", 10.0),
            ],
        ),
        Node::outcome("o1", "Shift over", "The section is clear."),
    ];
    Arc::new(GraphStore::load(nodes).expect("walkthrough graph should load"))
}

/// Two decisions in a row with a narrative between them.
///
/// Choice scores: d1 {a: 80, comm 90 | b: 60, no KPIs}, d2 {x: 60 | y: 59.8}.
#[allow(dead_code)]
pub fn create_two_decision_graph() -> Arc<GraphStore> {
    let nodes = vec![
        Node::narrative("intro", "Pre-shift briefing.", Some("d1")),
        Node::decision(
            "d1",
            "Who do you call?",
            vec![
                Choice::new("a", 80.0, "scene").with_kpi("comm", 90.0),
                Choice::new("b", 60.0, "scene"),
            ],
        ),
        Node::narrative("scene", "The crew gathers.", Some("d2")),
        Node::decision(
            "d2",
            "Where do you muster?",
            vec![
                Choice::new("x", 60.0, "end").with_kpi("procedure", 50.0),
                Choice::new("y", 59.8, "end"),
            ],
        ),
        Node::outcome("end", "Mustered", ""),
    ];
    Arc::new(GraphStore::load(nodes).expect("two-decision graph should load"))
}

/// A decision that can loop back to the opening narrative.
#[allow(dead_code)]
pub fn create_cyclic_graph() -> Arc<GraphStore> {
    let nodes = vec![
        Node::narrative("intro", "Inspect the roof bolts.", Some("check")),
        Node::decision(
            "check",
            "Are the bolts sound?",
            vec![
                Choice::new("recheck", 30.0, "intro"),
                Choice::new("report", 90.0, "done"),
            ],
        ),
        Node::outcome("done", "Inspection logged", ""),
    ];
    Arc::new(GraphStore::load(nodes).expect("cyclic graph should load"))
}

/// A layered graph shaped like the generator's output.
///
/// `start -> decision_0 -> ... -> decision_{depth-1} -> outcome_good | outcome_poor`.
/// Between layers, even-indexed choices pass through `scene_{n}` and odd-indexed ones
/// jump straight to the next decision.
#[allow(dead_code)]
pub fn create_layered_graph(depth: usize, choices: usize) -> Arc<GraphStore> {
    let mut nodes = vec![Node::narrative("start", "Briefing.", Some("decision_0"))];
    for layer in 0..depth {
        let last = layer + 1 == depth;
        let options = (0..choices)
            .map(|i| {
                let target = match (last, i % 2) {
                    (true, 0) => "outcome_good".to_string(),
                    (true, _) => "outcome_poor".to_string(),
                    (false, 0) => format!("scene_{}", layer + 1),
                    (false, _) => format!("decision_{}", layer + 1),
                };
                Choice::new(format!("option_{}", i), (i * 10) as f64, target)
                    .with_kpi("procedure", 50.0)
            })
            .collect();
        nodes.push(Node::decision(format!("decision_{}", layer), "Next?", options));
        if !last {
            let next = format!("decision_{}", layer + 1);
            nodes.push(Node::narrative(format!("scene_{}", layer + 1), "", Some(next.as_str())));
        }
    }
    nodes.push(Node::outcome("outcome_good", "Handled well", ""));
    nodes.push(Node::outcome("outcome_poor", "Needs review", ""));
    Arc::new(GraphStore::load(nodes).expect("layered graph should load"))
}

/// A store whose calls can be made to fail.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub fail_decisions: bool,
    pub fail_completion: bool,
    pub saved: Vec<DecisionLogEntry>,
    pub completions: Vec<AttemptResult>,
    pub decision_calls: usize,
    pub completion_calls: usize,
}

#[allow(dead_code)]
impl FlakyStore {
    pub fn failing() -> Self {
        Self {
            fail_decisions: true,
            fail_completion: true,
            ..Default::default()
        }
    }
}

impl AttemptStore for FlakyStore {
    fn save_decision(
        &mut self,
        _attempt_id: &AttemptId,
        entry: &DecisionLogEntry,
    ) -> std::result::Result<(), PersistenceError> {
        self.decision_calls += 1;
        if self.fail_decisions {
            return Err(PersistenceError::SaveDecision {
                node_key: entry.node_key.clone(),
                message: "connection refused".to_string(),
            });
        }
        self.saved.push(entry.clone());
        Ok(())
    }

    fn complete_attempt(
        &mut self,
        attempt_id: &AttemptId,
        result: &AttemptResult,
    ) -> std::result::Result<(), PersistenceError> {
        self.completion_calls += 1;
        if self.fail_completion {
            return Err(PersistenceError::CompleteAttempt {
                attempt_id: attempt_id.to_string(),
                message: "connection refused".to_string(),
            });
        }
        self.completions.push(result.clone());
        Ok(())
    }
}
