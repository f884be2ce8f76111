use super::GraphStore;
use crate::node::{NodeKind, NodePayload};
use ahash::AHashSet;
use itertools::Itertools;
use log::warn;
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    MissingStart,
    DanglingEdge { target: String },
    MissingNext,
    NoChoices,
    DuplicateChoiceId { choice_id: String },
    Unreachable,
    NoReachableOutcome,
}

/// An authoring defect found by `GraphStore::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphIssue {
    pub severity: Severity,
    pub node_key: String,
    pub kind: IssueKind,
}

impl fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: node '{}' ", level, self.node_key)?;
        match &self.kind {
            IssueKind::MissingStart => write!(f, "is the start key but does not exist"),
            IssueKind::DanglingEdge { target } => {
                write!(f, "points to '{}', which does not exist", target)
            }
            IssueKind::MissingNext => write!(f, "is a narrative node without a next node"),
            IssueKind::NoChoices => write!(f, "is a decision node without choices"),
            IssueKind::DuplicateChoiceId { choice_id } => {
                write!(f, "has more than one choice with id '{}'", choice_id)
            }
            IssueKind::Unreachable => write!(f, "cannot be reached from the start node"),
            IssueKind::NoReachableOutcome => write!(f, "cannot reach any outcome node"),
        }
    }
}

impl GraphStore {
    /// Lints the graph for authoring defects without failing the load.
    ///
    /// Cycles are legal and never reported. Issues are ordered by node load order and
    /// each one is logged at `warn`.
    pub fn validate(&self) -> Vec<GraphIssue> {
        let issues = self.lint();
        for issue in &issues {
            warn!("Scenario lint {}", issue);
        }
        issues
    }

    /// Whether the lint found nothing at `Severity::Error`. Logs nothing.
    pub fn is_well_formed(&self) -> bool {
        self.lint()
            .iter()
            .all(|issue| issue.severity < Severity::Error)
    }

    fn lint(&self) -> Vec<GraphIssue> {
        let mut issues = Vec::new();

        if !self.contains(self.start_key()) {
            issues.push(GraphIssue {
                severity: Severity::Error,
                node_key: self.start_key().to_string(),
                kind: IssueKind::MissingStart,
            });
        }

        for node in self.nodes() {
            let mut push = |severity, kind| {
                issues.push(GraphIssue {
                    severity,
                    node_key: node.key.clone(),
                    kind,
                })
            };

            match &node.payload {
                NodePayload::Narrative(body) if body.next.is_none() => {
                    push(Severity::Error, IssueKind::MissingNext)
                }
                NodePayload::Decision(body) => {
                    if body.choices.is_empty() {
                        push(Severity::Error, IssueKind::NoChoices);
                    }
                    for choice_id in body.choices.iter().map(|c| c.id.as_str()).duplicates() {
                        push(
                            Severity::Error,
                            IssueKind::DuplicateChoiceId {
                                choice_id: choice_id.to_string(),
                            },
                        );
                    }
                }
                _ => {}
            }

            for target in node.edge_targets().into_iter().unique() {
                if !self.contains(target) {
                    push(
                        Severity::Error,
                        IssueKind::DanglingEdge {
                            target: target.to_string(),
                        },
                    );
                }
            }
        }

        let reachable = self.reachable_from(self.start_key());
        for node in self.nodes() {
            if !reachable.contains(node.key.as_str()) {
                issues.push(GraphIssue {
                    severity: Severity::Warning,
                    node_key: node.key.clone(),
                    kind: IssueKind::Unreachable,
                });
            }
        }

        let outcome_reachable = reachable
            .iter()
            .filter_map(|key| self.get(key))
            .any(|node| node.kind() == NodeKind::Outcome);
        if self.contains(self.start_key()) && !outcome_reachable {
            issues.push(GraphIssue {
                severity: Severity::Error,
                node_key: self.start_key().to_string(),
                kind: IssueKind::NoReachableOutcome,
            });
        }
        issues
    }

    /// Breadth-first walk over existing nodes. Dangling targets are skipped.
    fn reachable_from<'a>(&'a self, start: &'a str) -> AHashSet<&'a str> {
        let mut seen = AHashSet::new();
        let mut queue = VecDeque::new();
        if self.contains(start) {
            seen.insert(start);
            queue.push_back(start);
        }

        while let Some(key) = queue.pop_front() {
            let Some(node) = self.get(key) else { continue };
            for target in node.edge_targets() {
                if self.contains(target) && seen.insert(target) {
                    queue.push_back(target);
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Choice, Node};

    fn kinds(graph: &GraphStore) -> Vec<(String, IssueKind)> {
        graph
            .validate()
            .into_iter()
            .map(|i| (i.node_key, i.kind))
            .collect()
    }

    #[test]
    fn well_formed_graph_has_no_issues() {
        let graph = GraphStore::load(vec![
            Node::narrative("intro", "Shift briefing.", Some("d1")),
            Node::decision("d1", "Gas alarm?", vec![Choice::new("a", 100.0, "end")]),
            Node::outcome("end", "Done", "Evacuated."),
        ])
        .unwrap();
        assert!(graph.validate().is_empty());
        assert!(graph.is_well_formed());
    }

    #[test]
    fn reports_dangling_edges_and_dead_ends() {
        let graph = GraphStore::load(vec![
            Node::narrative("intro", "Shift briefing.", Some("d1")),
            Node::decision(
                "d1",
                "Gas alarm?",
                vec![Choice::new("a", 100.0, "ghost"), Choice::new("a", 0.0, "stuck")],
            ),
            Node::narrative("stuck", "Nothing happens.", None),
        ])
        .unwrap();

        let found = kinds(&graph);
        assert!(found.contains(&(
            "d1".to_string(),
            IssueKind::DanglingEdge {
                target: "ghost".to_string()
            }
        )));
        assert!(found.contains(&(
            "d1".to_string(),
            IssueKind::DuplicateChoiceId {
                choice_id: "a".to_string()
            }
        )));
        assert!(found.contains(&("stuck".to_string(), IssueKind::MissingNext)));
        assert!(found.contains(&("intro".to_string(), IssueKind::NoReachableOutcome)));
        assert!(!graph.is_well_formed());
    }

    #[test]
    fn cycles_are_not_issues_but_unreachable_nodes_warn() {
        let graph = GraphStore::load(vec![
            Node::narrative("intro", "Briefing.", Some("d1")),
            Node::decision(
                "d1",
                "Try again?",
                vec![Choice::new("retry", 10.0, "intro"), Choice::new("go", 90.0, "end")],
            ),
            Node::outcome("end", "Done", ""),
            Node::outcome("orphan", "Never shown", ""),
        ])
        .unwrap();

        let issues = graph.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].node_key, "orphan");
        assert_eq!(issues[0].kind, IssueKind::Unreachable);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(graph.is_well_formed());
    }

    #[test]
    fn well_formed_check_matches_validate() {
        let graph = GraphStore::load(vec![
            Node::narrative("intro", "Briefing.", Some("d1")),
            Node::decision("d1", "Go?", vec![]),
        ])
        .unwrap();
        assert_eq!(graph.lint(), graph.validate());
        assert!(!graph.is_well_formed());
    }

    #[test]
    fn missing_explicit_start_is_reported() {
        let graph = GraphStore::load_with_start(
            vec![Node::outcome("end", "Done", "")],
            Some("nowhere".to_string()),
        )
        .unwrap();
        let found = kinds(&graph);
        assert!(found.contains(&("nowhere".to_string(), IssueKind::MissingStart)));
    }
}
