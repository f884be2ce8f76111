use super::{DecisionLog, DecisionLogEntry};
use crate::error::TraversalError;
use crate::graph::GraphStore;
use crate::node::{Node, NodeKind, NodePayload, OutcomeBody};
use log::debug;
use std::sync::Arc;

/// Label used as the referrer when the start key itself does not resolve.
const START_REFERRER: &str = "<start>";

/// Where a traversal stands.
#[derive(Debug, Clone, PartialEq)]
pub enum TraversalStatus {
    /// Positioned at a narrative or decision node, waiting for caller input.
    InProgress,
    /// Positioned at an outcome node.
    Completed,
    /// Halted by a configuration error.
    Failed(TraversalError),
}

/// A successful move from one node to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: String,
    pub to: String,
    /// The kind of the node that is now current.
    pub kind: NodeKind,
}

/// The scenario state machine for a single attempt.
///
/// `Traversal` is pure: it resolves edges and appends to its decision log, but never
/// talks to persistence. Every step is driven by the caller through `advance` or
/// `choose_option`, so a traversal can never run away on its own, even over cyclic
/// graphs.
#[derive(Debug, Clone)]
pub struct Traversal {
    graph: Arc<GraphStore>,
    current_key: String,
    log: DecisionLog,
    status: TraversalStatus,
}

impl Traversal {
    /// Starts a traversal at the graph's conventional start key.
    pub fn start(graph: Arc<GraphStore>) -> Self {
        let start_key = graph.start_key().to_string();
        Self::new(graph, start_key)
    }

    /// Starts a traversal at `start_key`. An unknown start key fails the traversal
    /// immediately with `MissingNode`.
    pub fn new(graph: Arc<GraphStore>, start_key: impl Into<String>) -> Self {
        let mut traversal = Self {
            graph,
            current_key: start_key.into(),
            log: DecisionLog::new(),
            status: TraversalStatus::InProgress,
        };

        if traversal.graph.contains(&traversal.current_key) {
            // A failure here is already captured in `status`.
            let _ = traversal.enter();
        } else {
            let error = TraversalError::MissingNode {
                key: traversal.current_key.clone(),
                referenced_from: START_REFERRER.to_string(),
            };
            traversal.fail(error);
        }
        traversal
    }

    /// Follows the `next` edge of the current narrative node.
    pub fn advance(&mut self) -> Result<Transition, TraversalError> {
        self.ensure_active()?;
        let graph = Arc::clone(&self.graph);
        let node = self.node_in(&graph)?;

        match &node.payload {
            NodePayload::Narrative(body) => self.move_to(body.next.as_deref()),
            _ => Err(TraversalError::NotAtNarrative {
                key: node.key.clone(),
                kind: node.kind(),
            }),
        }
    }

    /// Selects a choice at the current decision node, logs it and follows its edge.
    ///
    /// An unknown `choice_id` is rejected without any state change. Once the choice is
    /// accepted it stays in the decision log even if its edge turns out to be broken.
    pub fn choose_option(&mut self, choice_id: &str) -> Result<Transition, TraversalError> {
        self.choose_option_with(choice_id, |_| {})
    }

    /// Like `choose_option`, but hands the accepted choice's log entry to `on_logged`
    /// before the choice's edge is resolved. `on_logged` is not called for a rejected
    /// choice.
    pub fn choose_option_with<F>(
        &mut self,
        choice_id: &str,
        on_logged: F,
    ) -> Result<Transition, TraversalError>
    where
        F: FnOnce(&DecisionLogEntry),
    {
        self.ensure_active()?;
        let graph = Arc::clone(&self.graph);
        let node = self.node_in(&graph)?;

        let NodePayload::Decision(body) = &node.payload else {
            return Err(TraversalError::NotAtDecision {
                key: node.key.clone(),
                kind: node.kind(),
            });
        };

        let choice = body
            .choice(choice_id)
            .ok_or_else(|| TraversalError::InvalidChoice {
                node_key: node.key.clone(),
                choice_id: choice_id.to_string(),
            })?;

        debug!(
            "Choice '{}' at '{}' (score {})",
            choice.id, node.key, choice.score
        );
        let entry = DecisionLogEntry::from_choice(&node.key, choice);
        on_logged(&entry);
        self.log.push(entry);
        self.move_to(Some(&choice.next_node))
    }

    pub fn current_key(&self) -> &str {
        &self.current_key
    }

    /// The node the traversal is positioned at. `None` only when the traversal failed
    /// on a key that does not exist.
    pub fn current_node(&self) -> Option<&Node> {
        self.graph.get(&self.current_key)
    }

    pub fn current_kind(&self) -> Option<NodeKind> {
        self.current_node().map(Node::kind)
    }

    /// The outcome payload, present only once the traversal has completed.
    pub fn outcome(&self) -> Option<&OutcomeBody> {
        match self.status {
            TraversalStatus::Completed => self.current_node().and_then(Node::as_outcome),
            _ => None,
        }
    }

    pub fn status(&self) -> &TraversalStatus {
        &self.status
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.status, TraversalStatus::InProgress)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, TraversalStatus::Completed)
    }

    /// The configuration error that halted the traversal, if any.
    pub fn error(&self) -> Option<&TraversalError> {
        match &self.status {
            TraversalStatus::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn decision_log(&self) -> &DecisionLog {
        &self.log
    }

    pub fn graph(&self) -> &Arc<GraphStore> {
        &self.graph
    }

    pub fn into_decision_log(self) -> DecisionLog {
        self.log
    }

    fn ensure_active(&self) -> Result<(), TraversalError> {
        if self.is_terminal() {
            return Err(TraversalError::AlreadyTerminal {
                key: self.current_key.clone(),
            });
        }
        Ok(())
    }

    /// Looks up the current node in a graph handle that is not borrowed from `self`.
    fn node_in<'g>(&mut self, graph: &'g GraphStore) -> Result<&'g Node, TraversalError> {
        match graph.get(&self.current_key) {
            Some(node) => Ok(node),
            None => {
                let error = TraversalError::MissingNode {
                    key: self.current_key.clone(),
                    referenced_from: START_REFERRER.to_string(),
                };
                Err(self.fail(error))
            }
        }
    }

    /// Resolves an edge target and re-evaluates the kind of the new node.
    fn move_to(&mut self, target: Option<&str>) -> Result<Transition, TraversalError> {
        let Some(target) = target else {
            let error = TraversalError::DeadEnd {
                key: self.current_key.clone(),
            };
            return Err(self.fail(error));
        };

        if !self.graph.contains(target) {
            let error = TraversalError::MissingNode {
                key: target.to_string(),
                referenced_from: self.current_key.clone(),
            };
            return Err(self.fail(error));
        }

        let from = std::mem::replace(&mut self.current_key, target.to_string());
        let kind = self.enter()?;
        debug!("Transition '{}' -> '{}' ({})", from, target, kind);

        Ok(Transition {
            from,
            to: target.to_string(),
            kind,
        })
    }

    /// Sets the status for the node that just became current.
    fn enter(&mut self) -> Result<NodeKind, TraversalError> {
        let graph = Arc::clone(&self.graph);
        let node = self.node_in(&graph)?;

        match &node.payload {
            NodePayload::Outcome(_) => {
                self.status = TraversalStatus::Completed;
            }
            NodePayload::Decision(body) if body.choices.is_empty() => {
                let error = TraversalError::DeadEnd {
                    key: node.key.clone(),
                };
                return Err(self.fail(error));
            }
            _ => {
                self.status = TraversalStatus::InProgress;
            }
        }
        Ok(node.kind())
    }

    fn fail(&mut self, error: TraversalError) -> TraversalError {
        debug!("Traversal halted at '{}': {}", self.current_key, error);
        self.status = TraversalStatus::Failed(error.clone());
        error
    }
}
