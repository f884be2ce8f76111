use crate::node::NodeKind;
use thiserror::Error;

/// Text shown to a trainee when the scenario itself is broken.
pub const SCENARIO_HALTED_MESSAGE: &str = "This scenario could not continue.";

/// Errors that can occur while loading nodes into a `GraphStore`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node key '{key}' is defined more than once")]
    DuplicateKey { key: String },

    #[error("Scenario contains no nodes")]
    EmptyScenario,
}

/// Errors produced by the traversal state machine.
///
/// `MissingNode` and `DeadEnd` are configuration errors and leave the traversal in a
/// terminal failed state. The remaining variants reject a single input without
/// changing any state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraversalError {
    #[error("Node '{key}' not found, which is required by '{referenced_from}'")]
    MissingNode {
        key: String,
        referenced_from: String,
    },

    #[error("Node '{key}' has no outgoing edge to follow")]
    DeadEnd { key: String },

    #[error("Choice '{choice_id}' does not exist on decision node '{node_key}'")]
    InvalidChoice { node_key: String, choice_id: String },

    #[error("Cannot advance from node '{key}': it is a {kind} node, not a narrative node")]
    NotAtNarrative { key: String, kind: NodeKind },

    #[error("Cannot choose at node '{key}': it is a {kind} node, not a decision node")]
    NotAtDecision { key: String, kind: NodeKind },

    #[error("The attempt has already ended at node '{key}'")]
    AlreadyTerminal { key: String },
}

impl TraversalError {
    /// Whether this error ended the traversal.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TraversalError::MissingNode { .. } | TraversalError::DeadEnd { .. }
        )
    }

    /// The message a trainee should see. Authoring defects are collapsed into one
    /// generic message; rejected inputs keep their specific description.
    pub fn user_message(&self) -> String {
        if self.is_fatal() {
            SCENARIO_HALTED_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

/// Errors reported by an `AttemptStore`. These never stop a traversal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    #[error("Failed to save decision at node '{node_key}': {message}")]
    SaveDecision { node_key: String, message: String },

    #[error("Failed to complete attempt '{attempt_id}': {message}")]
    CompleteAttempt { attempt_id: String, message: String },
}

/// Errors that can occur when converting an authored format into a `ScenarioDefinition`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScenarioConversionError {
    #[error("Failed to parse scenario JSON: {0}")]
    Json(String),

    #[error("Node '{node_key}' has an unknown node type: '{type_name}'")]
    UnknownNodeType { node_key: String, type_name: String },

    #[error("Node '{node_key}' has an invalid body: {message}")]
    InvalidBody { node_key: String, message: String },

    #[error("Invalid scenario data: {0}")]
    ValidationError(String),
}

/// Errors raised while saving or loading a compiled scenario snapshot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArtifactError {
    #[error("Artifact I/O failed for '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Artifact encoding failed: {0}")]
    Encode(String),

    #[error("Artifact decoding failed: {0}")]
    Decode(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
