//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the drillpath
//! crate. Import this module to get access to the core functionality without having to
//! import each type individually.

// Scenario loading
pub use crate::scenario::{
    IntoScenario, NodeRecord, ScenarioArtifact, ScenarioDefinition, ScenarioDocument,
};

// Node model and graph
pub use crate::graph::{GraphIssue, GraphStore, IssueKind, Severity};
pub use crate::node::{
    Choice, DecisionBody, DisplayData, KpiScores, NarrativeBody, Node, NodeKind, NodePayload,
    OutcomeBody,
};

// Traversal and attempts
pub use crate::attempt::{
    Attempt, AttemptId, AttemptResult, AttemptStore, MemoryStore, NullStore, OutcomeAggregator,
    PASS_THRESHOLD,
};
pub use crate::engine::{DecisionLog, DecisionLogEntry, Transition, Traversal, TraversalStatus};

// Error types
pub use crate::error::{
    ArtifactError, GraphError, PersistenceError, ScenarioConversionError, TraversalError,
};

// Report formatting
pub use crate::report::ReportFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
