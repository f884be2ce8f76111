//! Attempt orchestration: a `Traversal` wired to a persistence collaborator.

mod aggregator;
mod recorder;
mod store;

pub use aggregator::{AttemptResult, OutcomeAggregator, PASS_THRESHOLD};
pub use recorder::DecisionRecorder;
pub use store::{AttemptId, AttemptStore, MemoryStore, NullStore, StoredCompletion, StoredDecision};

use crate::engine::{DecisionLog, Transition, Traversal, TraversalStatus};
use crate::error::{PersistenceError, TraversalError};
use crate::graph::GraphStore;
use crate::node::{Node, OutcomeBody};
use log::info;
use std::sync::Arc;

/// One user's play-through of a scenario.
///
/// Wraps the pure `Traversal` and performs the side effects around it: every accepted
/// choice is forwarded to the store, and reaching an outcome aggregates the decision
/// log and reports the result exactly once.
pub struct Attempt<S: AttemptStore> {
    traversal: Traversal,
    recorder: DecisionRecorder<S>,
    result: Option<AttemptResult>,
    reported: bool,
}

impl<S: AttemptStore> Attempt<S> {
    /// Starts an attempt at the graph's conventional start key.
    pub fn start(attempt_id: AttemptId, graph: Arc<GraphStore>, store: S) -> Self {
        Self::from_traversal(attempt_id, Traversal::start(graph), store)
    }

    pub fn start_at(
        attempt_id: AttemptId,
        graph: Arc<GraphStore>,
        start_key: impl Into<String>,
        store: S,
    ) -> Self {
        Self::from_traversal(attempt_id, Traversal::new(graph, start_key), store)
    }

    /// Resumes an attempt from previously persisted choice ids. The replayed
    /// decisions are not sent to the store again.
    pub fn resume<I, T>(
        attempt_id: AttemptId,
        graph: Arc<GraphStore>,
        choice_ids: I,
        store: S,
    ) -> Result<Self, TraversalError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let start_key = graph.start_key().to_string();
        let traversal = Traversal::replay(graph, start_key, choice_ids)?;
        // A replay that already reached an outcome was reported by the earlier session.
        let reported = traversal.is_completed();
        Ok(Self::build(attempt_id, traversal, store, reported))
    }

    fn from_traversal(attempt_id: AttemptId, traversal: Traversal, store: S) -> Self {
        Self::build(attempt_id, traversal, store, false)
    }

    fn build(attempt_id: AttemptId, traversal: Traversal, store: S, reported: bool) -> Self {
        info!(
            "Attempt {} at '{}' with {} prior decisions",
            attempt_id,
            traversal.current_key(),
            traversal.decision_log().len()
        );
        let mut attempt = Self {
            traversal,
            recorder: DecisionRecorder::new(attempt_id, store),
            result: None,
            reported,
        };
        attempt.finalize();
        attempt
    }

    /// Continues past the current narrative node.
    pub fn advance(&mut self) -> Result<Transition, TraversalError> {
        let transition = self.traversal.advance();
        self.finalize();
        transition
    }

    /// Selects a choice at the current decision node.
    ///
    /// An accepted choice is forwarded to the store before its edge is followed. A
    /// store failure is kept in `persistence_failures` and does not affect the
    /// returned transition.
    pub fn choose_option(&mut self, choice_id: &str) -> Result<Transition, TraversalError> {
        let recorder = &mut self.recorder;
        let transition = self.traversal.choose_option_with(choice_id, |entry| {
            // Failures are kept by the recorder.
            let _ = recorder.record(entry);
        });
        self.finalize();
        transition
    }

    /// Aggregates and reports the result once the traversal has reached an outcome.
    ///
    /// Idempotent: the result is computed once and `complete_attempt` is called at
    /// most once, whether or not that call succeeded. A resumed attempt that was
    /// already complete is not reported again. Returns `None` while the attempt
    /// is in progress or after it failed.
    pub fn finalize(&mut self) -> Option<&AttemptResult> {
        if !self.traversal.is_completed() {
            return None;
        }

        let result = self.result.get_or_insert_with(|| {
            let result = OutcomeAggregator::finalize(self.traversal.decision_log());
            info!(
                "Attempt {} completed at '{}': score {:.1}, passed {}",
                self.recorder.attempt_id(),
                self.traversal.current_key(),
                result.overall_score,
                result.passed
            );
            result
        });

        if !self.reported {
            self.reported = true;
            // Failures are kept by the recorder.
            let _ = self.recorder.complete(result);
        }
        self.result.as_ref()
    }

    /// Sends the result to the store again, for callers that saw `complete_attempt`
    /// fail or resumed an attempt whose completion was never stored. Returns `None`
    /// until the attempt has reached an outcome.
    pub fn resend_completion(&mut self) -> Option<Result<(), PersistenceError>> {
        let result = self.result.as_ref()?;
        Some(self.recorder.complete(result))
    }

    pub fn attempt_id(&self) -> &AttemptId {
        self.recorder.attempt_id()
    }

    pub fn traversal(&self) -> &Traversal {
        &self.traversal
    }

    pub fn current_node(&self) -> Option<&Node> {
        self.traversal.current_node()
    }

    pub fn outcome(&self) -> Option<&OutcomeBody> {
        self.traversal.outcome()
    }

    pub fn status(&self) -> &TraversalStatus {
        self.traversal.status()
    }

    pub fn is_terminal(&self) -> bool {
        self.traversal.is_terminal()
    }

    pub fn decision_log(&self) -> &DecisionLog {
        self.traversal.decision_log()
    }

    pub fn result(&self) -> Option<&AttemptResult> {
        self.result.as_ref()
    }

    pub fn persistence_failures(&self) -> &[PersistenceError] {
        self.recorder.failures()
    }

    pub fn store(&self) -> &S {
        self.recorder.store()
    }

    pub fn into_store(self) -> S {
        self.recorder.into_store()
    }
}
