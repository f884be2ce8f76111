use super::{AttemptId, AttemptResult, AttemptStore};
use crate::engine::DecisionLogEntry;
use crate::error::PersistenceError;
use log::{debug, warn};

/// Forwards decisions and the final result of one attempt to its `AttemptStore`.
///
/// Calls are best-effort: a failed call is logged, kept in `failures`, and returned to
/// the caller, but nothing is retried.
pub struct DecisionRecorder<S: AttemptStore> {
    attempt_id: AttemptId,
    store: S,
    failures: Vec<PersistenceError>,
}

impl<S: AttemptStore> DecisionRecorder<S> {
    pub fn new(attempt_id: AttemptId, store: S) -> Self {
        Self {
            attempt_id,
            store,
            failures: Vec::new(),
        }
    }

    pub fn record(&mut self, entry: &DecisionLogEntry) -> Result<(), PersistenceError> {
        let outcome = self.store.save_decision(&self.attempt_id, entry);
        match &outcome {
            Ok(()) => debug!(
                "Saved decision '{}' at '{}' for attempt {}",
                entry.choice_id, entry.node_key, self.attempt_id
            ),
            Err(e) => {
                warn!("Attempt {}: {}", self.attempt_id, e);
                self.failures.push(e.clone());
            }
        }
        outcome
    }

    pub fn complete(&mut self, result: &AttemptResult) -> Result<(), PersistenceError> {
        let outcome = self.store.complete_attempt(&self.attempt_id, result);
        if let Err(e) = &outcome {
            warn!("Attempt {}: {}", self.attempt_id, e);
            self.failures.push(e.clone());
        }
        outcome
    }

    pub fn attempt_id(&self) -> &AttemptId {
        &self.attempt_id
    }

    pub fn failures(&self) -> &[PersistenceError] {
        &self.failures
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
