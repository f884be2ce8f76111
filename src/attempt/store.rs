use super::AttemptResult;
use crate::engine::DecisionLogEntry;
use crate::error::PersistenceError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub String);

impl AttemptId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AttemptId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The persistence collaborator an attempt reports to.
///
/// Failures are reported back to the attempt but never stop the traversal; the
/// attempt's in-memory decision log stays authoritative for aggregation.
pub trait AttemptStore {
    fn save_decision(
        &mut self,
        attempt_id: &AttemptId,
        entry: &DecisionLogEntry,
    ) -> Result<(), PersistenceError>;

    fn complete_attempt(
        &mut self,
        attempt_id: &AttemptId,
        result: &AttemptResult,
    ) -> Result<(), PersistenceError>;
}

impl<S: AttemptStore + ?Sized> AttemptStore for &mut S {
    fn save_decision(
        &mut self,
        attempt_id: &AttemptId,
        entry: &DecisionLogEntry,
    ) -> Result<(), PersistenceError> {
        (**self).save_decision(attempt_id, entry)
    }

    fn complete_attempt(
        &mut self,
        attempt_id: &AttemptId,
        result: &AttemptResult,
    ) -> Result<(), PersistenceError> {
        (**self).complete_attempt(attempt_id, result)
    }
}

impl<S: AttemptStore + ?Sized> AttemptStore for Box<S> {
    fn save_decision(
        &mut self,
        attempt_id: &AttemptId,
        entry: &DecisionLogEntry,
    ) -> Result<(), PersistenceError> {
        (**self).save_decision(attempt_id, entry)
    }

    fn complete_attempt(
        &mut self,
        attempt_id: &AttemptId,
        result: &AttemptResult,
    ) -> Result<(), PersistenceError> {
        (**self).complete_attempt(attempt_id, result)
    }
}

/// A store that accepts and discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl AttemptStore for NullStore {
    fn save_decision(
        &mut self,
        _: &AttemptId,
        _: &DecisionLogEntry,
    ) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn complete_attempt(
        &mut self,
        _: &AttemptId,
        _: &AttemptResult,
    ) -> Result<(), PersistenceError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDecision {
    pub attempt_id: AttemptId,
    pub entry: DecisionLogEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCompletion {
    pub attempt_id: AttemptId,
    pub result: AttemptResult,
}

/// Keeps every call in memory, in call order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    pub decisions: Vec<StoredDecision>,
    pub completions: Vec<StoredCompletion>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decisions_for<'a>(
        &'a self,
        attempt_id: &'a AttemptId,
    ) -> impl Iterator<Item = &'a DecisionLogEntry> {
        self.decisions
            .iter()
            .filter(move |d| &d.attempt_id == attempt_id)
            .map(|d| &d.entry)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl AttemptStore for MemoryStore {
    fn save_decision(
        &mut self,
        attempt_id: &AttemptId,
        entry: &DecisionLogEntry,
    ) -> Result<(), PersistenceError> {
        self.decisions.push(StoredDecision {
            attempt_id: attempt_id.clone(),
            entry: entry.clone(),
        });
        Ok(())
    }

    fn complete_attempt(
        &mut self,
        attempt_id: &AttemptId,
        result: &AttemptResult,
    ) -> Result<(), PersistenceError> {
        self.completions.push(StoredCompletion {
            attempt_id: attempt_id.clone(),
            result: result.clone(),
        });
        Ok(())
    }
}
