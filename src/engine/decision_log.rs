use crate::node::{Choice, KpiScores};
use serde::{Deserialize, Serialize};

/// A choice made during an attempt, copied from the `Choice` at selection time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionLogEntry {
    pub node_key: String,
    pub choice_id: String,
    pub score: f64,
    pub kpi_scores: KpiScores,
}

impl DecisionLogEntry {
    pub fn from_choice(node_key: &str, choice: &Choice) -> Self {
        Self {
            node_key: node_key.to_string(),
            choice_id: choice.id.clone(),
            score: choice.score,
            kpi_scores: choice.kpi_scores.clone(),
        }
    }
}

/// Append-only record of the choices made during one attempt, in the order they
/// were made.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionLog {
    entries: Vec<DecisionLogEntry>,
}

impl DecisionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: DecisionLogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[DecisionLogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecisionLogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&DecisionLogEntry> {
        self.entries.last()
    }

    /// The selected choice ids in order, the input `Traversal::replay` expects.
    pub fn choice_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.choice_id.as_str()).collect()
    }
}

impl FromIterator<DecisionLogEntry> for DecisionLog {
    fn from_iter<I: IntoIterator<Item = DecisionLogEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
