use super::DisplayData;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-KPI contributions of a single choice. KPI names are free-form.
pub type KpiScores = AHashMap<String, f64>;

/// The closed set of node kinds in a scenario graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Narrative,
    Decision,
    Outcome,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Narrative => write!(f, "narrative"),
            NodeKind::Decision => write!(f, "decision"),
            NodeKind::Outcome => write!(f, "outcome"),
        }
    }
}

/// A single step in a scenario graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub key: String,
    pub payload: NodePayload,
}

/// Kind-specific node data. Each kind carries only the fields it requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodePayload {
    Narrative(NarrativeBody),
    Decision(DecisionBody),
    Outcome(OutcomeBody),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NarrativeBody {
    pub text: String,
    pub atmosphere: Option<DisplayData>,
    /// Key of the node shown when the trainee continues. `None` is a dead end.
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DecisionBody {
    pub question: String,
    pub choices: Vec<Choice>,
}

impl DecisionBody {
    pub fn choice(&self, id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == id)
    }
}

/// One selectable option of a decision node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub text: String,
    /// Overall quality of the choice, 0-100 by convention.
    pub score: f64,
    pub kpi_scores: KpiScores,
    pub next_node: String,
    pub feedback: Option<String>,
    pub outcome: Option<String>,
    pub icon: Option<String>,
}

impl Choice {
    pub fn new(id: impl Into<String>, score: f64, next_node: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            score,
            next_node: next_node.into(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_kpi(mut self, name: impl Into<String>, value: f64) -> Self {
        self.kpi_scores.insert(name.into(), value);
        self
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutcomeBody {
    pub title: String,
    pub summary: String,
    pub kpi_results: Option<DisplayData>,
    pub lessons: Option<DisplayData>,
}

impl Node {
    pub fn narrative(key: impl Into<String>, text: impl Into<String>, next: Option<&str>) -> Self {
        Self {
            key: key.into(),
            payload: NodePayload::Narrative(NarrativeBody {
                text: text.into(),
                atmosphere: None,
                next: next.map(str::to_string),
            }),
        }
    }

    pub fn decision(
        key: impl Into<String>,
        question: impl Into<String>,
        choices: Vec<Choice>,
    ) -> Self {
        Self {
            key: key.into(),
            payload: NodePayload::Decision(DecisionBody {
                question: question.into(),
                choices,
            }),
        }
    }

    pub fn outcome(
        key: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            payload: NodePayload::Outcome(OutcomeBody {
                title: title.into(),
                summary: summary.into(),
                kpi_results: None,
                lessons: None,
            }),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match &self.payload {
            NodePayload::Narrative(_) => NodeKind::Narrative,
            NodePayload::Decision(_) => NodeKind::Decision,
            NodePayload::Outcome(_) => NodeKind::Outcome,
        }
    }

    pub fn as_narrative(&self) -> Option<&NarrativeBody> {
        match &self.payload {
            NodePayload::Narrative(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_decision(&self) -> Option<&DecisionBody> {
        match &self.payload {
            NodePayload::Decision(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_outcome(&self) -> Option<&OutcomeBody> {
        match &self.payload {
            NodePayload::Outcome(body) => Some(body),
            _ => None,
        }
    }

    /// Every key this node can transition to, in authoring order.
    pub fn edge_targets(&self) -> Vec<&str> {
        match &self.payload {
            NodePayload::Narrative(body) => body.next.as_deref().into_iter().collect(),
            NodePayload::Decision(body) => {
                body.choices.iter().map(|c| c.next_node.as_str()).collect()
            }
            NodePayload::Outcome(_) => Vec::new(),
        }
    }
}
