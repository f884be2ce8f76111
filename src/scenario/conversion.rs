use super::definition::{NodeRecord, ScenarioDefinition, ScenarioDocument};
use crate::error::ScenarioConversionError;
use crate::node::{
    Choice, DecisionBody, DisplayData, KpiScores, NarrativeBody, Node, NodePayload, OutcomeBody,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// A trait for authored scenario formats that can be converted into a
/// `ScenarioDefinition`.
///
/// This is the extension point for loading scenarios from sources other than the JSON
/// document shipped with this crate, e.g. rows from a content database.
///
/// # Example
///
/// ```rust,no_run
/// use drillpath::prelude::*;
/// use drillpath::error::ScenarioConversionError;
///
/// struct Row { key: String, prose: String, next: Option<String> }
/// struct Script { rows: Vec<Row> }
///
/// impl IntoScenario for Script {
///     fn into_scenario(self) -> std::result::Result<ScenarioDefinition, ScenarioConversionError> {
///         let nodes = self
///             .rows
///             .into_iter()
///             .map(|row| Node::narrative(row.key, row.prose, row.next.as_deref()))
///             .collect();
///         Ok(ScenarioDefinition { title: None, start_key: None, nodes })
///     }
/// }
/// ```
pub trait IntoScenario {
    /// Consumes the object and converts it into a typed scenario.
    fn into_scenario(self) -> Result<ScenarioDefinition, ScenarioConversionError>;
}

// --- Authored body shapes, one per node type ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNarrative {
    text: String,
    atmosphere: Option<serde_json::Value>,
    next: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDecision {
    question: String,
    choices: Vec<RawChoice>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChoice {
    id: String,
    #[serde(default)]
    text: String,
    score: f64,
    #[serde(default)]
    kpi_scores: KpiScores,
    next_node: String,
    feedback: Option<String>,
    outcome: Option<String>,
    icon: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOutcome {
    title: String,
    #[serde(default)]
    summary: String,
    kpi_results: Option<serde_json::Value>,
    lessons: Option<serde_json::Value>,
}

impl IntoScenario for ScenarioDocument {
    fn into_scenario(self) -> Result<ScenarioDefinition, ScenarioConversionError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(convert_node)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ScenarioDefinition {
            title: self.title,
            start_key: self.start_node,
            nodes,
        })
    }
}

fn convert_node(record: NodeRecord) -> Result<Node, ScenarioConversionError> {
    let payload = match record.node_type.to_ascii_uppercase().as_str() {
        "NARRATIVE" => {
            let raw: RawNarrative = parse_body(&record)?;
            NodePayload::Narrative(NarrativeBody {
                text: raw.text,
                atmosphere: raw.atmosphere.map(DisplayData::from),
                next: raw.next,
            })
        }
        "DECISION" => {
            let raw: RawDecision = parse_body(&record)?;
            NodePayload::Decision(DecisionBody {
                question: raw.question,
                choices: raw.choices.into_iter().map(convert_choice).collect(),
            })
        }
        "OUTCOME" => {
            let raw: RawOutcome = parse_body(&record)?;
            NodePayload::Outcome(OutcomeBody {
                title: raw.title,
                summary: raw.summary,
                kpi_results: raw.kpi_results.map(DisplayData::from),
                lessons: raw.lessons.map(DisplayData::from),
            })
        }
        _ => {
            return Err(ScenarioConversionError::UnknownNodeType {
                node_key: record.node_key,
                type_name: record.node_type,
            });
        }
    };

    Ok(Node {
        key: record.node_key,
        payload,
    })
}

fn convert_choice(raw: RawChoice) -> Choice {
    Choice {
        id: raw.id,
        text: raw.text,
        score: raw.score,
        kpi_scores: raw.kpi_scores,
        next_node: raw.next_node,
        feedback: raw.feedback,
        outcome: raw.outcome,
        icon: raw.icon,
    }
}

fn parse_body<T: DeserializeOwned>(record: &NodeRecord) -> Result<T, ScenarioConversionError> {
    T::deserialize(&record.body).map_err(|e| ScenarioConversionError::InvalidBody {
        node_key: record.node_key.clone(),
        message: e.to_string(),
    })
}
