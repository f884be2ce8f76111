use crate::error::{GraphError, ScenarioConversionError};
use crate::graph::GraphStore;
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The canonical, typed form of a scenario, ready to be loaded into a `GraphStore`.
/// This is the target structure for any authored format conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioDefinition {
    pub title: Option<String>,
    /// Explicit entry key. When `None` the store falls back to its start convention.
    pub start_key: Option<String>,
    pub nodes: Vec<Node>,
}

impl ScenarioDefinition {
    pub fn into_graph(self) -> Result<GraphStore, GraphError> {
        GraphStore::load_with_start(self.nodes, self.start_key)
    }
}

/// The authored JSON shape of a scenario.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDocument {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_node: Option<String>,
    pub nodes: Vec<NodeRecord>,
}

/// One authored node: `{ nodeKey, nodeType, body }`. The body stays untyped until
/// conversion, where `nodeType` decides which fields it must carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub node_key: String,
    pub node_type: String,
    #[serde(default)]
    pub body: serde_json::Value,
}

impl ScenarioDocument {
    /// Parses a document. A bare array of node records is accepted as well.
    pub fn from_json(json: &str) -> Result<Self, ScenarioConversionError> {
        let json_err = |e: serde_json::Error| ScenarioConversionError::Json(e.to_string());
        let value: serde_json::Value = serde_json::from_str(json).map_err(json_err)?;
        if value.is_array() {
            let nodes = serde_json::from_value(value).map_err(json_err)?;
            return Ok(ScenarioDocument {
                nodes,
                ..Default::default()
            });
        }
        serde_json::from_value(value).map_err(json_err)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioConversionError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScenarioConversionError::ValidationError(format!(
                "Could not read '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }
}
