use crate::error::{ArtifactError, GraphError};
use crate::graph::GraphStore;
use crate::node::Node;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// A compiled scenario snapshot that loads without re-parsing authored JSON.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioArtifact {
    pub title: Option<String>,
    pub start_key: String,
    pub nodes: Vec<Node>,
}

impl ScenarioArtifact {
    pub fn from_graph(graph: &GraphStore, title: Option<String>) -> Self {
        Self {
            title,
            start_key: graph.start_key().to_string(),
            nodes: graph.nodes().cloned().collect(),
        }
    }

    pub fn into_graph(self) -> Result<GraphStore, GraphError> {
        GraphStore::load_with_start(self.nodes, Some(self.start_key))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        encode_to_vec(self, standard()).map_err(|e| ArtifactError::Encode(e.to_string()))
    }

    /// Deserializes a snapshot from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        decode_from_slice(bytes, standard())
            .map(|(artifact, _)| artifact)
            .map_err(|e| ArtifactError::Decode(e.to_string()))
    }

    /// Saves the snapshot to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), ArtifactError> {
        let bytes = self.to_bytes()?;
        let io_err = |e: std::io::Error| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        };
        let mut file = fs::File::create(path).map_err(io_err)?;
        file.write_all(&bytes).map_err(io_err)?;
        Ok(())
    }

    pub fn from_file(path: &str) -> Result<Self, ArtifactError> {
        let io_err = |e: std::io::Error| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        };
        let mut file = fs::File::open(path).map_err(io_err)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(io_err)?;
        Self::from_bytes(&bytes)
    }
}
