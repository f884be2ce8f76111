use crate::error::GraphError;
use crate::node::{Node, NodeKind};
use ahash::AHashMap;
use log::debug;

mod validate;

pub use validate::{GraphIssue, IssueKind, Severity};

/// Key that marks a node as the scenario entry when no explicit start key is given.
pub const ENTRY_KEY: &str = "start";

/// A read-only snapshot of a scenario's nodes, keyed by node key.
///
/// The store is built once per scenario activation and never mutated afterwards, so a
/// single instance can be shared (e.g. behind an `Arc`) by any number of attempts.
#[derive(Debug, Clone)]
pub struct GraphStore {
    nodes: AHashMap<String, Node>,
    /// Keys in load order, used for the start-node convention and stable iteration.
    order: Vec<String>,
    start_key: String,
}

impl GraphStore {
    /// Loads nodes into a new store, resolving the start key by convention.
    ///
    /// Fails fast on duplicate keys, since a silent overwrite would corrupt traversal.
    pub fn load(nodes: Vec<Node>) -> Result<Self, GraphError> {
        Self::load_with_start(nodes, None)
    }

    /// Loads nodes with an explicit start key. The key is not checked here: an
    /// unresolvable start is reported by `validate` and fails the traversal at start.
    pub fn load_with_start(
        nodes: Vec<Node>,
        start_key: Option<String>,
    ) -> Result<Self, GraphError> {
        if nodes.is_empty() {
            return Err(GraphError::EmptyScenario);
        }

        let mut map = AHashMap::with_capacity(nodes.len());
        let mut order = Vec::with_capacity(nodes.len());
        for node in nodes {
            if map.contains_key(&node.key) {
                return Err(GraphError::DuplicateKey { key: node.key });
            }
            order.push(node.key.clone());
            map.insert(node.key.clone(), node);
        }

        let start_key = match start_key {
            Some(key) => key,
            None => Self::conventional_start(&map, &order),
        };

        debug!(
            "Loaded scenario graph with {} nodes, starting at '{}'",
            order.len(),
            start_key
        );

        Ok(Self {
            nodes: map,
            order,
            start_key,
        })
    }

    /// An `ENTRY_KEY` node wins, then the first narrative node, then the first node.
    fn conventional_start(map: &AHashMap<String, Node>, order: &[String]) -> String {
        order
            .iter()
            .find(|key| key.eq_ignore_ascii_case(ENTRY_KEY))
            .or_else(|| {
                order
                    .iter()
                    .find(|key| map.get(*key).map(Node::kind) == Some(NodeKind::Narrative))
            })
            .unwrap_or(&order[0])
            .clone()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn start_key(&self) -> &str {
        &self.start_key
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates over the nodes in the order they were loaded.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|key| self.nodes.get(key))
    }
}
