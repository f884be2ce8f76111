use super::Traversal;
use crate::error::TraversalError;
use crate::graph::GraphStore;
use crate::node::NodeKind;
use log::debug;
use std::sync::Arc;

impl Traversal {
    /// Rebuilds a traversal from an ordered list of previously selected choice ids.
    ///
    /// Narrative nodes are advanced automatically while choices remain; each decision
    /// node consumes the next id. The traversal is left where the last choice led, so
    /// trailing narrative nodes are not skipped. The first error aborts the replay.
    pub fn replay<I, S>(
        graph: Arc<GraphStore>,
        start_key: impl Into<String>,
        choice_ids: I,
    ) -> Result<Self, TraversalError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut traversal = Self::new(graph, start_key);
        if let Some(error) = traversal.error() {
            return Err(error.clone());
        }

        // A narrative-only cycle can never reach the next decision.
        let narrative_limit = traversal.graph().len();
        let mut narrative_steps = 0;
        let mut replayed = 0;

        let mut pending = choice_ids.into_iter().peekable();
        while let Some(next) = pending.peek() {
            if traversal.is_terminal() {
                return Err(TraversalError::AlreadyTerminal {
                    key: traversal.current_key().to_string(),
                });
            }

            if traversal.current_kind() == Some(NodeKind::Narrative) {
                narrative_steps += 1;
                if narrative_steps > narrative_limit {
                    return Err(TraversalError::DeadEnd {
                        key: traversal.current_key().to_string(),
                    });
                }
                traversal.advance()?;
                continue;
            }

            traversal.choose_option(next.as_ref())?;
            pending.next();
            narrative_steps = 0;
            replayed += 1;
        }

        debug!(
            "Replayed {} decisions, now at '{}'",
            replayed,
            traversal.current_key()
        );
        Ok(traversal)
    }
}
