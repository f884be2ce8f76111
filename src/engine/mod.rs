mod decision_log;
mod replay;
mod traversal;

pub use decision_log::{DecisionLog, DecisionLogEntry};
pub use traversal::{Transition, Traversal, TraversalStatus};
