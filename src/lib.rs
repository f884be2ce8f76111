//! # Drillpath - Branching Scenario Runtime
//!
//! **Drillpath** runs the interactive branching scenarios used in safety training. A
//! scenario is a directed graph of narrative, decision and outcome nodes. The trainee
//! moves through it one step at a time; every decision is scored, and reaching an
//! outcome produces an overall score, per-KPI averages and a pass/fail verdict.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Scenario**: Parse the authored JSON into a `ScenarioDocument`, or
//!     implement `IntoScenario` for your own format.
//! 2.  **Build the Graph**: Convert it into a `ScenarioDefinition` and load it into a
//!     read-only `GraphStore`. Duplicate node keys are rejected here; `validate` lints
//!     for dangling edges and dead ends.
//! 3.  **Play**: Start an `Attempt` with the shared graph and an `AttemptStore`. Call
//!     `advance` at narrative nodes and `choose_option` at decision nodes.
//! 4.  **Assess**: When an outcome node is reached the attempt aggregates its decision
//!     log and reports the `AttemptResult` to the store exactly once.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use drillpath::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let document = ScenarioDocument::from_file("data/gas_alarm.json")?;
//!     let graph = Arc::new(document.into_scenario()?.into_graph()?);
//!
//!     for issue in graph.validate() {
//!         println!("{}", issue);
//!     }
//!
//!     let mut attempt = Attempt::start(AttemptId::new("demo-1"), graph, MemoryStore::new());
//!     while !attempt.is_terminal() {
//!         match attempt.current_node().map(Node::kind) {
//!             Some(NodeKind::Narrative) => {
//!                 attempt.advance()?;
//!             }
//!             Some(NodeKind::Decision) => {
//!                 // Always take the first choice.
//!                 let first = attempt
//!                     .current_node()
//!                     .and_then(Node::as_decision)
//!                     .and_then(|d| d.choices.first())
//!                     .map(|c| c.id.clone())
//!                     .unwrap_or_default();
//!                 attempt.choose_option(&first)?;
//!             }
//!             _ => break,
//!         }
//!     }
//!
//!     if let Some(result) = attempt.result() {
//!         println!("{}", ReportFormatter::format_result(result));
//!     }
//!     Ok(())
//! }
//! ```

pub mod attempt;
pub mod engine;
pub mod error;
pub mod graph;
pub mod node;
pub mod prelude;
pub mod report;
pub mod scenario;
