use clap::Parser;
use drillpath::prelude::*;
use log::info;
use rand::{Rng, rngs::ThreadRng};
use serde_json::json;
use std::fs;

/// A CLI tool to generate random, well-formed scenarios for soak testing the runtime
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated scenario JSON file to
    #[arg(short, long, default_value = "generated_scenario.json")]
    output: String,

    /// Number of decision layers between the start and the outcomes
    #[arg(long, default_value_t = 4)]
    depth: usize,

    /// The minimum number of choices per decision node
    #[arg(long, default_value_t = 2)]
    min_choices: usize,

    /// The maximum number of choices per decision node
    #[arg(long, default_value_t = 4)]
    max_choices: usize,

    /// Comma-separated KPI names to draw choice contributions from
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "hazard_recognition,communication,procedure,crew_welfare"
    )]
    kpis: Vec<String>,
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.depth == 0 {
        eprintln!("Error: --depth must be at least 1");
        std::process::exit(1);
    }
    if cli.min_choices == 0 || cli.min_choices > cli.max_choices {
        eprintln!(
            "Error: --min-choices ({}) must be at least 1 and not greater than --max-choices ({})",
            cli.min_choices, cli.max_choices
        );
        std::process::exit(1);
    }

    println!(
        "Generating scenario (depth {}, {} to {} choices per decision)...",
        cli.depth, cli.min_choices, cli.max_choices
    );

    let nodes = generate_nodes(&mut rng, &cli);
    let document = json!({
        "title": format!("Generated scenario ({} layers)", cli.depth),
        "startNode": "start",
        "nodes": nodes,
    });
    let json_output = serde_json::to_string_pretty(&document)?;

    // Round-trip through the loader so only loadable, lint-clean scenarios are written.
    let graph = ScenarioDocument::from_json(&json_output)?
        .into_scenario()?
        .into_graph()?;
    if !graph.is_well_formed() {
        return Err("generated scenario failed validation".into());
    }
    info!("Generated {} nodes", graph.len());

    fs::write(&cli.output, json_output)?;
    println!(
        "Successfully generated and saved scenario to '{}'",
        cli.output
    );

    Ok(())
}

/// Builds a layered graph: start -> (narrative -> decision) x depth -> outcomes.
fn generate_nodes(rng: &mut ThreadRng, cli: &Cli) -> Vec<serde_json::Value> {
    let mut nodes = vec![json!({
        "nodeKey": "start",
        "nodeType": "NARRATIVE",
        "body": { "text": "Generated briefing.", "next": "decision_0" }
    })];

    for layer in 0..cli.depth {
        let decision_key = format!("decision_{}", layer);
        let next_key = if layer + 1 == cli.depth {
            None
        } else {
            Some(format!("scene_{}", layer + 1))
        };

        let count = rng.random_range(cli.min_choices..=cli.max_choices);
        let choices: Vec<_> = (0..count)
            .map(|i| generate_choice(rng, cli, i, next_key.as_deref()))
            .collect();
        nodes.push(json!({
            "nodeKey": decision_key,
            "nodeType": "DECISION",
            "body": { "question": format!("Decision {}?", layer + 1), "choices": choices }
        }));

        if let Some(scene_key) = next_key {
            nodes.push(json!({
                "nodeKey": scene_key,
                "nodeType": "NARRATIVE",
                "body": {
                    "text": format!("Scene {}.", layer + 1),
                    "next": format!("decision_{}", layer + 1)
                }
            }));
        }
    }

    for (key, title) in [("outcome_good", "Handled well"), ("outcome_poor", "Needs review")] {
        nodes.push(json!({
            "nodeKey": key,
            "nodeType": "OUTCOME",
            "body": { "title": title, "summary": "Generated outcome." }
        }));
    }
    nodes
}

fn generate_choice(
    rng: &mut ThreadRng,
    cli: &Cli,
    index: usize,
    next_scene: Option<&str>,
) -> serde_json::Value {
    let score = rng.random_range(0..=20) * 5;
    let target = match next_scene {
        Some(scene) => scene.to_string(),
        None if score >= 70 => "outcome_good".to_string(),
        None => "outcome_poor".to_string(),
    };

    let mut kpi_scores = serde_json::Map::new();
    for kpi in &cli.kpis {
        if rng.random_bool(0.5) {
            kpi_scores.insert(kpi.clone(), json!(rng.random_range(0..=100)));
        }
    }

    json!({
        "id": format!("option_{}", index + 1),
        "text": format!("Option {}", index + 1),
        "score": score,
        "kpiScores": kpi_scores,
        "nextNode": target,
    })
}
