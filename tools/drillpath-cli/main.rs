use clap::Parser;
use drillpath::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

/// Play, lint and compile branching safety-training scenarios
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the scenario JSON document (or a compiled snapshot with --snapshot)
    scenario_path: Option<String>,

    /// Treat the input as a compiled bincode snapshot instead of JSON
    #[arg(long)]
    snapshot: bool,

    /// Comma-separated choice ids to play through without prompting
    #[arg(short, long, value_delimiter = ',')]
    choices: Option<Vec<String>>,

    /// Only lint the scenario, do not play it
    #[arg(long)]
    validate: bool,

    /// Write a compiled bincode snapshot of the scenario to this path
    #[arg(long)]
    compile: Option<String>,

    /// Write the recorded persistence calls as JSON to this path
    #[arg(long)]
    dump: Option<String>,

    /// Attempt id reported to the store
    #[arg(long, default_value = "cli-attempt")]
    attempt_id: String,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let scenario_path = match (&cli.scenario_path, cli.human) {
        (Some(path), _) => path.clone(),
        (None, true) => prompt_for_input("Enter scenario path", Some("data/gas_alarm.json")),
        (None, false) => exit_with_error("Scenario path is required in non-interactive mode."),
    };

    let load_start = Instant::now();
    let (title, graph) = load_graph(&scenario_path, cli.snapshot);
    let load_duration = load_start.elapsed();

    println!(
        "Loaded '{}' ({} nodes, start '{}') in {:?}",
        title.as_deref().unwrap_or("untitled scenario"),
        graph.len(),
        graph.start_key(),
        load_duration
    );

    let issues = graph.validate();
    if issues.is_empty() {
        println!("Lint: no issues found.");
    } else {
        println!("Lint: {} issue(s)", issues.len());
        for issue in &issues {
            println!("  - {}", issue);
        }
    }

    if let Some(out_path) = &cli.compile {
        ScenarioArtifact::from_graph(&graph, title.clone())
            .save(out_path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write snapshot: {}", e)));
        println!("Compiled snapshot written to '{}'", out_path);
    }

    if cli.validate {
        if issues.iter().any(|i| i.severity == Severity::Error) {
            std::process::exit(2);
        }
        return;
    }

    let graph = Arc::new(graph);
    let mut attempt = Attempt::start(
        AttemptId::new(cli.attempt_id.clone()),
        Arc::clone(&graph),
        MemoryStore::new(),
    );

    match cli.choices {
        Some(choices) => run_scripted(&mut attempt, &choices, graph.len()),
        None => run_interactive(&mut attempt),
    }

    print_summary(&mut attempt);

    if let Some(dump_path) = &cli.dump {
        let json = attempt
            .store()
            .to_json()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize store: {}", e)));
        fs::write(dump_path, json).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to write '{}': {}", dump_path, e))
        });
        println!("Persistence calls written to '{}'", dump_path);
    }
}

fn load_graph(path: &str, snapshot: bool) -> (Option<String>, GraphStore) {
    if snapshot {
        let artifact = ScenarioArtifact::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load snapshot: {}", e)));
        let title = artifact.title.clone();
        let graph = artifact
            .into_graph()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load graph: {}", e)));
        return (title, graph);
    }

    let document = ScenarioDocument::from_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read scenario: {}", e)));
    let definition = document
        .into_scenario()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert scenario: {}", e)));
    let title = definition.title.clone();
    let graph = definition
        .into_graph()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load graph: {}", e)));
    (title, graph)
}

/// Plays the given choice ids in order, advancing through narrative nodes.
fn run_scripted(attempt: &mut Attempt<MemoryStore>, choices: &[String], node_count: usize) {
    let mut pending = choices.iter();
    let mut narrative_steps = 0;

    while !attempt.is_terminal() {
        let Some(node) = attempt.current_node() else { break };
        match node.kind() {
            NodeKind::Narrative => {
                narrative_steps += 1;
                if narrative_steps > node_count {
                    println!("Stopped: narrative loop without a decision at '{}'", node.key);
                    return;
                }
                if let Some(body) = node.as_narrative() {
                    println!("\n{}", body.text);
                }
                report_step(attempt.advance());
            }
            NodeKind::Decision => {
                narrative_steps = 0;
                let key = node.key.clone();
                let Some(choice_id) = pending.next() else {
                    println!("\nNo more scripted choices; stopped at '{}'", key);
                    return;
                };
                println!("\n[{}] -> {}", key, choice_id);
                report_step(attempt.choose_option(choice_id));
            }
            NodeKind::Outcome => break,
        }
    }
}

/// Runs the attempt with prompts on the terminal.
fn run_interactive(attempt: &mut Attempt<MemoryStore>) {
    println!("--- Drillpath Interactive Mode ---");

    while !attempt.is_terminal() {
        let Some(node) = attempt.current_node().cloned() else { break };
        match &node.payload {
            NodePayload::Narrative(body) => {
                println!("\n{}", body.text);
                prompt_for_input("Press enter to continue", None);
                report_step(attempt.advance());
            }
            NodePayload::Decision(body) => {
                println!("\n{}", body.question);
                for (i, choice) in body.choices.iter().enumerate() {
                    let label = if choice.text.is_empty() { &choice.id } else { &choice.text };
                    println!("  {}: {}", i + 1, label);
                }
                let input = prompt_for_input("Enter choice", Some("1"));
                let choice_id = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| body.choices.get(i))
                    .map(|c| c.id.clone())
                    .unwrap_or(input);

                match attempt.choose_option(&choice_id) {
                    Err(e) if !e.is_fatal() => println!("{}", e.user_message()),
                    step => {
                        if let Some(feedback) =
                            body.choice(&choice_id).and_then(|c| c.feedback.as_deref())
                        {
                            println!("  Feedback: {}", feedback);
                        }
                        report_step(step);
                    }
                }
            }
            NodePayload::Outcome(_) => break,
        }
    }
}

fn report_step(step: Result<Transition, TraversalError>) {
    match step {
        Ok(_) => {}
        Err(e) if e.is_fatal() => eprintln!("\nError: {} ({})", e.user_message(), e),
        Err(e) => eprintln!("\nRejected: {}", e),
    }
}

fn print_summary(attempt: &mut Attempt<MemoryStore>) {
    println!("\n========================================");
    if let Some(outcome) = attempt.outcome() {
        println!("  {}", outcome.title);
        if !outcome.summary.is_empty() {
            println!("  {}", outcome.summary);
        }
        if let Some(lessons) = &outcome.lessons {
            println!("  Lessons: {}", lessons);
        }
    } else if let Some(error) = attempt.traversal().error() {
        println!("  {}", error.user_message());
        println!("  Cause: {}", error);
    } else {
        println!("  Attempt stopped at '{}'", attempt.traversal().current_key());
    }
    println!("========================================");

    if !attempt.decision_log().is_empty() {
        println!("\n--- Decisions ---");
        println!("{}", ReportFormatter::format_log(attempt.decision_log()));
    }

    if let Some(result) = attempt.finalize() {
        println!("\n--- Assessment ---");
        println!("{}", ReportFormatter::format_result(result));
    }

    let failures = attempt.persistence_failures();
    if !failures.is_empty() {
        println!("\n{} persistence call(s) failed", failures.len());
    }
    println!();
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if io::stdout().flush().is_err() {
        exit_with_error("Failed to flush stdout");
    }

    if io::stdin().read_line(&mut line).is_err() {
        exit_with_error("Failed to read line");
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
