use clap::Parser;
use nodom::action::CompiledActionTable;
use nodom::prelude::*;
use serde::Deserialize;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// --- Script Format ---
// One JSON object per line, tagged by where the event comes from.

#[derive(Debug, Deserialize)]
#[serde(tag = "source", rename_all = "kebab-case")]
enum ScriptEvent {
    Ui(UiEvent),
    Backend(BackendEvent),
    DataChange(DataChange),
}

/// Prints each stack entry and its children as an indented outline.
#[derive(Default)]
struct OutlineRenderer {
    lines: Vec<String>,
}

impl OutlineRenderer {
    fn outline(&mut self, widget: &Widget, depth: usize) {
        let label = match widget.id() {
            Some(id) => format!("{} #{}", widget.render_kind, id),
            None => widget.render_kind.clone(),
        };
        self.lines.push(format!("{}{}", "  ".repeat(depth), label));
        for child in widget.children.iter().flatten() {
            self.outline(child, depth + 1);
        }
    }
}

impl Renderer for OutlineRenderer {
    fn render(&mut self, widget: &Widget, _frame: &mut Frame<'_>) {
        self.outline(widget, 1);
    }
}

/// Replays host events against a layout document and shows the resulting render stack
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the layout document JSON file
    document_path: String,
    /// Optional path to a JSON-lines event script
    script_path: Option<String>,

    /// Path to an engine config JSON file
    #[arg(short, long)]
    config: Option<String>,

    /// Load the action table from a compiled artifact instead of the document
    #[arg(long)]
    table: Option<String>,

    /// Write the validated action table as a compiled artifact and exit
    #[arg(long)]
    emit_table: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. Loading ---
    let document = LayoutDocument::from_file(&cli.document_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load document '{}': {}",
            &cli.document_path, e
        ))
    });
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load config '{}': {}", path, e))
        }),
        None => EngineConfig::default(),
    };

    // --- 2. Action Table ---
    let table = match &cli.table {
        Some(path) => {
            let compiled = CompiledActionTable::from_file(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to load action table '{}': {}", path, e))
            });
            ActionTable::from_compiled(compiled)
        }
        None => (&document).into_action_table(),
    };
    println!(
        "Action table: {} sequences, {} rejected",
        table.len(),
        table.rejected().len()
    );
    for error in table.rejected() {
        println!("  -> rejected: {}", error);
    }

    if let Some(path) = &cli.emit_table {
        table
            .compile()
            .save(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write artifact: {}", e)));
        println!("Compiled action table written to '{}'", path);
        return;
    }

    // --- 3. Context ---
    let mut context = Context::builder(document, RecordingBackend::new())
        .with_config(config)
        .with_action_table(table)
        .build();
    let mut renderer = OutlineRenderer::default();
    render_and_report(&mut context, &mut renderer, "initial");

    // --- 4. Replay ---
    let Some(script_path) = cli.script_path else {
        println!("\nNo script provided. Total: {:?}", total_start.elapsed());
        return;
    };
    let script = fs::read_to_string(&script_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read script '{}': {}", &script_path, e))
    });

    let mut replayed = 0;
    for (number, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        let event: ScriptEvent = serde_json::from_str(line).unwrap_or_else(|e| {
            exit_with_error(&format!("Invalid event on line {}: {}", number + 1, e))
        });

        let heading = format!("line {}: {:?}", number + 1, event);
        let outcome = match event {
            ScriptEvent::Ui(event) => Some(context.on_ui_event(event)),
            ScriptEvent::Backend(event) => Some(context.on_backend_event(event)),
            ScriptEvent::DataChange(change) => {
                context.on_data_change(change);
                None
            }
        };
        if let Some(outcome) = outcome {
            if outcome.is_unmatched() {
                println!("\n[{}] no action matched", heading);
            }
            for error in &outcome.errors {
                println!("  -> skipped: {}", error);
            }
        }
        render_and_report(&mut context, &mut renderer, &heading);
        replayed += 1;
    }

    // --- 5. Summary ---
    println!("\n--- Replay Summary ---");
    println!("Events replayed:      {}", replayed);
    println!("Sequences in flight:  {}", context.in_flight().len());
    for entry in context.in_flight() {
        println!(
            "  -> {} waits for '{}' on '{}' (step {})",
            entry.sequence.key(),
            entry.expected_event,
            entry.correlation_id,
            entry.next_index
        );
    }
    println!("Backend status:       {}", context.status());
    println!("Total Execution:      {:?}", total_start.elapsed());
}

fn render_and_report(
    context: &mut Context<RecordingBackend>,
    renderer: &mut OutlineRenderer,
    heading: &str,
) {
    renderer.lines.clear();
    let errors = context.render(renderer);

    println!("\n[{}] stack: {}", heading, context.stack().describe());
    for line in &renderer.lines {
        println!("{}", line);
    }
    for error in errors {
        println!("  -> pop failed: {}", error);
    }
    for request in context.backend_mut().take_requests() {
        match &request.sql {
            Some(sql) => println!("  -> submit {} '{}': {}", request.kind, request.query_id, sql),
            None => println!("  -> submit {} '{}'", request.kind, request.query_id),
        }
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
