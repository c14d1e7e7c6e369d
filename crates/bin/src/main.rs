use std::fs;
use std::io::Read;

use clap::Parser;
use cyclemerge::{Value, merge_slice};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("cyclemerge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let mut candidates: Vec<Value> = Vec::with_capacity(cli.files.len());
    if cli.files.is_empty() {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        let json: serde_json::Value = serde_json::from_str(&input)?;
        candidates.push(Value::from_json(&json));
    } else {
        for path in &cli.files {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            let json: serde_json::Value = serde_json::from_str(&text)
                .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
            candidates.push(Value::from_json(&json));
        }
    }
    tracing::info!(documents = candidates.len(), "merging");

    let merged = merge_slice(&candidates);
    // JSON inputs are acyclic, so export cannot fail on a cycle
    let json = merged.to_json()?;

    if cli.pretty {
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{json}");
    }

    Ok(())
}
