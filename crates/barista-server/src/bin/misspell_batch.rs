//! Batch review harness for the misspelling prompt.
//!
//! Sends a list of names straight to the text-generation provider (no
//! announcements) and prints the results as a table for human review.
//!
//! Usage: `misspell-batch [NAME ...]`. With no names, a built-in roster is
//! used. Configuration comes from `BARISTA_CONFIG_PATH` (or `config.toml`)
//! plus the usual environment overrides.

use barista_misspell::{AnthropicGenerator, GenerationError, MisspellGenerator};
use barista_server::{config, init_tracing};
use barista_types::{CustomerName, MisspellRequest, MisspellResult, VARIETY_SEED_RANGE};
use futures_util::future::join_all;
use rand::Rng;
use std::process::ExitCode;

/// Requests in flight at once.
const BATCH_SIZE: usize = 5;

const SAMPLE_NAMES: &[&str] = &[
    "Michael", "Jennifer", "Sarah", "Matt", "Nick", "Brad", "Rick", "Chloe", "Megan", "Kevin",
    "Mark", "Geoffrey", "Phoebe", "Yvonne", "Catherine", "Alejandro", "Priya", "Nguyen", "Karen",
    "Grant", "Dean", "Alexander", "Stephanie", "Steve", "Nat", "Al", "Liz", "Siobhan", "Xochitl",
    "Bo",
];

async fn misspell_one(
    generator: &dyn MisspellGenerator,
    raw: &str,
) -> (String, u8, Result<MisspellResult, String>) {
    let name = match CustomerName::parse(raw) {
        Ok(name) => name,
        Err(e) => return (raw.to_string(), 0, Err(e.to_string())),
    };
    let seed = rand::thread_rng().gen_range(0..VARIETY_SEED_RANGE);
    let original = name.to_string();

    let result = match MisspellRequest::new(name, seed) {
        Ok(request) => generator
            .generate(&request)
            .await
            .map_err(|e: GenerationError| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    (original, seed, result)
}

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::var("BARISTA_CONFIG_PATH").unwrap_or_else(|_| "config.toml".into());
    let config = match config::load_config(Some(config_path.as_str())) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.logging);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let names: Vec<String> = if args.is_empty() {
        SAMPLE_NAMES.iter().map(|s| s.to_string()).collect()
    } else {
        args
    };

    let generator = AnthropicGenerator::from_config(&config.llm);
    tracing::info!(count = names.len(), model = %config.llm.model, "running misspelling batch");

    let mut rows = Vec::with_capacity(names.len());
    for batch in names.chunks(BATCH_SIZE) {
        let results = join_all(batch.iter().map(|name| misspell_one(&generator, name))).await;
        rows.extend(results);
    }

    println!(
        "{:<14} {:>4}  {:<18} {:<20} {:<7} STRATEGY",
        "ORIGINAL", "SEED", "MISSPELLED", "PRONUNCIATION", "CHAOS"
    );
    println!("{}", "-".repeat(96));

    let mut failures = 0;
    for (original, seed, result) in &rows {
        match result {
            Ok(r) => println!(
                "{:<14} {:>4}  {:<18} {:<20} {:<7} {}",
                original, seed, r.misspelled, r.pronunciation, r.chaos, r.strategy
            ),
            Err(e) => {
                failures += 1;
                println!("{:<14} {:>4}  ERROR: {}", original, seed, e);
            }
        }
    }

    println!("{}", "-".repeat(96));
    println!("{} names, {} failures", rows.len(), failures);

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
