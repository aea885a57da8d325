//! Plant vital-sign console.
//!
//! Reads commands from stdin and answers on stdout; logs go to stderr.
//!
//! ```bash
//! echo '#hello ada' | cargo run -p garden
//! RUST_LOG=debug cargo run -p garden -- --policy combined
//! ```

mod console;

use garden_core::{GardenService, MoodPolicy, ServiceConfig};
use tokio::io::{stdin, stdout, BufReader};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let mut config = ServiceConfig::from_env()?;
    if let Some(policy) = parse_policy_arg(&args)? {
        config = config.with_mood_policy(policy);
    }

    info!(policy = config.mood_policy.name(), "Starting garden console");
    let service = GardenService::new(config);

    console::run_console(&service, BufReader::new(stdin()), stdout()).await?;

    info!(plants = service.plants().len(), "Console closed");
    Ok(())
}

/// Read `--policy <name>` from the command line, if given.
fn parse_policy_arg(args: &[String]) -> Result<Option<MoodPolicy>, String> {
    let Some(at) = args.iter().position(|a| a == "--policy") else {
        return Ok(None);
    };
    let name = args
        .get(at + 1)
        .ok_or_else(|| "--policy needs a value".to_string())?;
    MoodPolicy::parse(name)
        .map(Some)
        .ok_or_else(|| format!("Unknown mood policy: {name}"))
}

fn print_help() {
    println!("garden - plant vital-sign console");
    println!();
    println!("Usage: garden [--policy last-write-wins|combined]");
    println!();
    println!("Environment:");
    println!("  GARDEN_MOOD_POLICY  Mood policy (default last-write-wins)");
    println!("  RUST_LOG            Log filter (default info)");
    println!();
    println!("Type #help once running for the command list.");
}
