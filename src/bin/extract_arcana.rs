//! Extract Arcana Descriptions
//!
//! Parses the arcana description text and writes the front-end data script.
//! Run with: cargo run --bin extract_arcana -- --input arakan.txt --output src/arcana_data.js

use anyhow::Context;
use clap::Parser;
use destiny_matrix::config::{DEFAULT_INPUT, DEFAULT_OUTPUT, DEFAULT_VARIABLE_NAME};
use destiny_matrix::{run_extraction, ExtractorConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "extract_arcana", about = "Convert arcana descriptions into a front-end data script")]
struct Args {
    /// Source text with `=== N АРКАН ===` blocks
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Generated script path (overwritten)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// JS variable the mapping is assigned to
    #[arg(long = "var-name", default_value = DEFAULT_VARIABLE_NAME)]
    variable_name: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "destiny_matrix=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = ExtractorConfig {
        input: args.input,
        output: args.output,
        variable_name: args.variable_name,
    };

    let summary = run_extraction(&config)
        .with_context(|| format!("extraction from {} failed", config.input.display()))?;

    println!("{}", summary.report());
    Ok(())
}
