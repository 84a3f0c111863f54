//! VibeVideo command line entry point.
//!
//! Thin wrapper over the pipeline crates: `merge` concatenates local media
//! files through the remote store, `cleanup` runs one audio cleanup
//! operation through the remote cleanup service.

use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vibe_cleanup::CleanupClient;
use vibe_merge::MergePipeline;
use vibe_models::CleanupOp;
use vibe_store::StoreClient;

fn init_tracing() {
    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("vibe=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

fn usage() -> String {
    let ops = CleanupOp::ALL
        .iter()
        .map(|op| op.output_slug())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Usage:\n  \
         vibe merge <file> <file> [more files] [-o OUTPUT]\n  \
         vibe cleanup <operation> <file>\n\n\
         Cleanup operations: {ops}"
    )
}

async fn run_merge(args: &[String]) -> anyhow::Result<()> {
    let mut inputs: Vec<PathBuf> = Vec::new();
    let mut output: Option<PathBuf> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "-o" {
            let value = iter
                .next()
                .with_context(|| format!("-o requires a value\n\n{}", usage()))?;
            output = Some(PathBuf::from(value));
        } else {
            inputs.push(PathBuf::from(arg));
        }
    }

    let store = StoreClient::from_env().context("store client configuration")?;
    let pipeline = MergePipeline::new(store);
    let out = pipeline.merge(&inputs, output).await?;

    info!(output = %out.display(), "Merged");
    println!("{}", out.display());
    Ok(())
}

async fn run_cleanup(args: &[String]) -> anyhow::Result<()> {
    let (op, file) = match args {
        [op, file] => (op, file),
        _ => bail!("cleanup takes an operation and one file\n\n{}", usage()),
    };

    let op: CleanupOp = op
        .parse()
        .with_context(|| format!("unknown operation '{op}'\n\n{}", usage()))?;

    let client = CleanupClient::from_env().context("cleanup client configuration")?;
    let out = client.process_file(PathBuf::from(file), op).await?;

    println!("{}", out.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.split_first() {
        Some((command, rest)) if command == "merge" => run_merge(rest).await,
        Some((command, rest)) if command == "cleanup" => run_cleanup(rest).await,
        _ => bail!("{}", usage()),
    }
}
