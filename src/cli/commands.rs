//! CLI command definitions for prism-forge.
//!
//! All external configuration (API key, model, output paths, pacing)
//! enters here as flags or environment variables; nothing is hard-coded
//! into the pipeline.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::dataset::LevelPlan;
use crate::domains::Domain;
use crate::error::LlmError;
use crate::llm::OpenRouterClient;
use crate::merge;
use crate::pipeline::{BatchGenerator, RetryPolicy, RunConfig, RunOrchestrator, ShortfallRetry};
use crate::store;

/// Default model to use for generation.
const DEFAULT_MODEL: &str = "anthropic/claude-opus-4.5";

/// Default output store for generation runs.
const DEFAULT_OUTPUT: &str = "./prism_scenarios.jsonl";

/// PRISM cultural intelligence benchmark dataset forge.
#[derive(Parser)]
#[command(name = "prism-forge")]
#[command(about = "Generate and merge PRISM cultural intelligence benchmark datasets")]
#[command(version)]
#[command(
    long_about = "prism-forge assembles the PRISM cultural intelligence benchmark by generating \
scenario batches per cultural domain, persisting them incrementally to JSONL stores, and merging \
completed runs into one deduplicated corpus.\n\nExample usage:\n  prism-forge generate --per-domain 10 --output ./run1.jsonl\n  prism-forge merge run1.jsonl run2.jsonl --output merged.jsonl --target 120"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Run a full generation pass over the PRISM domain list.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Merge completed record stores into one deduplicated corpus.
    Merge(MergeArgs),

    /// Summarize a record store by domain and level.
    Inspect(InspectArgs),
}

/// Arguments for `prism-forge generate`.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Scenarios to generate per domain.
    #[arg(short = 'n', long, default_value = "10")]
    pub per_domain: usize,

    /// Output store path (JSONL, one record per line).
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// LLM model to use for generation.
    #[arg(short = 'm', long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// OpenRouter API key (can also be set via OPENROUTER_API_KEY env var).
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL for the completion service.
    #[arg(
        long,
        env = "OPENROUTER_API_BASE",
        default_value = "https://openrouter.ai/api/v1"
    )]
    pub api_base: String,

    /// Pacing delay between domains, in seconds.
    #[arg(long, default_value = "30")]
    pub pace_secs: u64,

    /// Backoff before the shortfall retry, in seconds.
    #[arg(long, default_value = "15")]
    pub backoff_secs: u64,

    /// Truncate the output store before generating (destructive).
    /// Without this flag the run appends to any existing store.
    #[arg(long)]
    pub fresh: bool,

    /// Sampling temperature for generation.
    #[arg(long, default_value = "0.8")]
    pub temperature: f64,

    /// Maximum output tokens per generation request.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Level 1 scenarios at the start of each batch.
    #[arg(long, default_value = "4")]
    pub level1_count: usize,

    /// Level 2 scenarios after the Level 1 block; the remainder of the
    /// batch is Level 3.
    #[arg(long, default_value = "3")]
    pub level2_count: usize,
}

/// Arguments for `prism-forge merge`.
#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// Input store paths, in priority order (first occurrence of an id wins).
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output store path for the merged corpus.
    #[arg(short = 'o', long, default_value = "./prism_merged.jsonl")]
    pub output: PathBuf,

    /// Target size for the merged corpus.
    #[arg(short = 't', long, default_value = "120")]
    pub target: usize,
}

/// Arguments for `prism-forge inspect`.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Store path to summarize.
    pub store: PathBuf,
}

/// Parses CLI arguments from the process environment.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Runs the command selected by the parsed CLI arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => run_generate(args).await,
        Commands::Merge(args) => run_merge(args),
        Commands::Inspect(args) => run_inspect(args),
    }
}

async fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    // Missing credentials are the only fatal failure; everything past
    // this point degrades to partial output instead of aborting.
    let api_key = args.api_key.ok_or(LlmError::MissingApiKey)?;

    let plan = LevelPlan {
        level1_count: args.level1_count,
        level2_count: args.level2_count,
    };

    let client = OpenRouterClient::new(args.api_base, api_key, args.model.clone());
    let mut generator =
        BatchGenerator::new(Arc::new(client), args.model, plan).with_temperature(args.temperature);
    if let Some(max_tokens) = args.max_tokens {
        generator = generator.with_max_tokens(max_tokens);
    }

    let retry = ShortfallRetry::new(
        generator,
        RetryPolicy {
            max_attempts: 2,
            backoff: Duration::from_secs(args.backoff_secs),
        },
    );

    let config = RunConfig {
        domains: Domain::all(),
        per_domain_target: args.per_domain,
        output_path: args.output.clone(),
        pacing: Duration::from_secs(args.pace_secs),
        reset_output: args.fresh,
    };
    let expected = config.expected_total();

    let orchestrator = RunOrchestrator::new(retry, config);
    let stats = orchestrator.run().await?;

    println!(
        "Run finished: {} records written across {} domains (expected {}, shortfall domains: {})",
        stats.records_written, stats.domains_processed, expected, stats.shortfalls
    );
    println!("Output store: {}", args.output.display());

    Ok(())
}

fn run_merge(args: MergeArgs) -> anyhow::Result<()> {
    let report = merge::merge(&args.inputs, &args.output, args.target)?;

    println!(
        "Merged {} store(s): {} unique records, {} duplicates dropped, {} corrupt lines skipped, {} missing stores",
        args.inputs.len(),
        report.unique,
        report.duplicates_dropped,
        report.lines_skipped,
        report.stores_missing
    );
    println!(
        "Target {}: {}",
        report.target,
        if report.target_met() { "PASS" } else { "FAIL" }
    );
    println!("Output store: {}", args.output.display());

    Ok(())
}

fn run_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let scan = store::read_records(&args.store)?;

    let mut by_domain: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_level: BTreeMap<String, usize> = BTreeMap::new();
    for record in &scan.records {
        *by_domain.entry(record.domain.clone()).or_insert(0) += 1;
        *by_level.entry(record.level.clone()).or_insert(0) += 1;
    }

    println!("Store: {}", args.store.display());
    println!(
        "Records: {} ({} corrupt lines skipped)",
        scan.records.len(),
        scan.lines_skipped
    );
    println!("By domain:");
    for (domain, count) in &by_domain {
        println!("  {:<28} {}", domain, count);
    }
    println!("By level:");
    for (level, count) in &by_level {
        println!("  {:<28} {}", level, count);
    }

    info!(
        records = scan.records.len(),
        skipped = scan.lines_skipped,
        "Inspection complete"
    );

    Ok(())
}
