use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kwscope::batch::{BatchAnalyzer, BatchRequest, DifficultyJob, TrendJob};
use kwscope::clustering::ClusteringEngine;
use kwscope::config::Config;
use kwscope::difficulty::analyze_difficulty;
use kwscope::metrics;
use kwscope::models::KeywordRecord;
use kwscope::serp::{analyze_serp_data, SerpAnalysisData};
use kwscope::trend::TrendAnalyzer;
use kwscope::utils;

#[derive(Parser)]
#[command(
    name = "kwscope",
    version,
    about = "Keyword research analytics: difficulty, clustering, trends and SERP analysis",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (pretty, json); overrides the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Print Prometheus metrics to stderr on exit
    #[arg(long, global = true)]
    metrics: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score keyword difficulty
    Difficulty {
        /// JSON file with keyword, search_volume, competitors and serp
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Cluster a keyword list
    Cluster {
        /// JSON array of keyword records
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Analyze a search volume history
    Trend {
        /// JSON file with keyword and series
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Analyze a results page
    Serp {
        /// JSON SERP snapshot
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Run a mixed batch of analyses concurrently
    Batch {
        /// JSON batch request
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    // Initialize tracing/logging
    setup_tracing(&config.logging.format, &config.logging.level, cli.verbose)?;

    if cli.metrics {
        if let Err(e) = metrics::init_metrics() {
            tracing::warn!(error = %e, "Metrics initialization failed");
        }
    }

    match cli.command {
        Commands::Difficulty { input } => {
            tracing::info!(input = %input.display(), "Starting difficulty command");
            let job: DifficultyJob = read_json(&input).await?;
            let result = metrics::observe(metrics::DIFFICULTY, || {
                analyze_difficulty(
                    &job.keyword,
                    job.search_volume,
                    &job.competitors,
                    &job.serp,
                    &job.location,
                )
            })?;
            print_json(&result)?;
        }

        Commands::Cluster { input } => {
            tracing::info!(input = %input.display(), "Starting cluster command");
            let keywords: Vec<KeywordRecord> = read_json(&input).await?;
            let engine = ClusteringEngine::new(config.clustering.clone())?;
            let result = metrics::observe(metrics::CLUSTERING, || engine.cluster(&keywords))?;
            metrics::record_clustering_sizes(keywords.len(), result.clusters.len());
            print_json(&result)?;
        }

        Commands::Trend { input } => {
            tracing::info!(input = %input.display(), "Starting trend command");
            let job: TrendJob = read_json(&input).await?;
            let analyzer = TrendAnalyzer::new(config.trend.clone())?;
            let result =
                metrics::observe(metrics::TREND, || analyzer.analyze(&job.keyword, &job.series))?;
            print_json(&result)?;
        }

        Commands::Serp { input } => {
            tracing::info!(input = %input.display(), "Starting serp command");
            let data: SerpAnalysisData = read_json(&input).await?;
            let result = metrics::observe(metrics::SERP, || analyze_serp_data(&data))?;
            print_json(&result)?;
        }

        Commands::Batch { input } => {
            tracing::info!(
                input = %input.display(),
                max_concurrency = config.batch.max_concurrency,
                "Starting batch command"
            );
            let request: BatchRequest = read_json(&input).await?;
            let batch = BatchAnalyzer::new(config.batch.clone())?;
            let report = batch
                .run(request, config.trend.clone(), config.clustering.clone())
                .await;
            print_json(&report)?;
        }
    }

    if cli.metrics {
        match metrics::gather_text() {
            Ok(text) => eprintln!("{text}"),
            Err(e) => tracing::warn!(error = %e, "Failed to encode metrics"),
        }
    }

    tracing::info!("kwscope completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("kwscope=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("kwscope={level},warn"))
            .context("Invalid log level")?
    };

    // Logs go to stderr so stdout stays valid JSON
    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    utils::read_json(path)
        .await
        .with_context(|| format!("Failed to load input file: {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{json}");
    Ok(())
}
