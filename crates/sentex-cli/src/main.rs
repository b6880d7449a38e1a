//! sentex: scientific article harvesting and sentence extraction.
//! Entry point for the command-line binary.

mod config;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sentex_core::segmenter::{BoundaryModel, DetectorKind, TrainingConfig};
use sentex_core::{run_batch, BatchJob, BatchResult, PipelineContext, Stage};
use sentex_harvest::{harvest, write_manifest, EuropePmcClient, PmcSource};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "sentex",
    version,
    about = "Harvest open-access articles and turn them into clean sentence files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Config file (defaults to $SENTEX_CONFIG, then ./sentex.toml).
    #[arg(global = true, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Increase logging verbosity (-v, -vv).
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search Europe PMC and print the open-access PMCIDs found.
    Discover(DiscoverArgs),
    /// Discover PMCIDs and download each article page.
    Fetch(FetchArgs),
    /// Article pages → paragraph files.
    Extract(StageArgs),
    /// Paragraph files → sentence files.
    Segment(StageArgs),
    /// Article pages → sentence files in one pass.
    Run(StageArgs),
    /// Write list.json for a directory of sentence files.
    Manifest(ManifestArgs),
    /// Train a boundary model from plain-text files.
    TrainModel(TrainModelArgs),
}

#[derive(Debug, Args)]
struct DiscoverArgs {
    /// Europe PMC query (defaults to [harvest].query).
    #[arg(long)]
    query: Option<String>,
    #[arg(long)]
    page_size: Option<usize>,
}

#[derive(Debug, Args)]
struct FetchArgs {
    #[command(flatten)]
    discover: DiscoverArgs,
    /// Where article pages are written (defaults to [paths].html_dir).
    #[arg(long, value_name = "DIR")]
    html_dir: Option<PathBuf>,
    /// Concurrent downloads.
    #[arg(long)]
    concurrency: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DetectorArg {
    Punkt,
    Rule,
}

impl From<DetectorArg> for DetectorKind {
    fn from(arg: DetectorArg) -> Self {
        match arg {
            DetectorArg::Punkt => DetectorKind::Punkt,
            DetectorArg::Rule  => DetectorKind::Rule,
        }
    }
}

#[derive(Debug, Args)]
struct StageArgs {
    /// Input directory (defaults depend on the stage).
    #[arg(long, value_name = "DIR")]
    input: Option<PathBuf>,
    /// Output directory (defaults depend on the stage).
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,
    /// Concurrent documents (0 = one per core).
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long, value_enum)]
    detector: Option<DetectorArg>,
    /// Boundary model JSON replacing the built-in model.
    #[arg(long, value_name = "FILE")]
    model: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ManifestArgs {
    /// Directory of sentence files (defaults to [paths].sentence_dir).
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,
    /// Manifest path (defaults to <dir>/list.json).
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct TrainModelArgs {
    /// A text file, or a directory whose .txt files form the corpus.
    #[arg(value_name = "CORPUS")]
    corpus: PathBuf,
    /// Where the model JSON is written.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
    /// Union the trained parameters with the built-in model.
    #[arg(long)]
    extend_builtin: bool,
    #[arg(long)]
    abbrev_threshold: Option<f64>,
    #[arg(long)]
    min_starter_count: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "sentex=info,info",
        1 => "sentex=debug,info",
        _ => "sentex=trace,debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let (config, source) = Config::load(cli.config.as_deref())?;
    match source {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    match cli.command {
        Commands::Discover(args) => discover(&config, args).await,
        Commands::Fetch(args) => fetch(&config, args).await,
        Commands::Extract(args) => run_stage(&config, Stage::Extract, args).await,
        Commands::Segment(args) => run_stage(&config, Stage::Segment, args).await,
        Commands::Run(args) => run_stage(&config, Stage::Full, args).await,
        Commands::Manifest(args) => manifest(&config, args),
        Commands::TrainModel(args) => train_model(args),
    }
}

// ── Harvest ───────────────────────────────────────────────────────────────────

fn harvest_config(config: &Config, args: &DiscoverArgs) -> sentex_harvest::HarvestConfig {
    let mut cfg = config.harvest.clone();
    if let Some(ref query) = args.query {
        cfg.query = query.clone();
    }
    if let Some(page_size) = args.page_size {
        cfg.page_size = page_size;
    }
    cfg
}

async fn discover(config: &Config, args: DiscoverArgs) -> anyhow::Result<()> {
    let cfg = harvest_config(config, &args);
    let client = EuropePmcClient::new(&cfg)?;
    let pmcids = client.search_open_access(&cfg.query, cfg.page_size).await?;
    for pmcid in &pmcids {
        println!("{pmcid}");
    }
    info!(query = %cfg.query, count = pmcids.len(), "Discovery complete");
    Ok(())
}

async fn fetch(config: &Config, args: FetchArgs) -> anyhow::Result<()> {
    let mut cfg = harvest_config(config, &args.discover);
    if let Some(concurrency) = args.concurrency {
        cfg.concurrency = concurrency;
    }
    let html_dir = args.html_dir.unwrap_or_else(|| config.paths.html_dir.clone());
    info!("Downloading articles into {}", html_dir.display());

    let source = PmcSource::new(&cfg, &html_dir)?;
    let summary = harvest(&source, &cfg).await?;

    println!(
        "Done. {} discovered, {} saved, {} forbidden, {} failed ({} ms).",
        summary.discovered, summary.saved, summary.forbidden, summary.failed, summary.duration_ms
    );
    Ok(())
}

// ── Text stages ───────────────────────────────────────────────────────────────

fn default_dirs(config: &Config, stage: Stage) -> (PathBuf, PathBuf) {
    let paths = &config.paths;
    match stage {
        Stage::Extract => (paths.html_dir.clone(), paths.paragraph_dir.clone()),
        Stage::Segment => (paths.paragraph_dir.clone(), paths.sentence_dir.clone()),
        Stage::Full    => (paths.html_dir.clone(), paths.sentence_dir.clone()),
    }
}

async fn run_stage(config: &Config, stage: Stage, args: StageArgs) -> anyhow::Result<()> {
    let (default_input, default_output) = default_dirs(config, stage);

    let mut segmentation = config.segmentation.clone();
    if let Some(detector) = args.detector {
        segmentation.detector = detector.into();
    }
    if args.model.is_some() {
        segmentation.model_path = args.model;
    }

    // A model that cannot be loaded aborts before any document is touched.
    let ctx = PipelineContext::new(config.extraction.clone(), &segmentation, config.html.clone())
        .context("segmentation model could not be initialised")?;
    info!(detector = ctx.segmenter.detector_name(), stage = stage.as_str(), "✅ Pipeline ready");

    let job = BatchJob {
        input_dir: args.input.unwrap_or(default_input),
        output_dir: args.output.unwrap_or(default_output),
        stage,
        workers: args.workers.unwrap_or(config.batch.workers),
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl+C received, finishing in-flight documents");
            let _ = shutdown_tx.send(true);
        }
    });

    let result = run_batch(job, ctx, None, shutdown_rx).await?;
    print_summary(&result);
    Ok(())
}

fn print_summary(result: &BatchResult) {
    let unit = match result.stage {
        Stage::Extract => "paragraphs",
        _ => "sentences",
    };
    println!(
        "Done. {} written ({} {unit}), {} without valid paragraphs, {} failed ({} ms){}.",
        result.written,
        result.items_written,
        result.no_content,
        result.failed,
        result.duration_ms,
        if result.cancelled { ", cancelled" } else { "" },
    );
    for error in &result.errors {
        println!("  {error}");
    }
}

// ── Manifest / model ──────────────────────────────────────────────────────────

fn manifest(config: &Config, args: ManifestArgs) -> anyhow::Result<()> {
    let dir = args.dir.unwrap_or_else(|| config.paths.sentence_dir.clone());
    let output = args.output.unwrap_or_else(|| dir.join(&config.paths.manifest_name));
    let names = write_manifest(&dir, &output)?;
    println!("{} entries written to {}", names.len(), output.display());
    Ok(())
}

fn read_corpus(path: &Path) -> anyhow::Result<String> {
    if !path.is_dir() {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading corpus {}", path.display()));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();

    let mut corpus = String::new();
    for file in &files {
        corpus.push_str(&std::fs::read_to_string(file)?);
        corpus.push('\n');
    }
    info!(files = files.len(), "Corpus read from {}", path.display());
    Ok(corpus)
}

fn train_model(args: TrainModelArgs) -> anyhow::Result<()> {
    let corpus = read_corpus(&args.corpus)?;
    if corpus.trim().is_empty() {
        anyhow::bail!("corpus {} is empty", args.corpus.display());
    }

    let mut training = TrainingConfig::default();
    if let Some(threshold) = args.abbrev_threshold {
        training.abbrev_threshold = threshold;
    }
    if let Some(count) = args.min_starter_count {
        training.min_starter_count = count;
    }

    let mut model = BoundaryModel::train(&corpus, &training);
    if args.extend_builtin {
        model.merge(&BoundaryModel::builtin()?);
    }
    model.save(&args.output)?;

    println!(
        "✅ Model saved to {} ({} abbreviation types, {} sentence starters)",
        args.output.display(),
        model.abbrev_types.len(),
        model.sentence_starters.len()
    );
    Ok(())
}
