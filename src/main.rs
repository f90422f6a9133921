//! seoreport - SEO workflow result reporting
//!
//! A CLI tool that reads the result document of a multi-step SEO
//! analysis workflow and renders summaries, a prioritized action plan,
//! and Markdown/JSON/CSV reports of the recommendations.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable input, invalid config, write failure, etc.)

mod analysis;
mod cli;
mod config;
mod extract;
mod formatting;
mod models;
mod report;

use analysis::{
    AggregationOutcome, AggregatorOptions, RecommendationAggregator, SummaryAggregator,
    SummaryOptions,
};
use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use rand::rngs::StdRng;
use rand::SeedableRng;
use report::{ReportView, ViewOptions};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config comes first: its verbose setting picks the log level
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(config.log_level(args.quiet));

    debug!("seoreport v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    if let Err(e) = run(&args, &config) {
        error!("Report failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .seoreport.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize filters, the action plan, and report sections.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so a report written to stdout stays clean. `RUST_LOG`
/// overrides the level chosen by `--verbose`/`--quiet` or the config file.
fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Build and emit the report.
fn run(args: &Args, config: &Config) -> Result<()> {
    let input = args
        .input
        .as_deref()
        .context("An input file is required")?;
    let raw = read_result(input)?;

    let aggregator_options = AggregatorOptions {
        dedupe: config.report.dedupe,
    };
    let mut aggregator = RecommendationAggregator::with_options(&raw, aggregator_options);

    // Config filters first, command-line filters on top
    let config_filters = config
        .filters
        .to_update()
        .context("Invalid filter in config file")?;
    aggregator.set_filter(config_filters);
    aggregator.set_filter(args.filter_update()?);

    info!(
        "Aggregated {} recommendations from {} steps ({} listed)",
        aggregator.total_recommendations(),
        aggregator.steps().len(),
        aggregator.filtered_recommendations().len()
    );
    match aggregator.outcome() {
        AggregationOutcome::NoSteps => warn!("No analysis steps found in {}", input.display()),
        AggregationOutcome::AllEntriesSkipped => {
            warn!("Every recommendation entry was skipped")
        }
        _ => {}
    }

    let summary = SummaryAggregator::with_options(
        &raw,
        &aggregator,
        SummaryOptions {
            display_mode: config.summary.display_mode,
        },
    );

    let view_options = ViewOptions {
        max_action_items: config.summary.max_action_items,
        top_categories: Some(config.report.top_categories),
        include_skipped: config.report.include_skipped,
    };
    let mut view = ReportView::build(&aggregator, &summary, view_options);

    if config.report.include_scores {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let scores = report::scoring::placeholder_scores(aggregator.recommendations(), &mut rng);
        view = view.with_scores(scores);
    }

    let output = match args.format {
        OutputFormat::Markdown => report::generate_markdown_report(&view),
        OutputFormat::Json => report::generate_json_report(&view)?,
        OutputFormat::Csv => report::generate_csv_report(&view.recommendations),
    };

    match config.general.output {
        Some(ref path) => {
            report::generator::write_report(&output, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    if !args.quiet {
        print_summary(&view);
    }

    Ok(())
}

/// Read and parse the workflow result document.
fn read_result(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read result file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse result file as JSON: {}", path.display()))
}

/// Print a short summary to stderr.
fn print_summary(view: &ReportView) {
    let counts = &view.priority_counts;
    let count = |p: models::Priority| counts.get(&p).copied().unwrap_or(0);

    eprintln!("\n📊 Report Summary:");
    eprintln!(
        "   Recommendations: {} listed of {}",
        view.recommendations.len(),
        view.total_recommendations
    );
    eprintln!(
        "   - 🔴 High: {} | 🟡 Medium: {} | 🟢 Low: {}",
        count(models::Priority::High),
        count(models::Priority::Medium),
        count(models::Priority::Low)
    );
    eprintln!("   Execution time: {}", view.summary.formatted_execution_time);
    eprintln!("   Data source: {}", view.summary.data_source);
    if !view.skipped.is_empty() {
        eprintln!("   Skipped entries: {}", view.skipped.len());
    }
}

/// Where the configuration came from, logged once logging is up.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    Fallback(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => {
                info!("Loaded default config from {}", DEFAULT_CONFIG_FILE)
            }
            ConfigSource::Builtin => debug!("No config file found, using defaults"),
            ConfigSource::Fallback(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::Builtin)),
        Err(e) => Ok((Config::default(), ConfigSource::Fallback(e))),
    }
}
