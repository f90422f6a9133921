//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::analysis::DisplayMode;
use crate::models::{FilterUpdate, ParsePriorityError};
use clap::Parser;
use std::path::PathBuf;

/// seoreport - turn SEO workflow results into readable reports
///
/// Reads the JSON result document of a multi-step SEO analysis workflow,
/// aggregates the recommendations of every step and renders an executive
/// summary, a prioritized action plan and the full recommendation list.
///
/// Examples:
///   seoreport result.json
///   seoreport result.json --output report.md --priority high
///   seoreport result.json --format csv --category "technical seo"
///   seoreport result.json --format json --scores --seed 42
///   seoreport --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Workflow result document (JSON)
    #[arg(value_name = "FILE", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Writes to stdout when neither this nor the config file sets one.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json, csv)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Only list recommendations of this priority (high, medium, low, all)
    #[arg(long, value_name = "LEVEL")]
    pub priority: Option<String>,

    /// Only list recommendations of this category, or "all"
    #[arg(long, value_name = "NAME")]
    pub category: Option<String>,

    /// Only list recommendations of this difficulty, or "all"
    #[arg(long, value_name = "NAME")]
    pub difficulty: Option<String>,

    /// Number of items in the prioritized action plan
    #[arg(long, value_name = "COUNT")]
    pub max_actions: Option<usize>,

    /// Categories shown individually in the category breakdown
    #[arg(long, value_name = "COUNT")]
    pub top_categories: Option<usize>,

    /// Drop recommendations repeated across steps
    #[arg(long)]
    pub dedupe: bool,

    /// Include placeholder scores in the report
    #[arg(long)]
    pub scores: bool,

    /// Seed for placeholder scores
    ///
    /// The same seed always produces the same scores.
    #[arg(long, value_name = "SEED", requires = "scores")]
    pub seed: Option<u64>,

    /// Summary display mode
    ///
    /// `debug` shows why an executive summary could not be composed.
    #[arg(long, value_name = "MODE")]
    pub display_mode: Option<DisplayModeArg>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .seoreport.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "SEOREPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .seoreport.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
    /// CSV, one row per listed recommendation
    Csv,
}

/// Values for --display-mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DisplayModeArg {
    Standard,
    Debug,
}

impl From<DisplayModeArg> for DisplayMode {
    fn from(arg: DisplayModeArg) -> Self {
        match arg {
            DisplayModeArg::Standard => DisplayMode::Standard,
            DisplayModeArg::Debug => DisplayMode::Debug,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Filters given on the command line. Unset flags leave a facet untouched.
    pub fn filter_update(&self) -> Result<FilterUpdate, ParsePriorityError> {
        FilterUpdate::parse(
            self.priority.as_deref(),
            self.category.as_deref(),
            self.difficulty.as_deref(),
        )
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.max_actions == Some(0) {
            return Err("Max actions must be at least 1".to_string());
        }

        if self.top_categories == Some(0) {
            return Err("Top categories must be at least 1".to_string());
        }

        if let Err(e) = self.filter_update() {
            return Err(e.to_string());
        }

        match self.input {
            Some(ref input) if !input.is_file() => {
                Err(format!("Input file does not exist: {}", input.display()))
            }
            Some(_) => Ok(()),
            None => Err("An input file is required".to_string()),
        }
    }
}
