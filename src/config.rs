//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.seoreport.toml` files.

use crate::analysis::{DisplayMode, DEFAULT_ACTION_PLAN_ITEMS};
use crate::models::{FilterUpdate, ParsePriorityError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".seoreport.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Executive summary settings.
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Default recommendation filters.
    #[serde(default)]
    pub filters: FiltersConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path; stdout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Executive summary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Items in the prioritized action plan.
    #[serde(default = "default_max_action_items")]
    pub max_action_items: usize,

    /// `standard` hides failure details from user-facing text, `debug` shows them.
    #[serde(default)]
    pub display_mode: DisplayMode,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_action_items: default_max_action_items(),
            display_mode: DisplayMode::default(),
        }
    }
}

fn default_max_action_items() -> usize {
    DEFAULT_ACTION_PLAN_ITEMS
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include placeholder scores.
    #[serde(default)]
    pub include_scores: bool,

    /// List recommendation entries that could not be read.
    #[serde(default = "default_true")]
    pub include_skipped: bool,

    /// Categories shown individually in the category breakdown.
    #[serde(default = "default_top_categories")]
    pub top_categories: usize,

    /// Drop repeated recommendations.
    #[serde(default)]
    pub dedupe: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_scores: false,
            include_skipped: true,
            top_categories: default_top_categories(),
            dedupe: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_top_categories() -> usize {
    8
}

/// Default filters, as `all` or a specific value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersConfig {
    #[serde(default = "default_all")]
    pub priority: String,

    #[serde(default = "default_all")]
    pub category: String,

    #[serde(default = "default_all")]
    pub difficulty: String,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            priority: default_all(),
            category: default_all(),
            difficulty: default_all(),
        }
    }
}

fn default_all() -> String {
    "all".to_string()
}

impl FiltersConfig {
    /// Parse the configured filters.
    pub fn to_update(&self) -> Result<FilterUpdate, ParsePriorityError> {
        FilterUpdate::parse(
            Some(self.priority.as_str()),
            Some(self.category.as_str()),
            Some(self.difficulty.as_str()),
        )
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.seoreport.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings; only
    /// explicitly provided values override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = Some(output.clone());
        }

        if let Some(max_actions) = args.max_actions {
            self.summary.max_action_items = max_actions;
        }
        if let Some(mode) = args.display_mode {
            self.summary.display_mode = mode.into();
        }

        if let Some(top) = args.top_categories {
            self.report.top_categories = top;
        }

        // Flags always override
        if args.scores {
            self.report.include_scores = true;
        }
        if args.dedupe {
            self.report.dedupe = true;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Log level after merging: `--quiet` wins, then `verbose` from
    /// either the file or the command line.
    pub fn log_level(&self, quiet: bool) -> tracing::Level {
        if quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use crate::models::{Facet, Priority};
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.summary.max_action_items, 5);
        assert_eq!(config.summary.display_mode, DisplayMode::Standard);
        assert!(config.report.include_skipped);
        assert!(!config.report.dedupe);
        assert_eq!(config.filters.priority, "all");
        assert!(config.general.output.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "report.md"
verbose = true

[summary]
max_action_items = 3
display_mode = "debug"

[report]
include_scores = true
dedupe = true

[filters]
priority = "high"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, Some(PathBuf::from("report.md")));
        assert!(config.general.verbose);
        assert_eq!(config.summary.max_action_items, 3);
        assert_eq!(config.summary.display_mode, DisplayMode::Debug);
        assert!(config.report.include_scores);
        assert!(config.report.include_skipped);
        assert_eq!(config.report.top_categories, 8);
        assert!(config.report.dedupe);
        assert_eq!(config.filters.category, "all");

        let update = config.filters.to_update().unwrap();
        assert_eq!(update.priority, Some(Facet::Only(Priority::High)));
        assert_eq!(update.category, Some(Facet::All));
    }

    #[test]
    fn test_verbose_from_file_sets_log_level() {
        let mut config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        assert_eq!(config.log_level(false), tracing::Level::DEBUG);
        assert_eq!(config.log_level(true), tracing::Level::ERROR);

        config.general.verbose = false;
        assert_eq!(config.log_level(false), tracing::Level::INFO);

        let args = Args::try_parse_from(["seoreport", "result.json", "--verbose"]).unwrap();
        config.merge_with_args(&args);
        assert_eq!(config.log_level(args.quiet), tracing::Level::DEBUG);
    }

    #[test]
    fn test_invalid_filter_priority() {
        let config: Config = toml::from_str("[filters]\npriority = \"urgent\"\n").unwrap();
        assert!(config.filters.to_update().is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[summary]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[filters]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.summary.max_action_items, 5);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[summary]\nmax_action_items = 2\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.summary.max_action_items, 2);

        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "not = [valid").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }
}
