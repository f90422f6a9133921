//! Executive summary and scalar metrics.
//!
//! Everything here is derived from the result document and the
//! recommendation aggregator; recomputing with the same input yields the
//! same output.

use crate::analysis::recommendations::{recommendation_text, RecommendationAggregator};
use crate::formatting::{
    count_words, format_execution_time, format_word_count, pluralize, round_half_away,
};
use crate::models::{humanize, ExecutionSummary, Priority, Recommendation, ResultMetadata, Step};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Write};
use thiserror::Error;
use tracing::{debug, warn};

/// Default number of items in the prioritized action plan.
pub const DEFAULT_ACTION_PLAN_ITEMS: usize = 5;

/// Shown in place of the executive summary when it cannot be composed.
pub const FALLBACK_SUMMARY: &str = "The SEO analysis is complete. Review the recommendations below for suggested improvements to your website's search performance.";

const CLOSING_PARAGRAPH: &str = "Start with the high-priority items in the action plan, then work through the remaining recommendations to build lasting search visibility.";

/// How much internal detail user-facing text may expose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Plain, user-safe text only.
    #[default]
    Standard,
    /// Append failure details to fallback text.
    Debug,
}

/// Summary settings, passed in explicitly rather than read from the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryOptions {
    pub display_mode: DisplayMode,
}

/// Why the executive summary could not be composed.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("failed to format summary: {0}")]
    Format(#[from] fmt::Error),
    #[error("summary composed to empty text")]
    Empty,
}

/// Where the step outputs came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Mock,
    Mixed,
    Unknown,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Live => write!(f, "Live API"),
            DataSource::Mock => write!(f, "Mock data"),
            DataSource::Mixed => write!(f, "Mixed (live and mock)"),
            DataSource::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Inputs of the executive summary template.
#[derive(Debug, Clone)]
pub struct SummaryInput<'a> {
    pub metadata: &'a ResultMetadata,
    pub total_recommendations: usize,
    pub step_keys: Vec<&'a str>,
    pub execution_seconds: Option<f64>,
}

/// Compose the executive summary paragraph.
///
/// Clause order is fixed: workflow and subject, recommendation count,
/// keyword/content/technical clauses, industry, execution time, closing.
pub fn compose_executive_summary(input: &SummaryInput<'_>) -> Result<String, SummaryError> {
    let meta = input.metadata;
    let mut text = String::new();

    let workflow = meta
        .workflow_type
        .as_deref()
        .map(humanize)
        .unwrap_or_else(|| "SEO".to_string());

    let subject = if let Some(ref url) = meta.website_url {
        url.clone()
    } else if let Some(ref keywords) = meta.target_keywords {
        format!("the keywords \"{}\"", keywords)
    } else {
        "the submitted website".to_string()
    };

    write!(
        text,
        "This {} workflow analyzed {} and produced {}.",
        workflow,
        subject,
        pluralize(input.total_recommendations, "recommendation", "recommendations")
    )?;

    let keys: Vec<String> = input.step_keys.iter().map(|k| k.to_lowercase()).collect();
    let has_step = |needle: &str| keys.iter().any(|k| k.contains(needle));

    if has_step("keyword_research") {
        write!(
            text,
            " Keyword research identified high-value search terms and the intent behind them."
        )?;
    }
    if has_step("content") {
        write!(
            text,
            " Content analysis surfaced gaps and opportunities to strengthen on-page content."
        )?;
    }
    if has_step("technical") {
        write!(
            text,
            " The technical review flagged site health issues that affect crawlability and performance."
        )?;
    }

    if let Some(ref industry) = meta.industry {
        write!(
            text,
            " Recommendations are tailored to the {} industry.",
            industry
        )?;
    }

    let seconds = input
        .execution_seconds
        .filter(|s| s.is_finite())
        .unwrap_or(0.0);
    write!(
        text,
        " The analysis completed in {:.1} seconds.",
        round_half_away(seconds, 1)
    )?;

    write!(text, "\n\n{}", CLOSING_PARAGRAPH)?;

    if text.trim().is_empty() {
        return Err(SummaryError::Empty);
    }

    Ok(text)
}

/// Fallback text for a failed summary, honoring the display mode.
pub fn fallback_summary(error: &SummaryError, mode: DisplayMode) -> String {
    match mode {
        DisplayMode::Standard => FALLBACK_SUMMARY.to_string(),
        DisplayMode::Debug => format!("{} (summary unavailable: {})", FALLBACK_SUMMARY, error),
    }
}

/// Words in analysis text, recommendation text and reasoning across all steps.
///
/// Object-form recommendations contribute the same text field the
/// aggregator extracts from them.
pub fn analysis_word_count(steps: &[Step]) -> usize {
    steps
        .iter()
        .map(|step| {
            let record = &step.record;
            let analysis = record.analysis.as_deref().map(count_words).unwrap_or(0);
            let reasoning = record.reasoning.as_deref().map(count_words).unwrap_or(0);
            let recommendations: usize = record
                .recommendations
                .iter()
                .filter_map(recommendation_text)
                .map(count_words)
                .sum();
            analysis + reasoning + recommendations
        })
        .sum()
}

/// Determine whether step outputs came from the live API or mock data.
pub fn detect_data_source(steps: &[Step], api_mode: Option<&str>) -> DataSource {
    let flags: Vec<bool> = steps
        .iter()
        .filter_map(|s| s.record.api_info.as_ref()?.mock_data)
        .collect();

    if !flags.is_empty() {
        return match (flags.iter().all(|m| *m), flags.iter().any(|m| *m)) {
            (true, _) => DataSource::Mock,
            (false, true) => DataSource::Mixed,
            (false, false) => DataSource::Live,
        };
    }

    match api_mode.map(str::to_lowercase).as_deref() {
        Some("mock") => DataSource::Mock,
        Some("live") => DataSource::Live,
        _ => DataSource::Unknown,
    }
}

/// Render-ready summary values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryModel {
    pub executive_summary: String,
    pub formatted_execution_time: String,
    pub formatted_word_count: String,
    pub analysis_word_count: usize,
    pub high_priority_count: usize,
    pub data_source: DataSource,
    pub action_plan: Vec<Recommendation>,
}

/// Derives the executive summary and metrics of one result document.
#[derive(Debug)]
pub struct SummaryAggregator<'a> {
    aggregator: &'a RecommendationAggregator,
    metadata: ResultMetadata,
    execution: ExecutionSummary,
    executive_summary: String,
    word_count: usize,
}

impl<'a> SummaryAggregator<'a> {
    /// Summarize with default options.
    pub fn new(raw: &Value, aggregator: &'a RecommendationAggregator) -> Self {
        Self::with_options(raw, aggregator, SummaryOptions::default())
    }

    pub fn with_options(
        raw: &Value,
        aggregator: &'a RecommendationAggregator,
        options: SummaryOptions,
    ) -> Self {
        let metadata = ResultMetadata::from_result(raw);
        let execution = ExecutionSummary::from_result(raw);

        let input = SummaryInput {
            metadata: &metadata,
            total_recommendations: aggregator.total_recommendations(),
            step_keys: aggregator.step_keys().collect(),
            execution_seconds: execution.total_execution_time_seconds,
        };

        let executive_summary = match compose_executive_summary(&input) {
            Ok(text) => text,
            Err(e) => {
                warn!("Executive summary generation failed: {}", e);
                fallback_summary(&e, options.display_mode)
            }
        };

        let word_count = analysis_word_count(aggregator.steps());
        debug!("Counted {} words of analysis", word_count);

        Self {
            aggregator,
            metadata,
            execution,
            executive_summary,
            word_count,
        }
    }

    pub fn executive_summary(&self) -> &str {
        &self.executive_summary
    }

    pub fn formatted_execution_time(&self) -> String {
        format_execution_time(self.execution.total_execution_time_seconds)
    }

    pub fn analysis_word_count(&self) -> usize {
        self.word_count
    }

    pub fn formatted_word_count(&self) -> String {
        format_word_count(Some(self.word_count as f64))
    }

    /// Number of high-priority recommendations in the full list.
    pub fn high_priority_count(&self) -> usize {
        self.aggregator
            .recommendations()
            .iter()
            .filter(|r| r.priority == Priority::High)
            .count()
    }

    /// High-priority items, then medium-priority items, each in aggregation
    /// order, truncated to `max_items`. Low-priority items are never included.
    pub fn prioritized_action_plan(&self, max_items: usize) -> Vec<Recommendation> {
        let recs = self.aggregator.recommendations();
        let by_priority = |priority: Priority| recs.iter().filter(move |r| r.priority == priority);

        by_priority(Priority::High)
            .chain(by_priority(Priority::Medium))
            .take(max_items)
            .cloned()
            .collect()
    }

    pub fn data_source(&self) -> DataSource {
        detect_data_source(self.aggregator.steps(), self.metadata.api_mode.as_deref())
    }

    pub fn metadata(&self) -> &ResultMetadata {
        &self.metadata
    }

    pub fn execution(&self) -> &ExecutionSummary {
        &self.execution
    }

    /// Collect every summary value into one render-ready model.
    pub fn model(&self, max_action_items: usize) -> SummaryModel {
        SummaryModel {
            executive_summary: self.executive_summary().to_string(),
            formatted_execution_time: self.formatted_execution_time(),
            formatted_word_count: self.formatted_word_count(),
            analysis_word_count: self.analysis_word_count(),
            high_priority_count: self.high_priority_count(),
            data_source: self.data_source(),
            action_plan: self.prioritized_action_plan(max_action_items),
        }
    }
}
