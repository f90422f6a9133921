//! Presentation adapters.
//!
//! Everything under this module reads the normalized model produced by the
//! aggregation core and turns it into render-ready output. Output encoding
//! (Markdown table cells, CSV fields) happens here, never in the core.

pub mod charts;
pub mod csv;
pub mod generator;
pub mod scoring;

pub use csv::generate_csv_report;
pub use generator::{generate_json_report, generate_markdown_report};

use crate::analysis::{
    count_by_category, count_by_priority, distinct_values, AggregationOutcome,
    RecommendationAggregator, SkippedEntry, SummaryAggregator, SummaryModel,
};
use crate::models::{ExecutionSummary, FilterState, Priority, Recommendation, ResultMetadata, Step};
use charts::ChartSet;
use chrono::{DateTime, Utc};
use scoring::ScoreCard;
use serde::Serialize;
use std::collections::BTreeMap;

/// Settings that shape a report view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Items in the prioritized action plan.
    pub max_action_items: usize,
    /// Categories shown individually in the category chart.
    pub top_categories: Option<usize>,
    /// List skipped recommendation entries.
    pub include_skipped: bool,
}

/// Everything an export needs, assembled once from the aggregators.
#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub generated_at: DateTime<Utc>,
    pub metadata: ResultMetadata,
    pub outcome: AggregationOutcome,
    pub summary: SummaryModel,
    pub filter: FilterState,
    pub total_recommendations: usize,
    pub recommendations: Vec<Recommendation>,
    pub priority_counts: BTreeMap<Priority, usize>,
    pub category_counts: BTreeMap<String, usize>,
    /// Filter values present in the full list.
    pub available_categories: Vec<String>,
    pub available_difficulties: Vec<String>,
    pub charts: ChartSet,
    pub execution: ExecutionSummary,
    #[serde(skip)]
    pub steps: Vec<Step>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedEntry>,
    pub duplicates_removed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<ScoreCard>,
}

impl ReportView {
    /// Assemble a view of the filtered recommendations.
    ///
    /// Counts and charts describe the filtered list; the summary and
    /// action plan describe the full one.
    pub fn build(
        aggregator: &RecommendationAggregator,
        summary: &SummaryAggregator<'_>,
        options: ViewOptions,
    ) -> Self {
        let recommendations = aggregator.filtered_recommendations().to_vec();
        let priority_counts = count_by_priority(&recommendations);
        let category_counts = count_by_category(&recommendations);
        let charts = charts::build_charts(
            aggregator.steps(),
            &recommendations,
            &priority_counts,
            &category_counts,
            options.top_categories,
        );

        let all = aggregator.recommendations();
        let available = |field: fn(&Recommendation) -> &str| -> Vec<String> {
            distinct_values(all, field)
                .into_iter()
                .map(str::to_string)
                .collect()
        };

        let skipped = if options.include_skipped {
            aggregator.skipped().to_vec()
        } else {
            Vec::new()
        };

        Self {
            generated_at: Utc::now(),
            metadata: summary.metadata().clone(),
            outcome: aggregator.outcome(),
            summary: summary.model(options.max_action_items),
            filter: aggregator.filter().clone(),
            total_recommendations: aggregator.total_recommendations(),
            recommendations,
            priority_counts,
            category_counts,
            available_categories: available(|r| r.category.as_str()),
            available_difficulties: available(|r| r.difficulty.as_str()),
            charts,
            execution: summary.execution().clone(),
            steps: aggregator.steps().to_vec(),
            skipped,
            duplicates_removed: aggregator.duplicates_removed(),
            scores: None,
        }
    }

    /// Attach placeholder scores.
    pub fn with_scores(mut self, scores: ScoreCard) -> Self {
        self.scores = Some(scores);
        self
    }
}
