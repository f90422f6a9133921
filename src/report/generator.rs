//! Markdown and JSON report generation.
//!
//! This module turns a [`ReportView`] into a complete Markdown report or a
//! pretty-printed JSON document.

use super::charts::{display_category, ChartData};
use super::scoring::ScoreCard;
use super::ReportView;
use crate::analysis::{group_by_step, SkippedEntry, SummaryModel};
use crate::formatting::format_execution_time;
use crate::models::{humanize, ExecutionSummary, Recommendation, ResultMetadata, Step};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(view: &ReportView) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# SEO Analysis Report\n\n");

    output.push_str(&generate_metadata_section(view));
    output.push_str(&generate_table_of_contents(view));
    output.push_str(&generate_executive_summary_section(&view.summary));
    output.push_str(&generate_metrics_section(view));
    output.push_str(&generate_action_plan_section(&view.summary.action_plan));
    output.push_str(&generate_recommendations_section(view));

    if let Some(ref scores) = view.scores {
        output.push_str(&generate_scores_section(scores));
    }

    output.push_str(&generate_execution_section(&view.execution));
    output.push_str(&generate_skipped_section(&view.skipped));
    output.push_str(&generate_footer());

    output
}

/// Escape text for use inside a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Collapse text onto one line for list items.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Generate the metadata section.
fn generate_metadata_section(view: &ReportView) -> String {
    let meta: &ResultMetadata = &view.metadata;
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    if let Some(ref workflow) = meta.workflow_type {
        section.push_str(&format!("- **Workflow:** {}\n", humanize(workflow)));
    }
    if let Some(ref description) = meta.workflow_description {
        section.push_str(&format!("- **Description:** {}\n", single_line(description)));
    }
    if let Some(ref url) = meta.website_url {
        section.push_str(&format!("- **Website:** {}\n", url));
    }
    if let Some(ref keywords) = meta.target_keywords {
        section.push_str(&format!("- **Target Keywords:** {}\n", keywords));
    }
    if let Some(ref industry) = meta.industry {
        section.push_str(&format!("- **Industry:** {}\n", industry));
    }
    section.push_str(&format!("- **Data Source:** {}\n", view.summary.data_source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        view.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if !view.filter.is_unfiltered() {
        section.push_str(&format!(
            "- **Filters:** priority={}, category={}, difficulty={}\n",
            view.filter.priority, view.filter.category, view.filter.difficulty
        ));
    }
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(view: &ReportView) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Executive Summary](#executive-summary)\n");
    toc.push_str("- [Key Metrics](#key-metrics)\n");
    if !view.summary.action_plan.is_empty() {
        toc.push_str("- [Action Plan](#action-plan)\n");
    }
    toc.push_str("- [Recommendations](#recommendations)\n");
    if view.scores.is_some() {
        toc.push_str("- [Scores](#scores)\n");
    }
    if !view.execution.execution_log.is_empty() {
        toc.push_str("- [Execution Log](#execution-log)\n");
    }
    if !view.skipped.is_empty() {
        toc.push_str("- [Skipped Entries](#skipped-entries)\n");
    }
    toc.push('\n');

    toc
}

/// Generate the executive summary section.
fn generate_executive_summary_section(summary: &SummaryModel) -> String {
    let mut section = String::new();

    section.push_str("## Executive Summary\n\n");
    section.push_str(&summary.executive_summary);
    section.push_str("\n\n");

    section
}

/// Generate the metrics section with priority and category breakdowns.
fn generate_metrics_section(view: &ReportView) -> String {
    let mut section = String::new();

    section.push_str("## Key Metrics\n\n");
    section.push_str("| Metric | Value |\n");
    section.push_str("|:---|:---:|\n");
    section.push_str(&format!(
        "| Total Recommendations | {} |\n",
        view.total_recommendations
    ));
    if view.recommendations.len() != view.total_recommendations {
        section.push_str(&format!(
            "| Matching Filters | {} |\n",
            view.recommendations.len()
        ));
    }
    section.push_str(&format!(
        "| High Priority | {} |\n",
        view.summary.high_priority_count
    ));
    section.push_str(&format!(
        "| Execution Time | {} |\n",
        view.summary.formatted_execution_time
    ));
    section.push_str(&format!(
        "| Analysis Length | {} |\n",
        view.summary.formatted_word_count
    ));
    if view.duplicates_removed > 0 {
        section.push_str(&format!(
            "| Duplicates Removed | {} |\n",
            view.duplicates_removed
        ));
    }
    section.push('\n');

    section.push_str(&generate_chart_table(&view.charts.priority, "Priority", true));
    if !view.charts.category.is_empty() {
        section.push_str(&generate_chart_table(&view.charts.category, "Category", false));
    }

    section
}

/// Render a chart series as a Markdown table.
fn generate_chart_table(chart: &ChartData, label_header: &str, priority_emoji: bool) -> String {
    let mut table = String::new();

    table.push_str(&format!("### {}\n\n", chart.title));
    table.push_str(&format!("| {} | Count |\n", label_header));
    table.push_str("|:---|:---:|\n");

    for (label, value) in chart.labels.iter().zip(&chart.values) {
        let shown = if priority_emoji {
            let emoji = label
                .parse::<crate::models::Priority>()
                .map(|p| p.emoji())
                .unwrap_or("");
            format!("{} {}", emoji, label)
        } else {
            display_category(label)
        };
        table.push_str(&format!("| {} | {} |\n", escape_cell(&shown), value));
    }
    table.push('\n');

    table
}

/// Generate the prioritized action plan.
fn generate_action_plan_section(plan: &[Recommendation]) -> String {
    if plan.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Action Plan\n\n");
    section.push_str("Address these first, highest priority at the top:\n\n");

    for (i, rec) in plan.iter().enumerate() {
        section.push_str(&format!(
            "{}. {} **{}** {}\n",
            i + 1,
            rec.priority.emoji(),
            rec.priority,
            single_line(&rec.text)
        ));
    }
    section.push('\n');

    section
}

/// Generate the recommendations section, grouped by step.
fn generate_recommendations_section(view: &ReportView) -> String {
    let mut section = String::new();

    section.push_str("## Recommendations\n\n");

    if view.recommendations.is_empty() {
        if view.total_recommendations > 0 {
            section.push_str("No recommendations match the active filters.\n\n");
            if !view.available_categories.is_empty() {
                section.push_str(&format!(
                    "Available categories: {}\n\n",
                    view.available_categories.join(", ")
                ));
            }
            if !view.available_difficulties.is_empty() {
                section.push_str(&format!(
                    "Available difficulties: {}\n\n",
                    view.available_difficulties.join(", ")
                ));
            }
        } else {
            section.push_str("The analysis did not produce any recommendations.\n\n");
        }
        return section;
    }

    for (step_key, recs) in group_by_step(&view.recommendations) {
        let step = view.steps.iter().find(|s| s.key == step_key);
        section.push_str(&generate_step_block(&step_key, step, &recs));
    }

    section
}

/// Generate the block of one step: its analysis and recommendations.
fn generate_step_block(step_key: &str, step: Option<&Step>, recs: &[&Recommendation]) -> String {
    let mut block = String::new();

    let title = step
        .map(Step::label)
        .unwrap_or_else(|| humanize(step_key));
    block.push_str(&format!("### {}\n\n", display_category(&title)));

    if let Some(analysis) = step.and_then(|s| s.record.analysis.as_deref()) {
        block.push_str(&format!("*{}*\n\n", single_line(analysis)));
    }

    for rec in recs {
        block.push_str(&format!(
            "- {} **{}** `{}` / `{}`: {}\n",
            rec.priority.emoji(),
            rec.priority,
            rec.category,
            rec.difficulty,
            single_line(&rec.text)
        ));
    }
    block.push('\n');

    if let Some(reasoning) = step.and_then(|s| s.record.reasoning.as_deref()) {
        block.push_str(&format!("> 💡 **Reasoning:** {}\n\n", single_line(reasoning)));
    }

    block
}

/// Generate the placeholder score section.
fn generate_scores_section(scores: &ScoreCard) -> String {
    let mut section = String::new();

    section.push_str("## Scores\n\n");
    section.push_str("*Indicative only; these scores are not computed from real measurements.*\n\n");
    section.push_str(&format!("- **Overall:** {}/100\n", scores.overall));
    section.push_str(&format!("- **Performance:** {}/100\n\n", scores.performance));

    if !scores.categories.is_empty() {
        section.push_str("| Category | Score |\n");
        section.push_str("|:---|:---:|\n");
        for score in &scores.categories {
            section.push_str(&format!(
                "| {} | {} |\n",
                escape_cell(&display_category(&score.category)),
                score.score
            ));
        }
        section.push('\n');
    }

    section
}

/// Generate the per-step execution log.
fn generate_execution_section(execution: &ExecutionSummary) -> String {
    if execution.execution_log.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Execution Log\n\n");
    section.push_str("| Step | Duration |\n");
    section.push_str("|:---|:---:|\n");
    for entry in &execution.execution_log {
        section.push_str(&format!(
            "| {} | {} |\n",
            escape_cell(&humanize(&entry.agent)),
            format_execution_time(entry.execution_time_seconds)
        ));
    }
    section.push_str(&format!(
        "| **Total** | **{}** |\n\n",
        format_execution_time(execution.total_execution_time_seconds)
    ));

    section
}

/// Generate the list of skipped entries.
fn generate_skipped_section(skipped: &[SkippedEntry]) -> String {
    if skipped.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Skipped Entries\n\n");
    section.push_str("These recommendation entries could not be read and were left out:\n\n");
    for entry in skipped {
        section.push_str(&format!(
            "- `{}` #{}: {}\n",
            entry.step_key, entry.index, entry.error
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by seoreport v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Write the report to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// Generate a JSON report.
pub fn generate_json_report(view: &ReportView) -> Result<String> {
    serde_json::to_string_pretty(view).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{RecommendationAggregator, SummaryAggregator};
    use crate::models::{Facet, FilterUpdate, Priority};
    use crate::report::scoring::CategoryScore;
    use crate::report::ViewOptions;
    use serde_json::{json, Value};

    fn sample_result() -> Value {
        json!({
            "workflow_type": "technical_audit",
            "workflow_description": "Perform a technical SEO audit",
            "website_url": "https://example.com",
            "industry": "Retail",
            "api_mode": "mock",
            "execution_summary": {
                "total_steps_executed": 2,
                "total_execution_time_seconds": 75.4,
                "execution_log": [
                    {"agent": "technical_seo", "execution_time_seconds": 0.42},
                    {"agent": "seo_strategy", "execution_time_seconds": 74.98}
                ]
            },
            "output_technical_seo": {
                "analysis": "Performed a technical SEO audit.",
                "recommendations": [
                    {"text": "Fix broken links | redirects", "priority": "high", "category": "technical"},
                    "Implement schema markup",
                    null
                ],
                "reasoning": "Crawl errors waste budget."
            },
            "output_seo_strategy": {
                "recommendations": [{"text": "Create a content calendar", "priority": "low", "category": "content"}]
            }
        })
    }

    fn build_view(raw: &Value, update: Option<FilterUpdate>) -> ReportView {
        let mut agg = RecommendationAggregator::new(raw);
        if let Some(update) = update {
            agg.set_filter(update);
        }
        let summary = SummaryAggregator::new(raw, &agg);
        ReportView::build(
            &agg,
            &summary,
            ViewOptions {
                max_action_items: 5,
                top_categories: None,
                include_skipped: true,
            },
        )
    }

    #[test]
    fn test_generate_markdown_report() {
        let view = build_view(&sample_result(), None);
        let markdown = generate_markdown_report(&view);

        assert!(markdown.contains("# SEO Analysis Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("- **Workflow:** technical audit"));
        assert!(markdown.contains("- **Data Source:** Mock data"));
        assert!(markdown.contains("## Executive Summary"));
        assert!(markdown.contains("## Action Plan"));
        assert!(markdown.contains("### Technical Seo"));
        assert!(markdown.contains("*Performed a technical SEO audit.*"));
        assert!(markdown.contains("Crawl errors waste budget."));
        assert!(markdown.contains("| Total Recommendations | 3 |"));
        assert!(markdown.contains("| **Total** | **1m 15s** |"));
        assert!(markdown.contains("| technical seo | 420ms |"));
        assert!(markdown.contains("## Skipped Entries"));
        assert!(markdown.contains("`output_technical_seo` #2: entry is null"));
        assert!(!markdown.contains("## Scores"));
    }

    #[test]
    fn test_action_plan_lists_high_before_medium() {
        let view = build_view(&sample_result(), None);
        let section = generate_action_plan_section(&view.summary.action_plan);

        let high = section.find("Fix broken links").unwrap();
        let medium = section.find("Implement schema markup").unwrap();
        assert!(high < medium);
        assert!(!section.contains("content calendar"));
    }

    #[test]
    fn test_filtered_report_mentions_filters() {
        let update = FilterUpdate {
            priority: Some(Facet::Only(Priority::Low)),
            ..Default::default()
        };
        let view = build_view(&sample_result(), Some(update));
        let markdown = generate_markdown_report(&view);

        assert!(markdown.contains("- **Filters:** priority=Low, category=all, difficulty=all"));
        assert!(markdown.contains("| Matching Filters | 1 |"));
        assert!(markdown.contains("Create a content calendar"));
    }

    #[test]
    fn test_empty_filtered_view() {
        let update = FilterUpdate {
            category: Some(Facet::Only("links".to_string())),
            ..Default::default()
        };
        let view = build_view(&sample_result(), Some(update));
        let section = generate_recommendations_section(&view);
        assert!(section.contains("No recommendations match the active filters."));

        let view = build_view(&json!({}), None);
        let section = generate_recommendations_section(&view);
        assert!(section.contains("did not produce any recommendations"));
    }

    #[test]
    fn test_table_cells_are_escaped() {
        assert_eq!(escape_cell("a | b\nc"), "a \\| b c");
    }

    #[test]
    fn test_scores_section() {
        let scores = ScoreCard {
            overall: 80,
            performance: 75,
            categories: vec![CategoryScore {
                category: "technical".to_string(),
                score: 82,
            }],
        };
        let view = build_view(&sample_result(), None).with_scores(scores);
        let markdown = generate_markdown_report(&view);

        assert!(markdown.contains("## Scores"));
        assert!(markdown.contains("- **Overall:** 80/100"));
        assert!(markdown.contains("| Technical | 82 |"));
    }

    #[test]
    fn test_generate_json_report() {
        let view = build_view(&sample_result(), None);
        let json = generate_json_report(&view).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total_recommendations"], 3);
        assert_eq!(value["outcome"], "populated");
        assert_eq!(value["priority_counts"]["high"], 1);
        assert_eq!(value["summary"]["formatted_execution_time"], "1m 15s");
        assert_eq!(value["skipped"][0]["error"]["reason"], "null");
        assert_eq!(value["filter"]["priority"], "all");
        assert!(value.get("scores").is_none());
        assert!(value.get("steps").is_none());
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");

        write_report("# Report\n", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Report\n");
    }
}
