//! Chart data builders.
//!
//! These produce render-ready label/value/color series from the
//! normalized recommendations. They only read their input.

use crate::models::{humanize, Priority, Recommendation, Step};
use serde::Serialize;
use std::collections::BTreeMap;

/// Label of the bucket collecting categories beyond the top N.
pub const OTHER_LABEL: &str = "other";

const CATEGORY_PALETTE: [&str; 8] = [
    "#4e79a7", "#f28e2b", "#59a14f", "#b07aa1", "#76b7b2", "#edc948", "#ff9da7", "#9c755f",
];

const OTHER_COLOR: &str = "#bab0ac";

/// One chart's series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<usize>,
    pub colors: Vec<String>,
}

impl ChartData {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            labels: Vec::new(),
            values: Vec::new(),
            colors: Vec::new(),
        }
    }

    fn push(&mut self, label: impl Into<String>, value: usize, color: &str) {
        self.labels.push(label.into());
        self.values.push(value);
        self.colors.push(color.to_string());
    }

    pub fn total(&self) -> usize {
        self.values.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// The charts shown on a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSet {
    pub priority: ChartData,
    pub category: ChartData,
    pub steps: ChartData,
}

/// Fixed color of each priority.
pub fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "#dc3545",
        Priority::Medium => "#ffc107",
        Priority::Low => "#28a745",
    }
}

/// Priority distribution: always high, medium, low, including zeros.
pub fn priority_chart(counts: &BTreeMap<Priority, usize>) -> ChartData {
    let mut chart = ChartData::new("Recommendations by Priority");

    for priority in Priority::ALL {
        chart.push(
            priority.to_string(),
            counts.get(&priority).copied().unwrap_or(0),
            priority_color(priority),
        );
    }

    chart
}

/// Category distribution, largest first (ties by name).
///
/// With `top_n`, categories beyond the first N are summed into one
/// [`OTHER_LABEL`] slice.
pub fn category_chart(counts: &BTreeMap<String, usize>, top_n: Option<usize>) -> ChartData {
    let mut chart = ChartData::new("Recommendations by Category");

    let mut entries: Vec<(&String, &usize)> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let limit = top_n.unwrap_or(entries.len()).min(entries.len());
    let (shown, rest) = entries.split_at(limit);

    for (i, (category, count)) in shown.iter().enumerate() {
        chart.push(
            category.as_str(),
            **count,
            CATEGORY_PALETTE[i % CATEGORY_PALETTE.len()],
        );
    }

    let other: usize = rest.iter().map(|(_, count)| **count).sum();
    if other > 0 {
        chart.push(OTHER_LABEL, other, OTHER_COLOR);
    }

    chart
}

/// Recommendations per step, in step order. Steps without any are shown as zero.
pub fn step_chart(steps: &[Step], recs: &[Recommendation]) -> ChartData {
    let mut chart = ChartData::new("Recommendations by Step");

    for (i, step) in steps.iter().enumerate() {
        let count = recs.iter().filter(|r| r.source_step_key == step.key).count();
        chart.push(
            step.label(),
            count,
            CATEGORY_PALETTE[i % CATEGORY_PALETTE.len()],
        );
    }

    chart
}

/// Build every chart for a report.
pub fn build_charts(
    steps: &[Step],
    recs: &[Recommendation],
    priority_counts: &BTreeMap<Priority, usize>,
    category_counts: &BTreeMap<String, usize>,
    top_categories: Option<usize>,
) -> ChartSet {
    ChartSet {
        priority: priority_chart(priority_counts),
        category: category_chart(category_counts, top_categories),
        steps: step_chart(steps, recs),
    }
}

/// Title-case a category for display: `on_page seo` -> `On Page Seo`.
pub fn display_category(category: &str) -> String {
    humanize(category)
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{count_by_category, count_by_priority, RecommendationAggregator};
    use serde_json::json;

    fn counts(pairs: &[(&str, usize)]) -> BTreeMap<String, usize> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_priority_chart_has_fixed_order_and_zeros() {
        let mut counts = BTreeMap::new();
        counts.insert(Priority::Low, 2);

        let chart = priority_chart(&counts);
        assert_eq!(chart.labels, vec!["High", "Medium", "Low"]);
        assert_eq!(chart.values, vec![0, 0, 2]);
        assert_eq!(chart.colors[0], "#dc3545");
        assert_eq!(chart.total(), 2);
    }

    #[test]
    fn test_category_chart_sorted_with_ties_by_name() {
        let chart = category_chart(
            &counts(&[("technical", 2), ("content", 2), ("links", 5)]),
            None,
        );
        assert_eq!(chart.labels, vec!["links", "content", "technical"]);
        assert_eq!(chart.values, vec![5, 2, 2]);
    }

    #[test]
    fn test_category_chart_top_n_collapses_rest() {
        let chart = category_chart(
            &counts(&[("a", 4), ("b", 3), ("c", 2), ("d", 1)]),
            Some(2),
        );
        assert_eq!(chart.labels, vec!["a", "b", "other"]);
        assert_eq!(chart.values, vec![4, 3, 3]);
        assert_eq!(chart.colors[2], OTHER_COLOR);

        let all = category_chart(&counts(&[("a", 1)]), Some(5));
        assert_eq!(all.labels, vec!["a"]);
    }

    #[test]
    fn test_step_chart_includes_empty_steps() {
        let raw = json!({
            "output_keyword_research": {"recommendations": ["a", "b"]},
            "output_technical_seo": {"analysis": "nothing to fix"}
        });
        let agg = RecommendationAggregator::new(&raw);
        let chart = step_chart(agg.steps(), agg.recommendations());

        assert_eq!(chart.labels, vec!["keyword research", "technical seo"]);
        assert_eq!(chart.values, vec![2, 0]);
    }

    #[test]
    fn test_build_charts_totals_match() {
        let raw = json!({
            "output_a": {"recommendations": [
                {"text": "x", "priority": "high", "category": "content"},
                "y",
                {"text": "z", "priority": "low"}
            ]}
        });
        let agg = RecommendationAggregator::new(&raw);
        let recs = agg.recommendations();
        let charts = build_charts(
            agg.steps(),
            recs,
            &count_by_priority(recs),
            &count_by_category(recs),
            None,
        );

        assert_eq!(charts.priority.total(), 3);
        assert_eq!(charts.category.total(), 3);
        assert_eq!(charts.steps.total(), 3);
        assert!(!charts.category.is_empty());
    }

    #[test]
    fn test_display_category() {
        assert_eq!(display_category("on_page seo"), "On Page Seo");
        assert_eq!(display_category("general"), "General");
    }
}
