//! Recommendation aggregation and filtering.
//!
//! Walks the extracted steps, normalizes every usable recommendation entry,
//! and keeps a filtered view in sync with the active [`FilterState`].
//! Entries that cannot be used are skipped and recorded, never fatal.

use crate::extract::{extract_steps, value_kind};
use crate::models::{
    FilterState, FilterUpdate, Priority, Recommendation, Step, DEFAULT_CATEGORY,
    DEFAULT_DIFFICULTY,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

/// Object fields that may carry the recommendation text, in lookup order.
pub const TEXT_FIELDS: [&str; 5] = ["text", "recommendation", "description", "title", "action"];

/// Why a single recommendation entry was not used.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EntryError {
    #[error("entry is null")]
    Null,
    #[error("entry is {kind}, expected a string or an object")]
    UnsupportedType { kind: &'static str },
    #[error("object entry has none of the text fields {:?}", TEXT_FIELDS)]
    MissingText,
    #[error("entry text is empty")]
    EmptyText,
}

/// A recommendation entry that was skipped during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Key of the step holding the entry.
    pub step_key: String,
    /// Position of the entry in the step's recommendation list.
    pub index: usize,
    /// Why it was skipped.
    pub error: EntryError,
}

/// How aggregation turned out, so callers can tell an empty report caused
/// by missing data from one caused by rejected entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationOutcome {
    /// The document contained no steps.
    NoSteps,
    /// Steps exist but none carried recommendation entries.
    NoRecommendations,
    /// Entries exist but every one of them was skipped.
    AllEntriesSkipped,
    /// At least one recommendation was aggregated.
    Populated,
}

/// Aggregation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregatorOptions {
    /// Drop recommendations whose normalized text repeats an earlier one.
    pub dedupe: bool,
}

/// Returns the text of a recommendation entry, if it has one.
///
/// Bare strings are their own text; objects use the first string field
/// from [`TEXT_FIELDS`].
pub fn recommendation_text(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(text) => Some(text),
        Value::Object(obj) => TEXT_FIELDS
            .iter()
            .find_map(|field| obj.get(*field).and_then(Value::as_str)),
        _ => None,
    }
}

/// Normalize one recommendation entry.
pub fn parse_recommendation(entry: &Value, step_key: &str) -> Result<Recommendation, EntryError> {
    let obj = match entry {
        Value::Null => return Err(EntryError::Null),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(EntryError::EmptyText);
            }
            return Ok(Recommendation::from_text(text, step_key));
        }
        Value::Object(obj) => obj,
        other => {
            return Err(EntryError::UnsupportedType {
                kind: value_kind(other),
            })
        }
    };

    let text = recommendation_text(entry)
        .ok_or(EntryError::MissingText)?
        .trim();
    if text.is_empty() {
        return Err(EntryError::EmptyText);
    }

    let label = |field: &str, default: &str| {
        obj.get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(default)
            .to_string()
    };

    Ok(Recommendation {
        text: text.to_string(),
        priority: Priority::from_loose(obj.get("priority")),
        category: label("category", DEFAULT_CATEGORY),
        difficulty: label("difficulty", DEFAULT_DIFFICULTY),
        source_step_key: step_key.to_string(),
    })
}

/// Builds and filters the normalized recommendation list of one result document.
#[derive(Debug, Clone)]
pub struct RecommendationAggregator {
    steps: Vec<Step>,
    recommendations: Vec<Recommendation>,
    filtered: Vec<Recommendation>,
    filter: FilterState,
    skipped: Vec<SkippedEntry>,
    duplicates_removed: usize,
    entries_seen: usize,
}

impl RecommendationAggregator {
    /// Aggregate a result document with default options.
    pub fn new(raw: &Value) -> Self {
        Self::with_options(raw, AggregatorOptions::default())
    }

    /// Aggregate a result document.
    pub fn with_options(raw: &Value, options: AggregatorOptions) -> Self {
        Self::from_steps(extract_steps(raw), options)
    }

    /// Aggregate already-extracted steps.
    pub fn from_steps(steps: Vec<Step>, options: AggregatorOptions) -> Self {
        let mut recommendations = Vec::new();
        let mut skipped = Vec::new();
        let mut seen_texts = HashSet::new();
        let mut duplicates_removed = 0;
        let mut entries_seen = 0;

        for step in &steps {
            for (index, entry) in step.record.recommendations.iter().enumerate() {
                entries_seen += 1;

                let rec = match parse_recommendation(entry, &step.key) {
                    Ok(rec) => rec,
                    Err(error) => {
                        warn!(
                            "Skipping recommendation {} in '{}': {}",
                            index, step.key, error
                        );
                        skipped.push(SkippedEntry {
                            step_key: step.key.clone(),
                            index,
                            error,
                        });
                        continue;
                    }
                };

                if options.dedupe && !seen_texts.insert(normalize_text(&rec.text)) {
                    debug!("Dropping duplicate recommendation from '{}'", step.key);
                    duplicates_removed += 1;
                    continue;
                }

                recommendations.push(rec);
            }
        }

        debug!(
            "Aggregated {} recommendations from {} steps ({} skipped, {} duplicates)",
            recommendations.len(),
            steps.len(),
            skipped.len(),
            duplicates_removed
        );

        let filtered = recommendations.clone();

        Self {
            steps,
            recommendations,
            filtered,
            filter: FilterState::default(),
            skipped,
            duplicates_removed,
            entries_seen,
        }
    }

    /// The full normalized list, in step order then entry order.
    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    /// The recommendations passing the current filter, in the same order.
    pub fn filtered_recommendations(&self) -> &[Recommendation] {
        &self.filtered
    }

    pub fn total_recommendations(&self) -> usize {
        self.recommendations.len()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Update the filter and recompute the filtered view before returning.
    pub fn set_filter(&mut self, update: FilterUpdate) {
        self.filter.apply(update);
        self.filtered = self
            .recommendations
            .iter()
            .filter(|rec| self.filter.matches(rec))
            .cloned()
            .collect();
    }

    /// The steps the recommendations were taken from.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Keys of all extracted steps, in document order.
    pub fn step_keys(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.key.as_str())
    }

    /// Entries that were skipped, with the reason.
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// Number of recommendations dropped as duplicates.
    pub fn duplicates_removed(&self) -> usize {
        self.duplicates_removed
    }

    pub fn outcome(&self) -> AggregationOutcome {
        if self.steps.is_empty() {
            AggregationOutcome::NoSteps
        } else if self.entries_seen == 0 {
            AggregationOutcome::NoRecommendations
        } else if self.recommendations.is_empty() && !self.skipped.is_empty() {
            AggregationOutcome::AllEntriesSkipped
        } else if self.recommendations.is_empty() {
            AggregationOutcome::NoRecommendations
        } else {
            AggregationOutcome::Populated
        }
    }
}

/// Lowercase, trimmed, internal whitespace collapsed.
fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Count recommendations per category.
pub fn count_by_category(recs: &[Recommendation]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for rec in recs {
        let category = if rec.category.trim().is_empty() {
            DEFAULT_CATEGORY
        } else {
            rec.category.as_str()
        };
        *counts.entry(category.to_string()).or_default() += 1;
    }

    counts
}

/// Count recommendations per priority.
pub fn count_by_priority(recs: &[Recommendation]) -> BTreeMap<Priority, usize> {
    let mut counts: BTreeMap<Priority, usize> = BTreeMap::new();

    for rec in recs {
        *counts.entry(rec.priority).or_default() += 1;
    }

    counts
}

/// Group recommendations by source step, keeping first-seen step order.
pub fn group_by_step(recs: &[Recommendation]) -> Vec<(String, Vec<&Recommendation>)> {
    let mut groups: Vec<(String, Vec<&Recommendation>)> = Vec::new();

    for rec in recs {
        match groups.iter_mut().find(|(key, _)| *key == rec.source_step_key) {
            Some((_, group)) => group.push(rec),
            None => groups.push((rec.source_step_key.clone(), vec![rec])),
        }
    }

    groups
}

/// Distinct values of a field, in order of first appearance.
pub fn distinct_values<'a, F>(recs: &'a [Recommendation], field: F) -> Vec<&'a str>
where
    F: Fn(&'a Recommendation) -> &'a str,
{
    let mut values: Vec<&str> = Vec::new();

    for rec in recs {
        let value = field(rec);
        if !values.contains(&value) {
            values.push(value);
        }
    }

    values
}
