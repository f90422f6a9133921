//! Data models for the SEO report.
//!
//! This module contains the core data structures shared by the extractor,
//! the aggregators and the presentation adapters: priorities, normalized
//! recommendations, filters, and the loosely-parsed pieces of a workflow
//! result document.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Category assigned when a recommendation does not carry a usable one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Difficulty assigned when a recommendation does not carry a usable one.
pub const DEFAULT_DIFFICULTY: &str = "unspecified";

/// Priority of a recommendation.
///
/// Declaration order is display order, so `High < Medium < Low` and
/// ordered maps keyed by priority list high first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Do these first
    High,
    /// The default when nothing else is known
    #[default]
    Medium,
    /// Nice to have, never part of the action plan
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// Error returned when a priority string is not `high`, `medium` or `low`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown priority '{0}' (expected high, medium or low)")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(ParsePriorityError(other.to_string())),
        }
    }
}

impl Priority {
    /// All priorities in display order.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Reads a priority from an arbitrary JSON value, coercing anything
    /// unrecognized to `Medium`.
    pub fn from_loose(value: Option<&Value>) -> Self {
        value
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Lowercase identifier, as used in CSV and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Returns an emoji representation of the priority.
    pub fn emoji(&self) -> &'static str {
        match self {
            Priority::High => "🔴",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        }
    }
}

/// A single normalized, actionable recommendation.
///
/// Built once per input entry during aggregation and never modified after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The recommendation text.
    pub text: String,
    /// Priority (defaults to medium).
    pub priority: Priority,
    /// Free-form category (defaults to `general`).
    pub category: String,
    /// Free-form difficulty (defaults to `unspecified`).
    pub difficulty: String,
    /// Key of the step this recommendation came from.
    pub source_step_key: String,
}

impl Recommendation {
    /// Creates a recommendation from bare text with every other field defaulted.
    pub fn from_text(text: impl Into<String>, source_step_key: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            priority: Priority::Medium,
            category: DEFAULT_CATEGORY.to_string(),
            difficulty: DEFAULT_DIFFICULTY.to_string(),
            source_step_key: source_step_key.into(),
        }
    }
}

/// One filter dimension: either everything, or one specific value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Facet<T> {
    /// No restriction.
    #[default]
    All,
    /// Only entries equal to this value.
    Only(T),
}

impl<T: PartialEq> Facet<T> {
    /// Returns true if `value` passes this facet.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(expected) => expected == value,
        }
    }

    /// Returns true if this facet restricts nothing.
    pub fn is_all(&self) -> bool {
        matches!(self, Facet::All)
    }
}

impl<T: FromStr> FromStr for Facet<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(Facet::All)
        } else {
            trimmed.parse().map(Facet::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Facet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::All => write!(f, "all"),
            Facet::Only(value) => write!(f, "{}", value),
        }
    }
}

/// `all`, or the value in its own serialized form (priorities stay lowercase).
impl<T: Serialize> Serialize for Facet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Facet::All => serializer.serialize_str("all"),
            Facet::Only(value) => value.serialize(serializer),
        }
    }
}

/// The active set of recommendation filters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterState {
    pub priority: Facet<Priority>,
    pub category: Facet<String>,
    pub difficulty: Facet<String>,
}

impl FilterState {
    /// Returns true if the recommendation passes all three facets.
    pub fn matches(&self, rec: &Recommendation) -> bool {
        self.priority.matches(&rec.priority)
            && self.category.matches(&rec.category)
            && self.difficulty.matches(&rec.difficulty)
    }

    /// Applies a partial update, keeping fields the update leaves unset.
    pub fn apply(&mut self, update: FilterUpdate) {
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(difficulty) = update.difficulty {
            self.difficulty = difficulty;
        }
    }

    /// Returns true if no facet restricts anything.
    pub fn is_unfiltered(&self) -> bool {
        self.priority.is_all() && self.category.is_all() && self.difficulty.is_all()
    }
}

/// A partial [`FilterState`]; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub priority: Option<Facet<Priority>>,
    pub category: Option<Facet<String>>,
    pub difficulty: Option<Facet<String>>,
}

impl FilterUpdate {
    /// Builds an update from optional filter strings (CLI or config values).
    pub fn parse(
        priority: Option<&str>,
        category: Option<&str>,
        difficulty: Option<&str>,
    ) -> Result<Self, ParsePriorityError> {
        let priority = priority.map(str::parse::<Facet<Priority>>).transpose()?;
        let category = category.map(parse_infallible);
        let difficulty = difficulty.map(parse_infallible);

        Ok(Self {
            priority,
            category,
            difficulty,
        })
    }
}

fn parse_infallible(s: &str) -> Facet<String> {
    match s.parse::<Facet<String>>() {
        Ok(facet) => facet,
        Err(never) => match never {},
    }
}

/// Provenance block the workflow engine attaches to each step output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mock_data: Option<bool>,
}

impl ApiInfo {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            model: obj.get("model").and_then(Value::as_str).map(String::from),
            version: obj.get("version").and_then(Value::as_str).map(String::from),
            mock_data: obj.get("mock_data").and_then(Value::as_bool),
        })
    }
}

/// One stage's output as found in the result document.
///
/// The shape is not enforced: fields with the wrong type are treated as
/// absent. Recommendation entries are kept raw so the aggregator can decide
/// per entry what is usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepRecord {
    pub analysis: Option<String>,
    pub recommendations: Vec<Value>,
    pub reasoning: Option<String>,
    pub api_info: Option<ApiInfo>,
}

impl StepRecord {
    /// Reads a step record from any JSON value. Non-objects yield an empty record.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        Self {
            analysis: obj.get("analysis").and_then(Value::as_str).map(String::from),
            recommendations: obj
                .get("recommendations")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            reasoning: obj.get("reasoning").and_then(Value::as_str).map(String::from),
            api_info: obj.get("_api_info").and_then(ApiInfo::from_value),
        }
    }
}

/// A step record together with the key it was found under.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub key: String,
    pub record: StepRecord,
}

impl Step {
    /// Human-readable step name: `output_keyword_research` -> `keyword research`.
    pub fn label(&self) -> String {
        let name = self.key.strip_prefix("output_").unwrap_or(&self.key);
        humanize(name)
    }
}

/// Replaces underscores with spaces.
pub fn humanize(name: &str) -> String {
    name.replace('_', " ")
}

/// One entry of the engine's execution log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionLogEntry {
    pub agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_seconds: Option<f64>,
}

/// The `execution_summary` block, parsed field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_steps_executed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_execution_time_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_step_time_seconds: Option<f64>,
    pub execution_log: Vec<ExecutionLogEntry>,
}

impl ExecutionSummary {
    /// Reads the execution summary from a result document. Missing or
    /// mistyped fields become `None`; log entries without an agent are dropped.
    pub fn from_result(raw: &Value) -> Self {
        let Some(obj) = raw.get("execution_summary").and_then(Value::as_object) else {
            return Self::default();
        };

        let execution_log = obj
            .get("execution_log")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let agent = entry.get("agent").and_then(Value::as_str)?;
                        Some(ExecutionLogEntry {
                            agent: agent.to_string(),
                            timestamp: entry
                                .get("timestamp")
                                .and_then(Value::as_str)
                                .map(String::from),
                            execution_time_seconds: entry
                                .get("execution_time_seconds")
                                .and_then(Value::as_f64),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            total_steps_executed: obj.get("total_steps_executed").and_then(Value::as_u64),
            total_execution_time_seconds: obj
                .get("total_execution_time_seconds")
                .and_then(Value::as_f64),
            average_step_time_seconds: obj
                .get("average_step_time_seconds")
                .and_then(Value::as_f64),
            execution_log,
        }
    }
}

/// Descriptive fields of the analyzed subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_mode: Option<String>,
}

impl ResultMetadata {
    /// Reads the descriptive fields. Blank strings count as absent;
    /// keyword arrays are joined with commas.
    pub fn from_result(raw: &Value) -> Self {
        let text = |key: &str| {
            raw.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let target_keywords = match raw.get("target_keywords") {
            Some(Value::Array(items)) => {
                let joined = items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                (!joined.is_empty()).then_some(joined)
            }
            _ => text("target_keywords"),
        };

        Self {
            workflow_type: text("workflow_type"),
            workflow_description: text("workflow_description"),
            website_url: text("website_url"),
            target_keywords,
            industry: text("industry"),
            api_mode: text("api_mode"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::Low);
    }

    #[test]
    fn test_priority_from_loose() {
        assert_eq!(Priority::from_loose(Some(&json!("HIGH"))), Priority::High);
        assert_eq!(Priority::from_loose(Some(&json!(" low "))), Priority::Low);
        assert_eq!(Priority::from_loose(Some(&json!("urgent"))), Priority::Medium);
        assert_eq!(Priority::from_loose(Some(&json!(3))), Priority::Medium);
        assert_eq!(Priority::from_loose(None), Priority::Medium);
    }

    #[test]
    fn test_facet_parse() {
        assert_eq!("all".parse::<Facet<Priority>>(), Ok(Facet::All));
        assert_eq!("ALL".parse::<Facet<String>>(), Ok(Facet::All));
        assert_eq!(
            "high".parse::<Facet<Priority>>(),
            Ok(Facet::Only(Priority::High))
        );
        assert!("urgent".parse::<Facet<Priority>>().is_err());
        assert_eq!(
            "technical".parse::<Facet<String>>(),
            Ok(Facet::Only("technical".to_string()))
        );
    }

    #[test]
    fn test_filter_state_apply_keeps_unset_fields() {
        let mut filter = FilterState {
            priority: Facet::Only(Priority::High),
            category: Facet::Only("content".to_string()),
            difficulty: Facet::All,
        };

        filter.apply(FilterUpdate {
            category: Some(Facet::All),
            ..Default::default()
        });

        assert_eq!(filter.priority, Facet::Only(Priority::High));
        assert_eq!(filter.category, Facet::All);
        assert_eq!(filter.difficulty, Facet::All);
    }

    #[test]
    fn test_filter_update_parse() {
        let update = FilterUpdate::parse(Some("low"), None, Some("easy")).unwrap();
        assert_eq!(update.priority, Some(Facet::Only(Priority::Low)));
        assert_eq!(update.category, None);
        assert_eq!(update.difficulty, Some(Facet::Only("easy".to_string())));

        assert!(FilterUpdate::parse(Some("critical"), None, None).is_err());
    }

    #[test]
    fn test_filter_state_serializes_as_strings() {
        let filter = FilterState {
            priority: Facet::Only(Priority::High),
            ..Default::default()
        };
        let value = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            value,
            json!({"priority": "high", "category": "all", "difficulty": "all"})
        );

        let rec = Recommendation::from_text("Fix title tags", "output_a");
        let rec_value = serde_json::to_value(Recommendation {
            priority: Priority::High,
            ..rec
        })
        .unwrap();
        assert_eq!(rec_value["priority"], value["priority"]);
    }

    #[test]
    fn test_step_record_tolerates_wrong_types() {
        let record = StepRecord::from_value(&json!({
            "analysis": 42,
            "recommendations": "not a list",
            "reasoning": "Because.",
            "_api_info": {"model": "m", "mock_data": true}
        }));

        assert_eq!(record.analysis, None);
        assert!(record.recommendations.is_empty());
        assert_eq!(record.reasoning.as_deref(), Some("Because."));
        assert_eq!(record.api_info.and_then(|i| i.mock_data), Some(true));

        assert_eq!(StepRecord::from_value(&json!("text")), StepRecord::default());
    }

    #[test]
    fn test_step_label() {
        let step = Step {
            key: "output_content_gap_analysis".to_string(),
            record: StepRecord::default(),
        };
        assert_eq!(step.label(), "content gap analysis");
    }

    #[test]
    fn test_execution_summary_parsing() {
        let raw = json!({
            "execution_summary": {
                "total_steps_executed": 2,
                "total_execution_time_seconds": 3.5,
                "average_step_time_seconds": "fast",
                "execution_log": [
                    {"agent": "technical_seo", "execution_time_seconds": 1.25},
                    {"execution_time_seconds": 2.0}
                ]
            }
        });

        let summary = ExecutionSummary::from_result(&raw);
        assert_eq!(summary.total_steps_executed, Some(2));
        assert_eq!(summary.total_execution_time_seconds, Some(3.5));
        assert_eq!(summary.average_step_time_seconds, None);
        assert_eq!(summary.execution_log.len(), 1);
        assert_eq!(summary.execution_log[0].agent, "technical_seo");

        assert_eq!(
            ExecutionSummary::from_result(&json!([])),
            ExecutionSummary::default()
        );
    }

    #[test]
    fn test_result_metadata() {
        let meta = ResultMetadata::from_result(&json!({
            "workflow_type": "technical_audit",
            "website_url": "  ",
            "target_keywords": ["seo", " rust "],
            "industry": "Technology"
        }));

        assert_eq!(meta.workflow_type.as_deref(), Some("technical_audit"));
        assert_eq!(meta.website_url, None);
        assert_eq!(meta.target_keywords.as_deref(), Some("seo, rust"));
        assert_eq!(meta.industry.as_deref(), Some("Technology"));
    }
}
