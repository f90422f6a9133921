//! Step extraction from workflow result documents.
//!
//! Different workflow-engine versions name their step outputs
//! inconsistently, so a key is classified with two ordered rules: an
//! `output_` prefix always marks a step, and otherwise any plain object
//! that is not execution bookkeeping or workflow metadata is a step too.

use crate::models::{Step, StepRecord};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Prefix the engine uses for step outputs.
pub const STEP_PREFIX: &str = "output_";

/// Prefix of execution bookkeeping keys (`execution_summary`, ...).
pub const EXECUTION_PREFIX: &str = "execution_";

/// Workflow metadata keys that are never steps, even when they hold objects.
pub const RESERVED_KEYS: [&str; 3] = ["workflow_type", "workflow_description", "workflow_steps"];

/// Scalar keys that describe the analyzed subject or the run.
const DESCRIPTIVE_KEYS: [&str; 8] = [
    "website_url",
    "target_keywords",
    "industry",
    "target_audience",
    "additional_information",
    "api_mode",
    "api_mode_reason",
    "content_type",
];

/// What a top-level key of the result document represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    /// A step output.
    Step,
    /// Workflow, execution or subject metadata.
    Metadata,
    /// Anything else; ignored.
    Unknown,
}

/// Error returned when the document cannot hold any steps at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("result document is {kind}, expected an object")]
    NotAnObject { kind: &'static str },
}

/// Classify one top-level key. Guards are checked in order; the first match wins.
pub fn classify_key(key: &str, value: &Value) -> KeyClass {
    if key.starts_with(STEP_PREFIX) {
        return KeyClass::Step;
    }

    if key.starts_with(EXECUTION_PREFIX) || RESERVED_KEYS.contains(&key) {
        return KeyClass::Metadata;
    }

    if value.is_object() {
        return KeyClass::Step;
    }

    if DESCRIPTIVE_KEYS.contains(&key) {
        KeyClass::Metadata
    } else {
        KeyClass::Unknown
    }
}

/// Extract steps in document order, or report why the document has none.
pub fn try_extract_steps(raw: &Value) -> Result<Vec<Step>, ExtractError> {
    let obj = raw.as_object().ok_or(ExtractError::NotAnObject {
        kind: value_kind(raw),
    })?;

    let steps: Vec<Step> = obj
        .iter()
        .filter(|(key, value)| {
            let class = classify_key(key, value);
            debug!("Key '{}' classified as {:?}", key, class);
            class == KeyClass::Step
        })
        .map(|(key, value)| Step {
            key: key.clone(),
            record: StepRecord::from_value(value),
        })
        .collect();

    Ok(steps)
}

/// Extract steps in document order. Never fails; a non-object yields no steps.
pub fn extract_steps(raw: &Value) -> Vec<Step> {
    match try_extract_steps(raw) {
        Ok(steps) => steps,
        Err(e) => {
            debug!("No steps extracted: {}", e);
            Vec::new()
        }
    }
}

/// Short name of a JSON value's type, for diagnostics.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
