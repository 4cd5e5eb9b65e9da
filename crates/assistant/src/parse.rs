//! Turning free-form model output into risks and actions.
//!
//! Models are asked for a bare JSON array but often wrap it in prose or code
//! fences, so the outermost `[ ... ]` span is extracted first. Entries that
//! cannot form a valid risk or action are dropped; numeric fields are
//! clamped into range.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use ripd_core::action::{ActionStatus, NewAction, DEFAULT_PRIORITY, MAX_PRIORITY, MIN_PRIORITY};
use ripd_core::normalize::{loose_date, loose_int, loose_string};
use ripd_core::risk::{NewRisk, MAX_FACTOR, MIN_FACTOR};

use crate::error::GenerationError;

/// Outermost bracketed span, across newlines.
static JSON_ARRAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid regex"));

/// Source used when the model omits one.
pub const UNKNOWN_SOURCE: &str = "Não especificada";

/// Extract and decode the JSON array in `text`.
pub fn extract_json_array(text: &str) -> Result<Vec<Value>, GenerationError> {
    let candidate = JSON_ARRAY_RE
        .find(text)
        .map(|m| m.as_str())
        .ok_or(GenerationError::NoJsonArray)?;
    match serde_json::from_str::<Value>(candidate)? {
        Value::Array(items) => Ok(items),
        _ => Err(GenerationError::NoJsonArray),
    }
}

fn clamp_to(value: i64, min: u8, max: u8) -> u8 {
    value.clamp(i64::from(min), i64::from(max)) as u8
}

fn risk_from_value(value: &Value) -> Option<NewRisk> {
    let description = loose_string(&value["description"])?;
    let impact = loose_int(&value["impact"])?;
    let probability = loose_int(&value["probability"])?;
    Some(NewRisk {
        description,
        source: loose_string(&value["source"]).unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
        impact: clamp_to(impact, MIN_FACTOR, MAX_FACTOR),
        probability: clamp_to(probability, MIN_FACTOR, MAX_FACTOR),
        mitigation: loose_string(&value["mitigation"]),
    })
}

fn action_from_value(value: &Value, default_deadline: Option<NaiveDate>) -> Option<NewAction> {
    let measure = loose_string(&value["measure"])?;
    let priority = loose_int(&value["priority"]).unwrap_or(i64::from(DEFAULT_PRIORITY));
    Some(NewAction {
        measure,
        description: loose_string(&value["description"]),
        responsible: loose_string(&value["responsible"]),
        deadline: loose_date(&value["deadline"]).or(default_deadline),
        priority: clamp_to(priority, MIN_PRIORITY, MAX_PRIORITY),
        status: ActionStatus::Pending,
    })
}

/// Parse model output into risks. Fails when nothing usable remains.
pub fn parse_risks(text: &str) -> Result<Vec<NewRisk>, GenerationError> {
    let risks: Vec<NewRisk> = extract_json_array(text)?
        .iter()
        .filter_map(risk_from_value)
        .collect();
    if risks.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(risks)
}

/// Parse model output into PENDING actions.
///
/// Model-provided ISO deadlines are kept; otherwise `default_deadline` is
/// used.
pub fn parse_actions(
    text: &str,
    default_deadline: Option<NaiveDate>,
) -> Result<Vec<NewAction>, GenerationError> {
    let actions: Vec<NewAction> = extract_json_array(text)?
        .iter()
        .filter_map(|value| action_from_value(value, default_deadline))
        .collect();
    if actions.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(actions)
}
