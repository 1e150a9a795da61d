//! Deserialization from condition JSON documents into typed structs.
//!
//! Single conditions are parsed leniently: a malformed field degrades to
//! "no constraint" instead of failing, so hand-authored conditions stay
//! forgiving. Only the top-level shape of a [`ConditionSet`] document can
//! produce an [`InterchangeError`].

use crate::types::*;
use std::fmt;

/// Errors during condition document deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterchangeError {
    /// The document is missing a required top-level field.
    MissingField { field: String },
    /// The document structure is invalid.
    InvalidDocument(String),
}

impl fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterchangeError::MissingField { field } => {
                write!(f, "document missing required field: '{}'", field)
            }
            InterchangeError::InvalidDocument(msg) => {
                write!(f, "invalid document: {}", msg)
            }
        }
    }
}

impl std::error::Error for InterchangeError {}

/// Deserialize an optional condition.
///
/// `null`, `false` and other falsy scalars mean "no condition"; any other
/// value is parsed with [`parse_condition`].
pub fn from_json(value: &serde_json::Value) -> Option<Condition> {
    match value {
        serde_json::Value::Null | serde_json::Value::Bool(false) => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(parse_condition(other)),
    }
}

/// Parse a single condition node and its subtree.
///
/// Non-object input yields the vacuous condition.
pub fn parse_condition(obj: &serde_json::Value) -> Condition {
    if !obj.is_object() {
        return Condition::default();
    }

    let path = parse_path(obj.get("path"));

    let values = obj
        .get("values")
        .and_then(|v| v.as_array())
        .map(|arr| arr.to_vec());

    let should_be = !matches!(obj.get("shouldBe"), Some(serde_json::Value::Bool(false)));

    let strategy = obj
        .get("strategy")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    let children = obj
        .get("children")
        .and_then(|c| c.as_array())
        .map(|arr| arr.iter().map(parse_condition).collect())
        .unwrap_or_default();

    let children_operator = obj
        .get("childrenOperator")
        .and_then(|v| v.as_str())
        .map(ChildrenOperator::from_name)
        .unwrap_or_default();

    Condition {
        path,
        values,
        should_be,
        strategy,
        children,
        children_operator,
    }
}

/// Deserialize a `{"conditions": {"<widget>": <condition>}}` document.
pub fn condition_set_from_json(doc: &serde_json::Value) -> Result<ConditionSet, InterchangeError> {
    if !doc.is_object() {
        return Err(InterchangeError::InvalidDocument(
            "condition set must be a JSON object".to_string(),
        ));
    }

    let entries = doc
        .get("conditions")
        .and_then(|c| c.as_object())
        .ok_or_else(|| InterchangeError::MissingField {
            field: "conditions".to_string(),
        })?;

    let mut set = ConditionSet::new();
    for (widget_id, value) in entries {
        set.insert(widget_id.clone(), from_json(value));
    }
    Ok(set)
}

// ── Parsing helpers ─────────────────────────────────────────────────

fn parse_path(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                (i != 0).then(|| i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().filter(|f| *f != 0.0).map(|f| f.to_string())
            }
        }
        _ => None,
    }
}
