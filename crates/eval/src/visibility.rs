//! Per-widget visibility for a whole form.

use std::collections::BTreeMap;

use serde_json::Value;
use showwhen_interchange::ConditionSet;

use crate::error::EvalError;

/// Decision for every widget of a [`ConditionSet`].
///
/// A coercion error aborts evaluation of that widget only; its entry
/// carries the error rather than a fallback decision.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityMap(pub BTreeMap<String, Result<bool, EvalError>>);

impl VisibilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, widget_id: String, decision: Result<bool, EvalError>) {
        self.0.insert(widget_id, decision);
    }

    pub fn get(&self, widget_id: &str) -> Option<&Result<bool, EvalError>> {
        self.0.get(widget_id)
    }

    /// Ids of the widgets that should render.
    pub fn rendered(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, d)| matches!(d, Ok(true)))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        self.0.values().any(|d| d.is_err())
    }

    /// `{ "<widget>": true | false | {"error": ..., "value": ...} }`
    pub fn to_json(&self) -> Value {
        let map: serde_json::Map<String, Value> = self
            .0
            .iter()
            .map(|(id, decision)| {
                let v = match decision {
                    Ok(b) => Value::Bool(*b),
                    Err(e) => e.to_json_value(),
                };
                (id.clone(), v)
            })
            .collect();
        Value::Object(map)
    }
}

/// Evaluate every condition of `set` against the same property bag.
pub fn evaluate_set(set: &ConditionSet, properties: Option<&Value>) -> VisibilityMap {
    let mut map = VisibilityMap::new();
    for (widget_id, condition) in &set.conditions {
        let decision = crate::should_render(condition.as_ref(), properties);
        if let Err(ref e) = decision {
            log::warn!("condition for widget '{}' aborted: {}", widget_id, e);
        }
        map.insert(widget_id.clone(), decision);
    }
    map
}
