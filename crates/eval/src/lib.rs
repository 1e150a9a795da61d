//! showwhen condition evaluator -- decides whether a form widget renders.
//!
//! A declarative condition tree (see `showwhen-interchange`) is evaluated
//! against a property bag. Each node checks the value at its `path`
//! against its candidate `values`, optionally through a strategy such as
//! `length` or `contains`, and then combines its children with AND/OR.
//!
//! Evaluation is pure: the same inputs always produce the same decision,
//! and the only failure is a [`EvalError::Coercion`] raised when a value
//! cannot be converted for comparison.

pub mod coerce;
pub mod condition;
pub mod error;
pub mod path;
pub mod strategy;
pub mod trace;
pub mod visibility;

pub use error::EvalError;
pub use showwhen_interchange::{ChildrenOperator, Condition, ConditionSet};
pub use strategy::{Strategy, StrategyConfig};
pub use trace::{EvalTrace, NodeTrace};
pub use visibility::{evaluate_set, VisibilityMap};

use serde_json::Value;
use trace::TraceCollector;

/// A decision together with the trace explaining it.
#[derive(Debug, Clone, PartialEq)]
pub struct TracedDecision {
    pub render: bool,
    pub trace: EvalTrace,
}

/// Decide whether a widget guarded by `condition` should render.
///
/// No condition always renders. A failing root check returns `false`
/// without visiting any child.
///
/// # Arguments
/// * `condition` - Condition tree, or `None` for an unconditional widget
/// * `properties` - Property bag paths are resolved against
pub fn should_render(
    condition: Option<&Condition>,
    properties: Option<&Value>,
) -> Result<bool, EvalError> {
    let Some(root) = condition else {
        return Ok(true);
    };
    let mut collector = TraceCollector::disabled();
    condition::evaluate_node(root, properties, condition::ROOT, &mut collector)
}

/// [`should_render`] over raw JSON. Falsy `condition` values mean no
/// condition; malformed fields degrade to "no constraint".
pub fn should_render_json(condition: &Value, properties: &Value) -> Result<bool, EvalError> {
    let parsed = showwhen_interchange::from_json(condition);
    should_render(parsed.as_ref(), Some(properties))
}

/// [`should_render`], additionally recording every visited node.
pub fn should_render_traced(
    condition: Option<&Condition>,
    properties: Option<&Value>,
) -> Result<TracedDecision, EvalError> {
    let Some(root) = condition else {
        return Ok(TracedDecision {
            render: true,
            trace: EvalTrace::default(),
        });
    };
    let mut collector = TraceCollector::new();
    let render = condition::evaluate_node(root, properties, condition::ROOT, &mut collector)?;
    Ok(TracedDecision {
        render,
        trace: collector.into_trace(),
    })
}

// ──────────────────────────────────────────────
// Integration tests
// ──────────────────────────────────────────────
