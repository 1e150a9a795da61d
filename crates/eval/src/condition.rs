//! Condition tree evaluator.
//!
//! A node passes when its inline check passes and its children, combined
//! with the node's children operator, pass. Evaluation short-circuits: a
//! failing inline check skips the children entirely, AND stops at the
//! first failing child and OR at the first passing one.

use serde_json::Value;
use showwhen_interchange::{ChildrenOperator, Condition};

use crate::error::EvalError;
use crate::path;
use crate::strategy::Strategy;
use crate::trace::TraceCollector;

/// Location of the root node in traces.
pub const ROOT: &str = "$";

/// Evaluate a node's own path/values/strategy check, ignoring children.
///
/// Without both `path` and `values` the node imposes no constraint.
pub fn evaluate_inline(
    condition: &Condition,
    properties: Option<&Value>,
) -> Result<bool, EvalError> {
    let (Some(path), Some(values)) = (&condition.path, &condition.values) else {
        return Ok(true);
    };

    let value = path::resolve(properties, path);
    let strategy = Strategy::resolve(condition.strategy.as_deref());
    let comparator = strategy.comparator(value.as_deref());

    let mut matched = false;
    for candidate in values {
        if comparator.matches(candidate)? {
            matched = true;
            break;
        }
    }

    let result = condition.should_be == matched;
    log::trace!(
        "inline check on '{}' ({:?}): matched={} should_be={} -> {}",
        path,
        strategy,
        matched,
        condition.should_be,
        result
    );
    Ok(result)
}

/// Combine the children of a node with its operator. No children passes.
pub fn evaluate_children(
    condition: &Condition,
    properties: Option<&Value>,
    location: &str,
    collector: &mut TraceCollector,
) -> Result<bool, EvalError> {
    if condition.children.is_empty() {
        return Ok(true);
    }

    for (i, child) in condition.children.iter().enumerate() {
        let child_location = collector.child_location(location, i);
        let passed = evaluate_node(child, properties, &child_location, collector)?;
        match (condition.children_operator, passed) {
            (ChildrenOperator::And, false) | (ChildrenOperator::Or, true) => {
                log::debug!(
                    "{} short-circuit at child {}; {} sibling(s) skipped",
                    condition.children_operator.as_str(),
                    i,
                    condition.children.len() - i - 1
                );
                return Ok(passed);
            }
            _ => {}
        }
    }

    Ok(condition.children_operator == ChildrenOperator::And)
}

/// Evaluate a node and its subtree: inline check first, then children.
pub fn evaluate_node(
    condition: &Condition,
    properties: Option<&Value>,
    location: &str,
    collector: &mut TraceCollector,
) -> Result<bool, EvalError> {
    let inline = evaluate_inline(condition, properties)?;
    let handle = collector.record(location, condition.path.as_deref(), inline);
    if !inline {
        if !condition.children.is_empty() {
            log::debug!(
                "inline check failed on '{}'; {} child condition(s) not evaluated",
                condition.path.as_deref().unwrap_or(""),
                condition.children.len()
            );
        }
        return Ok(false);
    }

    let result = evaluate_children(condition, properties, location, collector)?;
    collector.finish(handle, result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval(condition: &Condition, properties: &Value) -> Result<bool, EvalError> {
        let mut collector = TraceCollector::disabled();
        evaluate_node(condition, Some(properties), ROOT, &mut collector)
    }

    fn failing_child() -> Condition {
        Condition::matching("list", vec![json!({})]).with_strategy("length")
    }

    #[test]
    fn vacuous_inline() {
        let props = json!({ "a": 1 });
        assert!(evaluate_inline(&Condition::default(), Some(&props)).unwrap());
        let path_only = Condition {
            path: Some("a".to_string()),
            ..Condition::default()
        };
        assert!(evaluate_inline(&path_only, Some(&props)).unwrap());
        let values_only = Condition {
            values: Some(vec![json!(2)]),
            ..Condition::default()
        };
        assert!(evaluate_inline(&values_only, Some(&props)).unwrap());
    }

    #[test]
    fn empty_values_never_match() {
        let props = json!({ "a": 1 });
        let c = Condition::matching("a", vec![]);
        assert!(!evaluate_inline(&c, Some(&props)).unwrap());
        assert!(evaluate_inline(&c.with_should_be(false), Some(&props)).unwrap());
    }

    #[test]
    fn inline_equality_and_inversion() {
        let c = Condition::matching("a.b", vec![json!("x"), json!("y")]);
        assert!(eval(&c, &json!({ "a": { "b": "x" } })).unwrap());
        assert!(eval(&c, &json!({ "a": { "b": "y" } })).unwrap());
        assert!(!eval(&c, &json!({ "a": { "b": "z" } })).unwrap());

        let inverted = c.with_should_be(false);
        assert!(!eval(&inverted, &json!({ "a": { "b": "x" } })).unwrap());
        assert!(eval(&inverted, &json!({ "a": { "b": "z" } })).unwrap());
        assert!(eval(&inverted, &json!({})).unwrap());
    }

    #[test]
    fn candidates_stop_at_first_match() {
        let props = json!({ "list": [1, 2] });
        let c = Condition::matching("list", vec![json!(2), json!({})]).with_strategy("length");
        assert!(eval(&c, &props).unwrap());
    }

    #[test]
    fn failing_root_skips_children() {
        let props = json!({ "a": "no", "list": [1] });
        let c = Condition::matching("a", vec![json!("yes")])
            .with_children(ChildrenOperator::And, vec![failing_child()]);
        assert!(!eval(&c, &props).unwrap());
    }

    #[test]
    fn passing_root_reaches_children() {
        let props = json!({ "a": "yes", "list": [1] });
        let c = Condition::matching("a", vec![json!("yes")])
            .with_children(ChildrenOperator::And, vec![failing_child()]);
        assert!(matches!(eval(&c, &props), Err(EvalError::Coercion { .. })));
    }

    #[test]
    fn and_short_circuits_on_first_failure() {
        let props = json!({ "a": 1, "list": [1] });
        let c = Condition::default().with_children(
            ChildrenOperator::And,
            vec![Condition::matching("a", vec![json!(2)]), failing_child()],
        );
        assert!(!eval(&c, &props).unwrap());
    }

    #[test]
    fn or_short_circuits_on_first_success() {
        let props = json!({ "a": 1, "list": [1] });
        let c = Condition::default().with_children(
            ChildrenOperator::Or,
            vec![Condition::matching("a", vec![json!(1)]), failing_child()],
        );
        assert!(eval(&c, &props).unwrap());
    }

    #[test]
    fn or_and_and_combinations() {
        let props = json!({ "a": 1 });
        let pass = Condition::matching("a", vec![json!(1)]);
        let fail = Condition::matching("a", vec![json!(2)]);

        for children in [
            vec![pass.clone(), fail.clone()],
            vec![fail.clone(), pass.clone()],
        ] {
            let or = Condition::default().with_children(ChildrenOperator::Or, children.clone());
            assert!(eval(&or, &props).unwrap());
            let and = Condition::default().with_children(ChildrenOperator::And, children);
            assert!(!eval(&and, &props).unwrap());
        }

        let all_fail = Condition::default()
            .with_children(ChildrenOperator::Or, vec![fail.clone(), fail.clone()]);
        assert!(!eval(&all_fail, &props).unwrap());
    }

    #[test]
    fn nested_children_apply_both_phases() {
        let props = json!({ "a": 1, "b": 2 });
        // The child passes inline but its own child fails.
        let child = Condition::matching("a", vec![json!(1)]).with_children(
            ChildrenOperator::And,
            vec![Condition::matching("b", vec![json!(3)])],
        );
        let c = Condition::default().with_children(ChildrenOperator::And, vec![child]);
        assert!(!eval(&c, &props).unwrap());
    }

    #[test]
    fn trace_records_visited_nodes_only() {
        let props = json!({ "a": 1 });
        let c = Condition::default().with_children(
            ChildrenOperator::And,
            vec![
                Condition::matching("a", vec![json!(2)]),
                Condition::matching("a", vec![json!(1)]),
            ],
        );
        let mut collector = TraceCollector::new();
        let result = evaluate_node(&c, Some(&props), ROOT, &mut collector).unwrap();
        assert!(!result);
        let trace = collector.into_trace();
        assert_eq!(trace.nodes.len(), 2);
        assert!(!trace.get("$").unwrap().result);
        assert!(!trace.get("$.children[0]").unwrap().inline);
        assert!(trace.get("$.children[1]").is_none());
    }
}
