//! Typed structs representing condition documents.
//!
//! Every optional field of a condition node carries its default
//! explicitly, so evaluators never need to re-check for absence.

use std::collections::BTreeMap;

/// How the children of a condition node are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChildrenOperator {
    /// Every child must pass.
    #[default]
    And,
    /// At least one child must pass.
    Or,
}

impl ChildrenOperator {
    /// Parse an operator name. `AND` in any case selects [`ChildrenOperator::And`],
    /// every other non-empty name selects [`ChildrenOperator::Or`].
    pub fn from_name(name: &str) -> Self {
        if name.is_empty() || name.to_uppercase() == "AND" {
            ChildrenOperator::And
        } else {
            ChildrenOperator::Or
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChildrenOperator::And => "AND",
            ChildrenOperator::Or => "OR",
        }
    }
}

/// A node of a condition tree.
///
/// The node constrains its widget only when both `path` and `values` are
/// present; otherwise the inline part is vacuously true.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Access path into the property bag (`a.b[0].c`).
    pub path: Option<String>,
    /// Candidates compared against the value found at `path`.
    pub values: Option<Vec<serde_json::Value>>,
    /// `false` inverts the match outcome.
    pub should_be: bool,
    /// Raw strategy string, e.g. `contains(lowercase=true)`.
    pub strategy: Option<String>,
    pub children: Vec<Condition>,
    pub children_operator: ChildrenOperator,
}

impl Default for Condition {
    fn default() -> Self {
        Condition {
            path: None,
            values: None,
            should_be: true,
            strategy: None,
            children: Vec::new(),
            children_operator: ChildrenOperator::And,
        }
    }
}

impl Condition {
    /// A condition constraining `path` to one of `values`.
    pub fn matching(path: impl Into<String>, values: Vec<serde_json::Value>) -> Self {
        Condition {
            path: Some(path.into()),
            values: Some(values),
            ..Condition::default()
        }
    }

    pub fn with_should_be(mut self, should_be: bool) -> Self {
        self.should_be = should_be;
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    pub fn with_children(mut self, operator: ChildrenOperator, children: Vec<Condition>) -> Self {
        self.children_operator = operator;
        self.children = children;
        self
    }

    /// True when the node's own path/values impose no constraint.
    pub fn is_inline_vacuous(&self) -> bool {
        self.path.is_none() || self.values.is_none()
    }
}

/// Conditions for every widget of a form, keyed by widget id.
///
/// A `None` entry means the widget had no condition (`null` in JSON) and
/// always renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionSet {
    pub conditions: BTreeMap<String, Option<Condition>>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, widget_id: impl Into<String>, condition: Option<Condition>) {
        self.conditions.insert(widget_id.into(), condition);
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
