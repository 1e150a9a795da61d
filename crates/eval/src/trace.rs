//! Evaluation trace for explaining visibility decisions.
//!
//! Each visited node records where it sits in the tree, its inline
//! result, and its final result. Nodes skipped by short-circuiting are
//! absent from the trace.

use serde::Serialize;

/// Record for a single visited condition node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeTrace {
    /// Location in the tree, e.g. `$.children[1]`.
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Result of the node's own path/values check.
    pub inline: bool,
    /// Inline result combined with the children result.
    pub result: bool,
}

/// Ordered node records of one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvalTrace {
    pub nodes: Vec<NodeTrace>,
}

impl EvalTrace {
    pub fn get(&self, location: &str) -> Option<&NodeTrace> {
        self.nodes.iter().find(|n| n.location == location)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.nodes).unwrap_or(serde_json::Value::Null)
    }
}

/// Collector threaded through evaluation. A disabled collector records
/// nothing and never allocates locations.
#[derive(Debug, Clone)]
pub struct TraceCollector {
    enabled: bool,
    nodes: Vec<NodeTrace>,
}

impl TraceCollector {
    pub fn new() -> Self {
        TraceCollector {
            enabled: true,
            nodes: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        TraceCollector {
            enabled: false,
            nodes: Vec::new(),
        }
    }

    /// Location of the `index`-th child of the node at `parent`.
    pub fn child_location(&self, parent: &str, index: usize) -> String {
        if self.enabled {
            format!("{}.children[{}]", parent, index)
        } else {
            String::new()
        }
    }

    /// Record a node after its inline check. Returns a handle used to
    /// fill in the final result.
    pub fn record(&mut self, location: &str, path: Option<&str>, inline: bool) -> Option<usize> {
        if !self.enabled {
            return None;
        }
        self.nodes.push(NodeTrace {
            location: location.to_string(),
            path: path.map(str::to_owned),
            inline,
            result: inline,
        });
        Some(self.nodes.len() - 1)
    }

    pub fn finish(&mut self, handle: Option<usize>, result: bool) {
        if let Some(node) = handle.and_then(|i| self.nodes.get_mut(i)) {
            node.result = result;
        }
    }

    pub fn into_trace(self) -> EvalTrace {
        EvalTrace { nodes: self.nodes }
    }
}

/// Untraced, like [`TraceCollector::disabled`].
impl Default for TraceCollector {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_records_nodes() {
        let mut c = TraceCollector::new();
        let root = c.record("$", Some("a"), true);
        let child = c.child_location("$", 0);
        let h = c.record(&child, None, false);
        c.finish(h, false);
        c.finish(root, false);
        let trace = c.into_trace();
        assert_eq!(trace.nodes.len(), 2);
        assert_eq!(trace.nodes[1].location, "$.children[0]");
        assert!(trace.get("$").unwrap().inline);
        assert!(!trace.get("$").unwrap().result);
    }

    #[test]
    fn disabled_collector_records_nothing() {
        let mut c = TraceCollector::disabled();
        let h = c.record("$", Some("a"), true);
        assert_eq!(h, None);
        assert_eq!(c.child_location("$", 3), "");
        assert!(c.into_trace().nodes.is_empty());
    }

    #[test]
    fn default_collector_is_disabled() {
        let mut c = TraceCollector::default();
        assert_eq!(c.record("$", None, true), None);
        assert!(c.into_trace().nodes.is_empty());
    }

    #[test]
    fn trace_json_skips_missing_path() {
        let mut c = TraceCollector::new();
        c.record("$", None, true);
        let json = c.into_trace().to_json();
        assert_eq!(
            json,
            serde_json::json!([{ "location": "$", "inline": true, "result": true }])
        );
    }
}
