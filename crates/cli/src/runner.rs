use crate::tap::Tap;
use serde_json::Value;
use std::path::{Path, PathBuf};
/// Conformance suite runner.
///
/// Convention, under `<suite>/eval/<group>/`:
///   <name>.condition.json   -- condition tree (may be null)
///   <name>.properties.json  -- property bag
///   <name>.expected.json    -- {"render": bool} or {"error": {...}}
pub const GROUPS: &[&str] = &["positive", "strategy", "lenient", "error"];

pub struct RunResult {
    pub passed: usize,
    pub failed: usize,
}

pub fn run_suite(suite_dir: &Path) -> RunResult {
    let mut tap = Tap::new();
    for group in GROUPS {
        run_group(suite_dir, group, &mut tap);
    }
    let failed = tap.failure_count();
    let passed = tap.total() - failed;
    tap.finish();
    RunResult { passed, failed }
}

fn run_group(suite_dir: &Path, group: &str, tap: &mut Tap) {
    let dir = suite_dir.join("eval").join(group);
    if !dir.exists() {
        return;
    }
    let mut entries = glob_condition_files(&dir);
    entries.sort();
    log::debug!("{} fixture(s) in {}", entries.len(), dir.display());
    for condition_path in &entries {
        let name = fixture_name(condition_path);
        let test_name = format!("{}/{}", group, name);
        match run_fixture(&dir, &name) {
            Ok(()) => tap.ok(test_name),
            Err(msg) => tap.not_ok(test_name, msg),
        }
    }
}

/// Evaluate one fixture triplet, returning a description of any mismatch.
pub fn run_fixture(dir: &Path, name: &str) -> Result<(), String> {
    let condition = read_json(&dir.join(format!("{}.condition.json", name)))?;
    let properties = read_json(&dir.join(format!("{}.properties.json", name)))?;
    let expected = read_json(&dir.join(format!("{}.expected.json", name)))?;

    let got = decision_json(&condition, &properties);
    if json_equal(&expected, &got) {
        Ok(())
    } else {
        Err(json_diff(&expected, &got))
    }
}

/// `{"render": bool}` or `{"error": {...}}` for a condition/properties pair.
pub fn decision_json(condition: &Value, properties: &Value) -> Value {
    match showwhen_eval::should_render_json(condition, properties) {
        Ok(render) => serde_json::json!({ "render": render }),
        Err(e) => serde_json::json!({ "error": e.to_json_value() }),
    }
}

fn glob_condition_files(dir: &Path) -> Vec<PathBuf> {
    let mut results = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".condition.json"))
            {
                results.push(path);
            }
        }
    }
    results
}

fn fixture_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .trim_end_matches(".condition.json")
        .to_string()
}

fn read_json(path: &Path) -> Result<Value, String> {
    let src = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&src).map_err(|e| format!("invalid JSON in {}: {}", path.display(), e))
}

/// Deep equality of two JSON values, normalizing number types.
fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(am), Value::Object(bm)) => {
            if am.len() != bm.len() {
                return false;
            }
            am.iter()
                .all(|(k, v)| bm.get(k).is_some_and(|bv| json_equal(v, bv)))
        }
        (Value::Array(av), Value::Array(bv)) => {
            av.len() == bv.len() && av.iter().zip(bv).all(|(a, b)| json_equal(a, b))
        }
        (Value::Number(an), Value::Number(bn)) => an.as_f64() == bn.as_f64(),
        _ => a == b,
    }
}

fn json_diff(expected: &Value, got: &Value) -> String {
    let exp_str = serde_json::to_string_pretty(expected).unwrap_or_default();
    let got_str = serde_json::to_string_pretty(got).unwrap_or_default();
    format!("--- expected\n{}\n+++ got\n{}", exp_str, got_str)
}
