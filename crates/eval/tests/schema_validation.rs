//! Validates the well-formed conformance conditions against the formal
//! condition schema at docs/condition-schema.json.

use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn load_validator() -> jsonschema::Validator {
    let schema_path = workspace_root().join("docs/condition-schema.json");
    let schema_src = std::fs::read_to_string(&schema_path)
        .unwrap_or_else(|e| panic!("Failed to read schema at {}: {}", schema_path.display(), e));
    let schema_value: serde_json::Value = serde_json::from_str(&schema_src).unwrap();
    jsonschema::validator_for(&schema_value)
        .unwrap_or_else(|e| panic!("Failed to compile schema: {}", e))
}

fn read_condition(path: &Path) -> serde_json::Value {
    let json_src = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&json_src).unwrap()
}

fn collect_condition_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.to_string_lossy().ends_with(".condition.json"))
        .collect();
    paths.sort();
    paths
}

#[test]
fn validate_well_formed_conditions_against_schema() {
    let validator = load_validator();
    let conformance_root = workspace_root().join("conformance/eval");

    let mut tested = 0usize;
    let mut failures = Vec::new();

    for dir_name in &["positive", "strategy"] {
        for path in collect_condition_files(&conformance_root.join(dir_name)) {
            let instance = read_condition(&path);
            let errors: Vec<String> = validator
                .iter_errors(&instance)
                .map(|e| e.to_string())
                .collect();
            if !errors.is_empty() {
                failures.push(format!("{}: {}", path.display(), errors.join("; ")));
            }
            tested += 1;
        }
    }

    assert!(
        tested > 0,
        "No conformance condition files found -- check paths"
    );
    assert!(
        failures.is_empty(),
        "Schema validation failed for {} of {} files:\n{}",
        failures.len(),
        tested,
        failures.join("\n")
    );
}

#[test]
fn malformed_lenient_conditions_are_rejected_by_schema() {
    let validator = load_validator();
    let lenient = workspace_root().join("conformance/eval/lenient");

    for name in [
        "malformed_fields",
        "unknown_operator_is_or",
        "evaluation_strategy_key_ignored",
    ] {
        let instance = read_condition(&lenient.join(format!("{}.condition.json", name)));
        assert!(
            !validator.is_valid(&instance),
            "{} should not satisfy the schema",
            name
        );
    }
}

#[test]
fn path_and_values_are_required_together() {
    let validator = load_validator();
    assert!(validator.is_valid(&serde_json::json!({ "path": "a", "values": [1] })));
    assert!(validator.is_valid(&serde_json::json!({})));
    assert!(!validator.is_valid(&serde_json::json!({ "path": "a" })));
    assert!(!validator.is_valid(&serde_json::json!({ "values": ["x"] })));
}
