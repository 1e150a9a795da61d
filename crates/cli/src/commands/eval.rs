use std::path::Path;
use std::process;

use serde_json::Value;

use crate::{load_json, OutputFormat};

pub(crate) fn cmd_eval(
    condition_path: &Path,
    properties_path: Option<&Path>,
    explain: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let condition_doc = load_json(condition_path, "condition", output, quiet);
    let properties = properties_path.map(|p| load_json(p, "properties", output, quiet));
    let condition = showwhen_interchange::from_json(&condition_doc);

    let result = if explain {
        showwhen_eval::should_render_traced(condition.as_ref(), properties.as_ref())
            .map(|d| (d.render, Some(d.trace)))
    } else {
        showwhen_eval::should_render(condition.as_ref(), properties.as_ref()).map(|r| (r, None))
    };

    match result {
        Ok((render, trace)) => {
            if quiet {
                return;
            }
            match output {
                OutputFormat::Text => {
                    println!("{}", render);
                    if let Some(trace) = trace {
                        for node in &trace.nodes {
                            println!(
                                "  {} path={} inline={} result={}",
                                node.location,
                                node.path.as_deref().unwrap_or("-"),
                                node.inline,
                                node.result
                            );
                        }
                    }
                }
                OutputFormat::Json => {
                    let mut out = serde_json::Map::new();
                    out.insert("render".to_string(), Value::Bool(render));
                    if let Some(trace) = trace {
                        out.insert("trace".to_string(), trace.to_json());
                    }
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&Value::Object(out)).unwrap_or_default()
                    );
                }
            }
        }
        Err(e) => {
            if !quiet {
                match output {
                    OutputFormat::Text => eprintln!("error: {}", e),
                    OutputFormat::Json => eprintln!(
                        "{}",
                        serde_json::to_string_pretty(&e.to_json_value()).unwrap_or_default()
                    ),
                }
            }
            process::exit(1);
        }
    }
}
