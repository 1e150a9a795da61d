use std::path::Path;
use std::process;

use crate::{load_json, report_error, OutputFormat};

pub(crate) fn cmd_batch(
    set_path: &Path,
    properties_path: Option<&Path>,
    output: OutputFormat,
    quiet: bool,
) {
    let doc = load_json(set_path, "condition set", output, quiet);
    let properties = properties_path.map(|p| load_json(p, "properties", output, quiet));

    let set = match showwhen_interchange::condition_set_from_json(&doc) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error: invalid condition set '{}': {}", set_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let map = showwhen_eval::evaluate_set(&set, properties.as_ref());
    log::debug!(
        "evaluated {} widget condition(s), {} rendered",
        set.len(),
        map.rendered().len()
    );

    if !quiet {
        match output {
            OutputFormat::Text => {
                for (widget_id, decision) in &map.0 {
                    match decision {
                        Ok(render) => println!("{}: {}", widget_id, render),
                        Err(e) => println!("{}: error: {}", widget_id, e),
                    }
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&map.to_json()).unwrap_or_default()
                );
            }
        }
    }

    if map.has_errors() {
        process::exit(1);
    }
}
