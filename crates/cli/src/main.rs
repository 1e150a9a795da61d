mod commands;
mod runner;
mod tap;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Conditional widget visibility toolchain.
#[derive(Parser)]
#[command(
    name = "showwhen",
    version,
    about = "Conditional widget visibility toolchain"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether a single condition renders against a property bag
    Eval {
        /// Path to the condition JSON file
        condition: PathBuf,
        /// Path to the properties JSON file (omitted means no properties)
        #[arg(long)]
        properties: Option<PathBuf>,
        /// Include a per-node evaluation trace
        #[arg(long)]
        explain: bool,
    },

    /// Evaluate every widget condition of a condition set
    Batch {
        /// Path to the condition set JSON file
        set: PathBuf,
        /// Path to the properties JSON file (omitted means no properties)
        #[arg(long)]
        properties: Option<PathBuf>,
    },

    /// Validate a condition document against the formal JSON Schema
    Validate {
        /// Path to the condition JSON file
        condition: PathBuf,
    },

    /// Run the conformance test suite
    Test {
        /// Path to the conformance suite directory
        #[arg(default_value = "conformance")]
        suite_dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Eval {
            condition,
            properties,
            explain,
        } => {
            commands::eval::cmd_eval(
                &condition,
                properties.as_deref(),
                explain,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Batch { set, properties } => {
            commands::batch::cmd_batch(&set, properties.as_deref(), cli.output, cli.quiet);
        }
        Commands::Validate { condition } => {
            commands::validate::cmd_validate(&condition, cli.output, cli.quiet);
        }
        Commands::Test { suite_dir } => {
            commands::test::cmd_test(&suite_dir, cli.quiet);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Read and parse a JSON file, exiting with a reported error on failure.
pub(crate) fn load_json(
    path: &Path,
    what: &str,
    output: OutputFormat,
    quiet: bool,
) -> serde_json::Value {
    let src = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading {} file '{}': {}", what, path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    match serde_json::from_str(&src) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Report an error message to stderr, respecting output format and quiet mode.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
