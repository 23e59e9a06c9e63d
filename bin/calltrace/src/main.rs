//! Call Trace Studio CLI
//!
//! Rebuilds call trees from timestamped call traces and produces reports,
//! flamegraphs and terminal summaries.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;
use std::path::PathBuf;

use calltrace_studio::commands::{
    display_schema, display_version, execute_analyze, execute_inspect, validate_args,
    validate_report_file, AnalyzeArgs, InspectArgs,
};
use calltrace_studio::flamegraph::FlamegraphConfig;
use calltrace_studio::utils::{load_settings, Settings};

/// Call Trace Studio - call tree reconstruction for timestamped traces
#[derive(Parser, Debug)]
#[command(name = "calltrace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (TOML); command line flags take precedence
    #[arg(short, long, global = true, env = "CALLTRACE_CONFIG")]
    config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Rebuild a trace and write a report
    Analyze {
        /// Trace file to analyze
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for JSON report (placed in artifacts/ by default)
        #[arg(short, long, default_value = "artifacts/report.json")]
        output: PathBuf,

        /// Output path for SVG flamegraph (placed in artifacts/ by default)
        #[arg(short, long, default_missing_value = "artifacts/flamegraph.svg", num_args = 0..=1)]
        flamegraph: Option<PathBuf>,

        /// Number of top hot paths to include
        #[arg(long)]
        top_paths: Option<usize>,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Flamegraph width in pixels
        #[arg(long)]
        width: Option<usize>,

        /// Keep restarted threads separate
        #[arg(long)]
        no_merge: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Print the rebuilt threads of a trace
    Inspect {
        /// Trace file to inspect
        #[arg(short, long)]
        input: PathBuf,

        /// Print each thread's call tree
        #[arg(long)]
        calls: bool,

        /// Deepest level printed with --calls
        #[arg(long, default_value = "8")]
        max_depth: usize,

        /// Keep restarted threads separate
        #[arg(long)]
        no_merge: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let settings = match &cli.config {
        Some(path) => load_settings(path)
            .with_context(|| format!("Failed to load settings {}", path.display()))?,
        None => Settings::default(),
    };
    debug!("Settings: {:?}", settings);

    // Execute command
    match cli.command {
        Commands::Analyze {
            input,
            mut output,
            mut flamegraph,
            top_paths,
            title,
            width,
            no_merge,
            summary,
        } => {
            // Ensure outputs go to artifacts/ if no directory is specified
            let artifacts_dir = PathBuf::from("artifacts");

            if output.parent().map(|p| p.as_os_str().is_empty()).unwrap_or(true) {
                output = artifacts_dir.join(output);
            }

            if let Some(ref mut fg) = flamegraph {
                if fg.parent().map(|p| p.as_os_str().is_empty()).unwrap_or(true) {
                    *fg = artifacts_dir.join(&fg);
                }
            }

            let mut fg_config = FlamegraphConfig::from(&settings.flamegraph);
            if let Some(title_str) = title {
                fg_config = fg_config.with_title(title_str);
            }
            if let Some(width) = width {
                fg_config = fg_config.with_width(width);
            }

            let args = AnalyzeArgs {
                input,
                output_json: Some(output),
                output_svg: flamegraph,
                top_paths: top_paths.unwrap_or(settings.analysis.top_paths),
                merge_threads: settings.analysis.merge_restarted_threads && !no_merge,
                flamegraph_config: fg_config,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Inspect {
            input,
            calls,
            max_depth,
            no_merge,
        } => {
            execute_inspect(InspectArgs {
                input,
                merge_threads: settings.analysis.merge_restarted_threads && !no_merge,
                show_calls: calls,
                max_depth,
            })?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
