//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads the trace into a recording
//! 2. Merges restarted threads (unless disabled)
//! 3. Builds collapsed stacks
//! 4. Calculates metrics
//! 5. Generates flamegraph
//! 6. Writes output files

use crate::aggregator::{
    build_collapsed_stacks, calculate_hot_paths, calculate_time_distribution, CollapsedStack,
};
use crate::commands::models::AnalyzeArgs;
use crate::flamegraph::{generate_flamegraph, generate_text_summary};
use crate::output::{write_report, write_svg, Report};
use crate::parser::load_recording;
use crate::recording::Recording;
use crate::utils::config::{MAX_TOP_PATHS, MIN_FLAMEGRAPH_WIDTH};
use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace file cannot be read
/// * A trace line is malformed or refers to an undeclared id
/// * File write errors
///
/// # Example
/// ```ignore
/// let args = AnalyzeArgs {
///     input: PathBuf::from("trace.txt"),
///     output_svg: Some(PathBuf::from("flamegraph.svg")),
///     ..Default::default()
/// };
///
/// let report = execute_analyze(args)?;
/// ```
pub fn execute_analyze(args: AnalyzeArgs) -> Result<Report> {
    let start_time = Instant::now();

    info!("Loading trace: {}", args.input.display());
    let mut recording = load_recording(&args.input)
        .with_context(|| format!("Failed to load trace {}", args.input.display()))?;

    if args.merge_threads {
        let absorbed = recording.merge_restarted_threads();
        info!(
            "Merged {} restarted threads ({} remain)",
            absorbed,
            recording.threads().len()
        );
    }

    info!("Building collapsed stacks...");
    let stacks = build_collapsed_stacks(&recording);
    debug!("Built {} unique stacks", stacks.len());

    let distribution = calculate_time_distribution(&stacks);
    info!("Time distribution: {}", distribution.summary());

    info!("Calculating top {} hot paths...", args.top_paths);
    let hot_paths = calculate_hot_paths(&stacks, args.top_paths);

    let report = Report::from_recording(
        &recording,
        args.input.display().to_string(),
        args.merge_threads,
        hot_paths,
    );

    write_outputs(&args, &report, &stacks)?;

    if args.print_summary {
        print_recording_summary(&recording, &report, &stacks);
    }

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(report)
}

/// Write output files (JSON report and optional SVG flamegraph).
///
/// **Private** - internal helper for execute_analyze
fn write_outputs(args: &AnalyzeArgs, report: &Report, stacks: &[CollapsedStack]) -> Result<()> {
    if let Some(json_path) = &args.output_json {
        write_report(report, json_path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", json_path.display());
    }

    if let Some(svg_path) = &args.output_svg {
        if stacks.is_empty() {
            warn!("Trace has no calls, skipping flamegraph");
            return Ok(());
        }

        info!("Generating flamegraph...");
        let svg = generate_flamegraph(stacks, Some(&args.flamegraph_config))
            .context("Failed to generate flamegraph")?;
        write_svg(&svg, svg_path).context("Failed to write flamegraph SVG")?;
        info!("✓ Flamegraph written to: {}", svg_path.display());
    }

    Ok(())
}

/// Print a human-readable recording summary to stdout.
///
/// **Private** - internal helper for execute_analyze
fn print_recording_summary(recording: &Recording, report: &Report, stacks: &[CollapsedStack]) {
    let rule = "=".repeat(78);

    println!("\n{}", rule);
    println!("  {}", "CALL TRACE SUMMARY".bold());
    println!("{}", rule);
    println!("  Source:       {}", report.source);
    println!(
        "  Window:       {} .. {}",
        format_time(report.start_time),
        format_time(report.finish_time)
    );
    println!("  Threads:      {}", report.threads.len());
    println!("  Calls:        {}", recording.call_count());
    println!("  Counters:     {}", report.counters.len());
    println!("  Unique Paths: {}", stacks.len());
    println!();

    for thread in &report.threads {
        println!(
            "  {:<24} depth {:>3}  calls {:>8}  busy {:>10}  events {:>6}",
            thread.label.cyan(),
            thread.max_stack_depth,
            thread.call_count,
            thread.busy_time,
            thread.event_count
        );
    }

    for counter in &report.counters {
        println!(
            "  {:<24} samples {:>6}  min {:>10.2}  max {:>10.2}",
            counter.label.magenta(),
            counter.samples,
            counter.min_value,
            counter.max_value
        );
    }

    if !report.hot_paths.is_empty() {
        println!();
        println!("{}", generate_text_summary(&report.hot_paths, 10));
    }
    println!("{}\n", rule);
}

pub(crate) fn format_time(time: Option<i64>) -> String {
    time.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input trace path cannot be empty");
    }

    if !args.input.is_file() {
        anyhow::bail!("Input trace not found: {}", args.input.display());
    }

    if args.top_paths == 0 {
        anyhow::bail!("top_paths must be greater than 0");
    }

    if args.top_paths > MAX_TOP_PATHS {
        anyhow::bail!("top_paths is too large (max {})", MAX_TOP_PATHS);
    }

    if args.output_svg.is_some() && args.flamegraph_config.width < MIN_FLAMEGRAPH_WIDTH {
        anyhow::bail!(
            "Flamegraph width must be at least {} pixels",
            MIN_FLAMEGRAPH_WIDTH
        );
    }

    Ok(())
}
