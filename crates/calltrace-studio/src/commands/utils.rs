use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

use super::analyze::format_time;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    if report.version != SCHEMA_VERSION {
        anyhow::bail!(
            "Unsupported report version {} (expected {})",
            report.version,
            SCHEMA_VERSION
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Source: {}", report.source);
    println!(
        "  Window: {} .. {}",
        format_time(report.start_time),
        format_time(report.finish_time)
    );
    println!("  Threads: {}", report.threads.len());
    println!("  Calls: {}", report.total_calls());
    println!("  Counters: {}", report.counters.len());
    println!("  Hot Paths: {}", report.hot_paths.len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Call Trace Studio Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  source: string             - Trace file the report was built from");
        println!("  start_time: number?        - First call start");
        println!("  finish_time: number?       - Last call finish received");
        println!("  merged_threads: bool       - Restarted threads were merged");
        println!("  threads: array             - Per-thread statistics");
        println!("    id, label                - Thread identity");
        println!("    max_stack_depth: number  - Deepest call stack seen");
        println!("    max_child_call_stack_depth: number - Deepest nesting below a top-level call");
        println!("    call_count: number       - Calls recorded");
        println!("    busy_time: number        - Summed top-level call durations");
        println!("  counters: array?           - Per-counter min/max/last values");
        println!("  hot_paths: array           - Top self-time execution paths");
        println!("    stack: string            - Thread;caller;...;callee");
        println!("    time: number             - Self time spent in the leaf");
        println!("    percentage: number       - Percentage of total self time");
        println!("  generated_at: string       - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Call Trace Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Rebuilds per-thread call trees from timestamped call traces.");
}
