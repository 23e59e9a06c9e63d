//! Inspect command implementation.
//!
//! Prints what was rebuilt from a trace without writing any files: the
//! recording window, one line per thread and, on request, each thread's
//! call tree and event timeline.

use crate::aggregator::summary::summarize_thread;
use crate::commands::analyze::format_time;
use crate::commands::models::InspectArgs;
use crate::parser::load_recording;
use crate::recording::{CallId, ThreadRecording};
use anyhow::{Context, Result};
use colored::Colorize;
use log::info;

/// Execute the inspect command
pub fn execute_inspect(args: InspectArgs) -> Result<()> {
    let mut recording = load_recording(&args.input)
        .with_context(|| format!("Failed to load trace {}", args.input.display()))?;

    if args.merge_threads {
        let absorbed = recording.merge_restarted_threads();
        info!("Merged {} restarted threads", absorbed);
    }

    println!("{} {}", "Trace:".bold(), args.input.display());
    println!(
        "  Window: {} .. {}",
        format_time(recording.start_time()),
        format_time(recording.finish_time())
    );
    println!("  Threads: {}", recording.threads().len());
    println!("  Calls: {}", recording.call_count());

    for thread in recording.threads() {
        let summary = summarize_thread(thread);
        println!();
        println!(
            "{} [{}] {} .. {}",
            summary.label.cyan().bold(),
            summary.id,
            format_time(summary.start_time),
            format_time(summary.finish_time)
        );
        println!(
            "  calls {}  top-level {}  open {}  max depth {}  nesting {}  events {}",
            summary.call_count,
            summary.top_level_calls,
            summary.open_calls,
            summary.max_stack_depth,
            summary.max_child_call_stack_depth,
            summary.event_count
        );

        if args.show_calls {
            for line in render_call_tree(thread, args.max_depth) {
                println!("{}", line);
            }
            for line in render_event_timeline(thread) {
                println!("{}", line.yellow());
            }
        }
    }

    for counter in recording.counters() {
        println!();
        println!(
            "{} [{}] samples {}  min {}  max {}",
            counter.label().magenta().bold(),
            counter.id(),
            counter.samples().len(),
            counter.min_value(),
            counter.max_value()
        );
    }

    Ok(())
}

/// Indented call tree of one thread, one line per call
///
/// Calls deeper than `max_depth` are folded into a single
/// "... N nested calls" line under their parent.
pub fn render_call_tree(thread: &ThreadRecording, max_depth: usize) -> Vec<String> {
    let calls = thread.calls();
    let mut lines = Vec::new();

    // (call, depth); children pushed in reverse so output keeps start order
    let mut pending: Vec<(CallId, usize)> = thread
        .top_level_calls()
        .iter()
        .rev()
        .map(|&id| (id, 0))
        .collect();

    while let Some((id, depth)) = pending.pop() {
        let node = &calls[id];
        let indent = "  ".repeat(depth + 1);
        let finish = node
            .finish_time()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "open".to_string());
        lines.push(format!(
            "{}{} [{} .. {}] depth {}",
            indent,
            node.label(),
            node.start_time(),
            finish,
            node.child_call_stack_depth()
        ));

        if node.children().is_empty() {
            continue;
        }
        if depth + 1 >= max_depth {
            lines.push(format!(
                "{}  ... {} nested calls",
                indent,
                count_descendants(thread, id)
            ));
            continue;
        }
        pending.extend(node.children().iter().rev().map(|&child| (child, depth + 1)));
    }

    lines
}

/// Event occurrences of one thread as `label@time`, in emission order
pub fn render_event_timeline(thread: &ThreadRecording) -> Vec<String> {
    thread
        .event_occurrences()
        .iter()
        .map(|occurrence| {
            format!(
                "  * {}@{}",
                occurrence.event().label(),
                occurrence.time()
            )
        })
        .collect()
}

fn count_descendants(thread: &ThreadRecording, id: CallId) -> usize {
    let calls = thread.calls();
    let mut count = 0;
    let mut pending = calls[id].children().to_vec();
    while let Some(next) = pending.pop() {
        count += 1;
        pending.extend_from_slice(calls[next].children());
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_thread() -> ThreadRecording {
        let mut thread = ThreadRecording::new(1, "main");
        thread.declare_function(1, "outer");
        thread.declare_function(2, "inner");
        thread.declare_function(3, "leaf");
        thread.call_start(1, 0).unwrap();
        thread.call_start(2, 10).unwrap();
        thread.call_start(3, 20).unwrap();
        thread.call_finish(3, 30).unwrap();
        thread.call_finish(2, 40).unwrap();
        thread.call_finish(1, 50).unwrap();
        thread.call_start(2, 60).unwrap();
        thread
    }

    #[test]
    fn test_render_event_timeline() {
        let mut thread = sample_thread();
        thread.declare_event(7, "vsync");
        thread.declare_event(8, "gc");
        thread.emit_event(7, 16).unwrap();
        thread.emit_event(8, 20).unwrap();
        thread.emit_event(7, 32).unwrap();

        assert_eq!(
            render_event_timeline(&thread),
            vec!["  * vsync@16", "  * gc@20", "  * vsync@32"]
        );
        assert!(render_event_timeline(&sample_thread()).is_empty());
    }

    #[test]
    fn test_render_full_tree() {
        let lines = render_call_tree(&sample_thread(), 8);
        assert_eq!(
            lines,
            vec![
                "  outer [0 .. 50] depth 2",
                "    inner [10 .. 40] depth 1",
                "      leaf [20 .. 30] depth 0",
                "  inner [60 .. open] depth 0",
            ]
        );
    }

    #[test]
    fn test_render_folds_deep_calls() {
        let lines = render_call_tree(&sample_thread(), 1);
        assert_eq!(lines[0], "  outer [0 .. 50] depth 2");
        assert_eq!(lines[1], "    ... 2 nested calls");
        assert_eq!(lines[2], "  inner [60 .. open] depth 0");
    }
}
