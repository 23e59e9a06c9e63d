//! Per-thread and per-counter statistics for reports and terminal output.

use crate::output::schema::{CounterSummary, ThreadSummary};
use crate::recording::{CounterIdentity, Recording, ThreadRecording};

/// Summarize every thread, in recording order
pub fn summarize_threads(recording: &Recording) -> Vec<ThreadSummary> {
    recording.threads().iter().map(summarize_thread).collect()
}

pub fn summarize_thread(thread: &ThreadRecording) -> ThreadSummary {
    let calls = thread.calls();

    let busy_time = thread
        .top_level_calls()
        .iter()
        .filter_map(|&id| calls[id].duration())
        .sum();

    let max_child_call_stack_depth = thread
        .top_level_calls()
        .iter()
        .map(|&id| calls[id].child_call_stack_depth())
        .max()
        .unwrap_or(0);

    ThreadSummary {
        id: thread.id(),
        label: thread.label().to_string(),
        start_time: thread.start_time(),
        finish_time: thread.finish_time(),
        max_stack_depth: thread.max_stack_depth(),
        max_child_call_stack_depth,
        call_count: calls.len(),
        top_level_calls: thread.top_level_calls().len(),
        open_calls: calls.iter().filter(|(_, node)| node.is_open()).count(),
        busy_time,
        event_count: thread.event_occurrences().len(),
    }
}

/// Summarize every counter, in declaration order
pub fn summarize_counters(recording: &Recording) -> Vec<CounterSummary> {
    recording.counters().iter().map(summarize_counter).collect()
}

pub fn summarize_counter(counter: &CounterIdentity) -> CounterSummary {
    CounterSummary {
        id: counter.id(),
        label: counter.label().to_string(),
        samples: counter.samples().len(),
        min_value: counter.min_value(),
        max_value: counter.max_value(),
        last_value: counter.samples().last().map(|sample| sample.value),
    }
}
