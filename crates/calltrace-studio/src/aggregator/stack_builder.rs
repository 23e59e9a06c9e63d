//! Build collapsed stack format from reconstructed call trees.
//!
//! Collapsed stacks are the input format for flamegraph generation.
//! Format: "thread;parent;child weight"
//!
//! Example: "render;draw_frame;upload_textures 1200"
//! This means: on the `render` thread, draw_frame called upload_textures,
//! which spent 1200 time units in its own body (children excluded).

use crate::recording::{CallArena, CallId, Recording, ThreadRecording};
use crate::utils::config::STACK_SEPARATOR;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single collapsed stack entry
///
/// **Public** - used by flamegraph generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapsedStack {
    /// Stack trace as semicolon-separated string, thread label first
    pub stack: String,

    /// Self time accumulated by every call on this path
    pub weight: u64,

    /// Number of calls that ended on this path
    pub calls: u64,
}

impl CollapsedStack {
    /// Create a new collapsed stack
    ///
    /// **Public** - constructor
    pub fn new(stack: String, weight: u64, calls: u64) -> Self {
        Self {
            stack,
            weight,
            calls,
        }
    }

    /// Last frame of the stack
    pub fn leaf(&self) -> &str {
        self.stack
            .rsplit(STACK_SEPARATOR)
            .next()
            .unwrap_or(&self.stack)
    }
}

/// Build collapsed stacks for every thread of a recording
///
/// **Public** - main entry point for stack building
///
/// # Returns
/// Vector of collapsed stacks, one per unique path, heaviest first
///
/// # Algorithm
/// 1. Walk every call tree depth first
/// 2. Extend the path string with each call's label
/// 3. Weigh each closed call by its self time
/// 4. Aggregate by unique path (sum weights and call counts)
pub fn build_collapsed_stacks(recording: &Recording) -> Vec<CollapsedStack> {
    debug!(
        "Building collapsed stacks from {} calls on {} threads",
        recording.call_count(),
        recording.threads().len()
    );

    let mut stack_map: HashMap<String, (u64, u64)> = HashMap::new();
    for thread in recording.threads() {
        collect_thread_stacks(thread, &mut stack_map);
    }

    let stacks = into_sorted_stacks(stack_map);
    debug!("Built {} unique collapsed stacks", stacks.len());

    stacks
}

/// Build collapsed stacks for a single thread
pub fn build_thread_stacks(thread: &ThreadRecording) -> Vec<CollapsedStack> {
    let mut stack_map = HashMap::new();
    collect_thread_stacks(thread, &mut stack_map);
    into_sorted_stacks(stack_map)
}

/// Time spent in a call's own body.
///
/// Open calls have no duration and weigh nothing; open children are not
/// subtracted. Out-of-order timestamps floor at zero.
pub fn self_time(calls: &CallArena, id: CallId) -> u64 {
    let Some(duration) = calls[id].duration() else {
        return 0;
    };

    let children: i64 = calls
        .children(id)
        .filter_map(|(_, child)| child.duration())
        .sum();

    duration.saturating_sub(children).max(0) as u64
}

fn collect_thread_stacks(thread: &ThreadRecording, stack_map: &mut HashMap<String, (u64, u64)>) {
    let calls = thread.calls();
    let root = frame_name(thread.label());

    // Iterative walk; recursive traces can be far deeper than the native stack
    let mut pending: Vec<(CallId, String)> = thread
        .top_level_calls()
        .iter()
        .rev()
        .map(|&id| (id, root.clone()))
        .collect();

    while let Some((id, prefix)) = pending.pop() {
        let node = &calls[id];
        let path = format!("{}{}{}", prefix, STACK_SEPARATOR, frame_name(node.label()));

        let entry = stack_map.entry(path.clone()).or_insert((0, 0));
        entry.0 += self_time(calls, id);
        if !node.is_open() {
            entry.1 += 1;
        }

        pending.extend(node.children().iter().rev().map(|&child| (child, path.clone())));
    }
}

fn into_sorted_stacks(stack_map: HashMap<String, (u64, u64)>) -> Vec<CollapsedStack> {
    let mut stacks: Vec<CollapsedStack> = stack_map
        .into_iter()
        .map(|(stack, (weight, calls))| CollapsedStack::new(stack, weight, calls))
        .collect();

    stacks.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.stack.cmp(&b.stack)));
    stacks
}

/// Labels may contain the separator; keep one frame per label
fn frame_name(label: &str) -> String {
    label.replace(STACK_SEPARATOR, ":")
}
