//! Calculate performance metrics and hot paths from collapsed stacks.
//!
//! Hot paths are the call paths that spend the most time in their own body.
//! These are the primary targets for optimization.

use super::stack_builder::CollapsedStack;
use crate::output::schema::HotPath;
use log::debug;

/// Calculate hot paths from collapsed stacks
///
/// **Public** - main entry point for metrics calculation
///
/// # Arguments
/// * `stacks` - Collapsed stacks from stack_builder, heaviest first
/// * `top_n` - Number of top paths to return (e.g., 10)
///
/// # Returns
/// Vector of hot paths, sorted by self time (descending)
pub fn calculate_hot_paths(stacks: &[CollapsedStack], top_n: usize) -> Vec<HotPath> {
    debug!(
        "Calculating top {} hot paths from {} stacks",
        top_n,
        stacks.len()
    );

    let total: u64 = stacks.iter().map(|s| s.weight).sum();

    stacks
        .iter()
        .take(top_n)
        .map(|stack| create_hot_path(stack, total))
        .collect()
}

/// Create a HotPath from a CollapsedStack
pub fn create_hot_path(stack: &CollapsedStack, denominator: u64) -> HotPath {
    let percentage = if denominator > 0 {
        (stack.weight as f64 / denominator as f64) * 100.0
    } else {
        0.0
    };

    HotPath {
        stack: stack.stack.clone(),
        time: stack.weight,
        calls: stack.calls,
        percentage,
    }
}

/// Calculate self time distribution statistics
///
/// **Public** - provides summary statistics
pub fn calculate_time_distribution(stacks: &[CollapsedStack]) -> TimeDistribution {
    if stacks.is_empty() {
        return TimeDistribution::default();
    }

    let total: u64 = stacks.iter().map(|s| s.weight).sum();
    let count = stacks.len();
    let mean = total / count as u64;

    let mut weights: Vec<u64> = stacks.iter().map(|s| s.weight).collect();
    weights.sort_unstable();
    let median = weights[weights.len() / 2];

    // Top 10% of stacks, by weight
    let top_10_percent_count = (count as f64 * 0.1).ceil() as usize;
    let top_10_percent_time: u64 = weights.iter().rev().take(top_10_percent_count).sum();

    TimeDistribution {
        total_time: total,
        stack_count: count,
        mean_time_per_stack: mean,
        median_time_per_stack: median,
        top_10_percent_percentage: if total > 0 {
            (top_10_percent_time as f64 / total as f64) * 100.0
        } else {
            0.0
        },
    }
}

/// Self time distribution statistics
///
/// **Public** - returned from calculate_time_distribution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeDistribution {
    /// Total self time across all stacks
    pub total_time: u64,

    /// Number of unique stacks
    pub stack_count: usize,

    pub mean_time_per_stack: u64,
    pub median_time_per_stack: u64,

    /// Percentage of total time in the heaviest 10% of stacks
    pub top_10_percent_percentage: f64,
}

impl TimeDistribution {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Total: {} | Stacks: {} | Mean: {} | Median: {} | Top 10%: {:.1}%",
            self.total_time,
            self.stack_count,
            self.mean_time_per_stack,
            self.median_time_per_stack,
            self.top_10_percent_percentage
        )
    }
}
