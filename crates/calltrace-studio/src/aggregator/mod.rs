//! Aggregation of reconstructed call trees into collapsed stacks and metrics.
//!
//! This module walks a finished recording (read-only) to produce:
//! - Collapsed stack format (for flamegraph generation)
//! - Hot path analysis (top self time consumers)
//! - Self time distribution statistics
//! - Thread and counter summaries

pub mod metrics;
pub mod stack_builder;
pub mod summary;

// Re-export main types and functions
pub use metrics::{calculate_hot_paths, calculate_time_distribution, TimeDistribution};
pub use stack_builder::{build_collapsed_stacks, build_thread_stacks, CollapsedStack};
pub use summary::{summarize_counters, summarize_threads};
