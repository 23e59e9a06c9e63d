//! Output JSON schema definitions for analysis reports.
//!
//! This module defines the structure of JSON files we write to disk.
//! Reports carry derived statistics only, never the call trees themselves.
//! Schema is versioned to allow future evolution.

use crate::aggregator::{summarize_counters, summarize_threads};
use crate::recording::{Recording, ThreadId, Timestamp};
use crate::utils::config::SCHEMA_VERSION;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Trace file the report was built from
    pub source: String,

    /// First call start across all threads
    pub start_time: Option<Timestamp>,

    /// Last call finish received
    pub finish_time: Option<Timestamp>,

    /// Whether restarted threads were merged before aggregation
    pub merged_threads: bool,

    /// Per-thread statistics, in recording order
    pub threads: Vec<ThreadSummary>,

    /// Per-counter statistics, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub counters: Vec<CounterSummary>,

    /// Top hot paths (ranked by self time)
    pub hot_paths: Vec<HotPath>,

    /// Timestamp when report was generated
    pub generated_at: String,
}

impl Report {
    /// Assemble a report from a finished recording
    ///
    /// **Public** - called once aggregation is done
    pub fn from_recording(
        recording: &Recording,
        source: impl Into<String>,
        merged_threads: bool,
        hot_paths: Vec<HotPath>,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            source: source.into(),
            start_time: recording.start_time(),
            finish_time: recording.finish_time(),
            merged_threads,
            threads: summarize_threads(recording),
            counters: summarize_counters(recording),
            hot_paths,
            generated_at: Utc::now().to_rfc3339(),
        }
    }

    /// Total number of calls across all threads
    pub fn total_calls(&self) -> usize {
        self.threads.iter().map(|t| t.call_count).sum()
    }
}

/// Statistics for one thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub id: ThreadId,
    pub label: String,
    pub start_time: Option<Timestamp>,
    pub finish_time: Option<Timestamp>,

    /// Peak number of simultaneously open calls
    pub max_stack_depth: usize,

    /// Deepest nesting below any top-level call
    pub max_child_call_stack_depth: usize,

    /// Total number of calls recorded
    pub call_count: usize,

    /// Calls started with nothing else open
    pub top_level_calls: usize,

    /// Calls that never finished
    pub open_calls: usize,

    /// Sum of the durations of finished top-level calls
    pub busy_time: i64,

    /// Event emissions recorded on the thread
    pub event_count: usize,
}

/// Statistics for one counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSummary {
    pub id: u64,
    pub label: String,
    pub samples: usize,
    pub min_value: f64,
    pub max_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_value: Option<f64>,
}

/// A hot path in the trace (stack with self time)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotPath {
    /// Collapsed stack representation (e.g., "main;update;physics")
    pub stack: String,

    /// Self time spent on this path
    pub time: u64,

    /// Number of finished calls on this path
    pub calls: u64,

    /// Percentage of total self time
    pub percentage: f64,
}
