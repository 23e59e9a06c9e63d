//! Call Trace Studio library
//!
//! Rebuilds per-thread call trees, event timelines and counter series from
//! timestamped call traces, then aggregates them into reports and
//! flamegraphs.

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod parser;
pub mod recording;
pub mod utils;
