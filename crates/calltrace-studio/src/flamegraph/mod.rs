//! Flamegraph export for collapsed stacks.
//!
//! This module converts collapsed stacks into standalone SVG flamegraphs
//! and renders hot path tables for the terminal.

pub mod generator;
pub mod text;

// Re-export main types
pub use generator::{generate_flamegraph, FlamegraphConfig};
pub use text::generate_text_summary;
