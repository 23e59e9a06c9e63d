//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod inspect;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analyze::{execute_analyze, validate_args};
pub use inspect::{execute_inspect, render_call_tree, render_event_timeline};
pub use models::{AnalyzeArgs, InspectArgs};
pub use utils::{display_schema, display_version, validate_report_file};
