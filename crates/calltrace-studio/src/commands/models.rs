use crate::flamegraph::FlamegraphConfig;
use crate::utils::config::DEFAULT_TOP_PATHS;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Trace file to load
    pub input: PathBuf,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Output path for SVG flamegraph (optional)
    pub output_svg: Option<PathBuf>,

    /// Number of top hot paths to include in the report
    pub top_paths: usize,

    /// Fold restarted threads sharing a label before aggregating
    pub merge_threads: bool,

    /// Flamegraph configuration
    pub flamegraph_config: FlamegraphConfig,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("trace.txt"),
            output_json: Some(PathBuf::from("report.json")),
            output_svg: None,
            top_paths: DEFAULT_TOP_PATHS,
            merge_threads: true,
            flamegraph_config: FlamegraphConfig::default(),
            print_summary: false,
        }
    }
}

/// Arguments for the inspect command
#[derive(Debug, Clone)]
pub struct InspectArgs {
    /// Trace file to load
    pub input: PathBuf,

    /// Fold restarted threads sharing a label before printing
    pub merge_threads: bool,

    /// Print each thread's call tree
    pub show_calls: bool,

    /// Deepest call stack depth printed with `show_calls`
    pub max_depth: usize,
}

impl Default for InspectArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("trace.txt"),
            merge_threads: true,
            show_calls: false,
            max_depth: 8,
        }
    }
}
